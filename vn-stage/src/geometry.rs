//! # Geometry 模块
//!
//! 屏幕坐标、矩形与颜色。

use serde::{Deserialize, Serialize};

/// 整数坐标点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 按偏移量平移
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// 尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 整数矩形（源矩形、布局矩形）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// 转换为浮点矩形
    pub fn to_f32(self) -> RectF {
        RectF::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}

/// 浮点矩形（绘制目标矩形）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// 以 `center` 为中心、给定宽高的矩形
    pub fn centered_on(center: Point, w: f32, h: f32) -> Self {
        Self::new(center.x as f32 - w / 2.0, center.y as f32 - h / 2.0, w, h)
    }
}

/// RGBA 颜色（8 bit 每通道）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// 通道相乘（tint 语义：`self` 为原色，`tint` 为调制色）
    pub fn modulate(self, tint: Color) -> Color {
        #[inline]
        fn mul(a: u8, b: u8) -> u8 {
            ((a as u16 * b as u16 + 127) / 255) as u8
        }
        Color::rgba(
            mul(self.r, tint.r),
            mul(self.g, tint.g),
            mul(self.b, tint.b),
            mul(self.a, tint.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = RectF::centered_on(Point::new(640, 360), 100.0, 50.0);
        assert_eq!(r, RectF::new(590.0, 335.0, 100.0, 50.0));
    }

    #[test]
    fn test_modulate() {
        let c = Color::rgb(200, 100, 0);
        assert_eq!(c.modulate(Color::WHITE), c);
        assert_eq!(c.modulate(Color::rgba(0, 0, 0, 0)), Color::rgba(0, 0, 0, 0));
        assert_eq!(Color::WHITE.modulate(Color::rgb(255, 100, 100)), Color::rgb(255, 100, 100));
    }

    #[test]
    fn test_default_color_is_opaque_white() {
        assert_eq!(Color::default(), Color::WHITE);
    }
}
