//! # Layout 模块
//!
//! 对话框的固定布局与配色（以 1280×720 画布为基准）。

use serde::{Deserialize, Serialize};

use crate::geometry::{Color, Point, Rect};

/// 对话框布局
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueLayout {
    /// 对话框背景
    pub textbox: Rect,
    pub textbox_color: Color,
    /// 正文区域（宽度即换行宽度）
    pub text_area: Rect,
    pub text_color: Color,
    /// 说话者名字左上角
    pub speaker_anchor: Point,
    pub speaker_color: Color,
    /// 第一个选项相对正文区域顶部向上的距离
    pub choice_offset: i32,
    /// 相邻选项的垂直间距
    pub choice_spacing: i32,
    pub choice_color: Color,
    /// 字号（点）
    pub font_size: f32,
}

impl Default for DialogueLayout {
    fn default() -> Self {
        Self {
            textbox: Rect::new(100, 500, 1080, 180),
            textbox_color: Color::rgba(20, 20, 30, 230),
            text_area: Rect::new(120, 540, 1040, 120),
            text_color: Color::WHITE,
            speaker_anchor: Point::new(120, 510),
            speaker_color: Color::rgb(255, 200, 100),
            choice_offset: 40,
            choice_spacing: 35,
            choice_color: Color::rgb(200, 200, 255),
            font_size: 24.0,
        }
    }
}

impl DialogueLayout {
    /// 第 `index` 个选项的左上角（从正文上方往上堆叠）
    pub fn choice_anchor(&self, index: usize) -> Point {
        let y = self.text_area.y - self.choice_offset - index as i32 * self.choice_spacing;
        Point::new(self.text_area.x, y)
    }

    /// 正文换行宽度
    pub fn wrap_width(&self) -> u32 {
        self.text_area.w.max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_anchor_stacks_upward() {
        let layout = DialogueLayout::default();
        assert_eq!(layout.choice_anchor(0), Point::new(120, 500));
        assert_eq!(layout.choice_anchor(1), Point::new(120, 465));
        assert_eq!(layout.choice_anchor(2), Point::new(120, 430));
    }

    #[test]
    fn test_partial_layout_deserialize() {
        let layout: DialogueLayout = serde_json::from_str(r#"{"font_size": 32.0}"#).unwrap();
        assert_eq!(layout.font_size, 32.0);
        assert_eq!(layout.textbox, DialogueLayout::default().textbox);
    }
}
