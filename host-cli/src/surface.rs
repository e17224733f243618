//! # Canvas Surface 模块
//!
//! 基于 CPU 的 RGBA 画布，实现 [`DrawSurface`]。
//!
//! ## 设计说明
//!
//! - 所有绘制都使用 source-over 混合，画布本身保持不透明
//! - `blit` 采用最近邻采样，颜色按通道乘以 tint
//! - 文本用 rusttype 光栅化到临时位图，字体按名称缓存解析结果

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use tracing::warn;
use vn_stage::{
    AssetHandle, Bitmap, Color, DrawSurface, RasterizedText, RectF, Size, Typeface, wrap_lines,
};

/// CPU 画布
pub struct CanvasSurface {
    canvas: RgbaImage,
    /// 字体名 -> 解析结果（解析失败记为 `None`，只警告一次）
    fonts: HashMap<String, Option<Font<'static>>>,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            fonts: HashMap::new(),
        }
    }

    /// 用纯色清空画布
    pub fn clear(&mut self, color: Color) {
        let px = Rgba([color.r, color.g, color.b, 255]);
        for p in self.canvas.pixels_mut() {
            *p = px;
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// 读取画布像素
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width() || y >= self.canvas.height() {
            return None;
        }
        Some(self.canvas.get_pixel(x, y).0)
    }

    /// 保存为 PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.canvas.save(path)
    }

    fn font(&mut self, face: &Typeface) -> Option<&Font<'static>> {
        self.fonts
            .entry(face.name().to_string())
            .or_insert_with(|| {
                let font = Font::try_from_vec(face.data().to_vec());
                if font.is_none() {
                    warn!(font = face.name(), "字体数据无法解析，文本将不会绘制");
                }
                font
            })
            .as_ref()
    }

    fn blend(&mut self, x: i64, y: i64, src: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        let dst = self.canvas.get_pixel_mut(x as u32, y as u32);
        *dst = Rgba(blend_over(dst.0, src));
    }
}

impl DrawSurface for CanvasSurface {
    fn fill_rect(&mut self, rect: RectF, color: Color) {
        let (x0, y0, x1, y1) = pixel_span(rect);
        let src = [color.r, color.g, color.b, color.a];
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, src);
            }
        }
    }

    fn blit(&mut self, asset: &AssetHandle, src: RectF, dst: RectF, tint: Color) {
        if dst.w <= 0.0 || dst.h <= 0.0 {
            return;
        }
        let bitmap = asset.bitmap();
        let (x0, y0, x1, y1) = pixel_span(dst);

        for y in y0..y1 {
            // 以像素中心采样
            let v = (y as f32 + 0.5 - dst.y) / dst.h;
            let sy = (src.y + v * src.h).floor();
            for x in x0..x1 {
                let u = (x as f32 + 0.5 - dst.x) / dst.w;
                let sx = (src.x + u * src.w).floor();
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                let Some(texel) = bitmap.pixel(sx as u32, sy as u32) else {
                    continue;
                };
                let c = Color::rgba(texel[0], texel[1], texel[2], texel[3]).modulate(tint);
                self.blend(x, y, [c.r, c.g, c.b, c.a]);
            }
        }
    }

    fn rasterize_text(
        &mut self,
        face: &Typeface,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Option<RasterizedText> {
        if text.is_empty() {
            return None;
        }
        let point_size = face.point_size();
        let font = self.font(face)?;
        let scale = Scale::uniform(point_size);

        let lines = wrap_lines(text, wrap_width.map(|w| w as f32), |s| {
            measure(font, scale, s)
        });
        let metrics = font.v_metrics(scale);
        let line_height = (metrics.ascent - metrics.descent + metrics.line_gap).ceil();

        let width = lines
            .iter()
            .map(|l| measure(font, scale, l).ceil() as u32)
            .max()
            .unwrap_or(0)
            .max(1);
        let height = ((line_height * lines.len() as f32).ceil() as u32).max(1);

        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        for (i, line) in lines.iter().enumerate() {
            let baseline = metrics.ascent + line_height * i as f32;
            for glyph in font.layout(line, scale, point(0.0, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let x = gx as i32 + bb.min.x;
                    let y = gy as i32 + bb.min.y;
                    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                        return;
                    }
                    let idx = ((y as usize) * (width as usize) + x as usize) * 4;
                    let alpha = (coverage.clamp(0.0, 1.0) * color.a as f32).round() as u8;
                    // 重叠字形取覆盖率较大者
                    if alpha >= pixels[idx + 3] {
                        pixels[idx] = color.r;
                        pixels[idx + 1] = color.g;
                        pixels[idx + 2] = color.b;
                        pixels[idx + 3] = alpha;
                    }
                });
            }
        }

        let bitmap = Bitmap::from_rgba(width, height, pixels)?;
        Some(RasterizedText {
            bitmap: AssetHandle::new(format!("text:{}", text), bitmap),
            size: Size::new(width, height),
        })
    }
}

/// 单行文本宽度（含字距调整）
fn measure(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// 矩形覆盖的像素范围 `[x0, x1) × [y0, y1)`
fn pixel_span(rect: RectF) -> (i64, i64, i64, i64) {
    (
        rect.x.round() as i64,
        rect.y.round() as i64,
        (rect.x + rect.w).round() as i64,
        (rect.y + rect.h).round() as i64,
    )
}

/// source-over 混合
fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let a = src[3] as u32;
    if a == 255 {
        return src;
    }
    if a == 0 {
        return dst;
    }
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    let out_a = a + (dst[3] as u32 * (255 - a) + 127) / 255;
    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_a.min(255) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> AssetHandle {
        // 2×1：左白右红
        let pixels = vec![255, 255, 255, 255, 255, 0, 0, 255];
        AssetHandle::new("checker", Bitmap::from_rgba(2, 1, pixels).unwrap())
    }

    #[test]
    fn test_clear_and_fill() {
        let mut surface = CanvasSurface::new(8, 8);
        surface.clear(Color::rgb(30, 30, 40));
        assert_eq!(surface.pixel(0, 0), Some([30, 30, 40, 255]));

        surface.fill_rect(RectF::new(2.0, 2.0, 2.0, 2.0), Color::rgb(10, 20, 30));
        assert_eq!(surface.pixel(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(surface.pixel(3, 3), Some([10, 20, 30, 255]));
        assert_eq!(surface.pixel(4, 4), Some([30, 30, 40, 255]));
    }

    #[test]
    fn test_fill_translucent_blends() {
        let mut surface = CanvasSurface::new(2, 2);
        surface.clear(Color::rgb(0, 0, 0));
        surface.fill_rect(RectF::new(0.0, 0.0, 2.0, 2.0), Color::rgba(255, 255, 255, 128));
        let [r, g, b, a] = surface.pixel(0, 0).unwrap();
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let mut surface = CanvasSurface::new(4, 4);
        surface.clear(Color::rgb(0, 0, 0));
        surface.fill_rect(RectF::new(-10.0, -10.0, 12.0, 12.0), Color::rgb(255, 0, 0));
        assert_eq!(surface.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_blit_scales_and_tints() {
        let mut surface = CanvasSurface::new(4, 2);
        surface.clear(Color::rgb(0, 0, 0));
        surface.blit(
            &checker(),
            RectF::new(0.0, 0.0, 2.0, 1.0),
            RectF::new(0.0, 0.0, 4.0, 2.0),
            Color::rgb(100, 255, 100),
        );
        // 左半：白色 × tint
        assert_eq!(surface.pixel(0, 0), Some([100, 255, 100, 255]));
        assert_eq!(surface.pixel(1, 1), Some([100, 255, 100, 255]));
        // 右半：红色 × tint
        assert_eq!(surface.pixel(2, 0), Some([100, 0, 0, 255]));
        assert_eq!(surface.pixel(3, 1), Some([100, 0, 0, 255]));
    }

    #[test]
    fn test_blit_source_region() {
        let mut surface = CanvasSurface::new(2, 2);
        surface.clear(Color::rgb(0, 0, 0));
        surface.blit(
            &checker(),
            RectF::new(1.0, 0.0, 1.0, 1.0),
            RectF::new(0.0, 0.0, 2.0, 2.0),
            Color::WHITE,
        );
        assert_eq!(surface.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_tint_does_not_modify_asset() {
        let asset = checker();
        let mut surface = CanvasSurface::new(2, 1);
        surface.blit(
            &asset,
            RectF::new(0.0, 0.0, 2.0, 1.0),
            RectF::new(0.0, 0.0, 2.0, 1.0),
            Color::rgb(0, 0, 0),
        );
        assert_eq!(asset.bitmap().pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_rasterize_with_invalid_font() {
        let mut surface = CanvasSurface::new(4, 4);
        let face = Typeface::new("broken", 24.0, vec![0u8; 8]);
        assert!(surface.rasterize_text(&face, "Hi", Color::WHITE, None).is_none());
        assert!(surface.rasterize_text(&face, "", Color::WHITE, None).is_none());
    }

    #[test]
    fn test_rasterize_with_system_font() {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
        ];
        // 没有可用字体的环境下跳过
        let Some(bytes) = candidates.iter().find_map(|p| std::fs::read(p).ok()) else {
            return;
        };
        let face = Typeface::new("system", 24.0, bytes);
        let mut surface = CanvasSurface::new(4, 4);

        let single = surface
            .rasterize_text(&face, "Hello", Color::WHITE, None)
            .unwrap();
        assert!(single.size.width > 0);
        assert_eq!(single.size.width, single.bitmap.size().width);

        let wrapped = surface
            .rasterize_text(&face, "Hello Hello Hello", Color::WHITE, Some(single.size.width + 4))
            .unwrap();
        assert!(wrapped.size.height >= single.size.height * 3);
        assert!(
            wrapped
                .bitmap
                .bitmap()
                .pixels()
                .chunks(4)
                .any(|p| p[3] > 0)
        );
    }
}
