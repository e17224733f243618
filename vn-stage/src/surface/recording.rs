//! 录制型绘制目标：不产生像素，只记录调用序列。
//!
//! 文本度量使用固定字宽/行高，结果可预测，适合测试和 dry-run。

use super::{DrawCall, DrawSurface, RasterizedText, wrap_lines};
use crate::asset::{AssetHandle, Bitmap};
use crate::geometry::{Color, RectF, Size};
use crate::typeface::Typeface;

/// 每个字符的固定宽度（像素）
pub const GLYPH_ADVANCE: u32 = 12;
/// 固定行高（像素）
pub const LINE_HEIGHT: u32 = 28;

/// 记录所有绘制调用的 [`DrawSurface`]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// 取出并清空记录（每帧调用一次）
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// 所有 blit 的资源标签（按调用顺序）
    pub fn blitted_assets(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Blit { asset, .. } => Some(asset.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 所有被光栅化的文本（按调用顺序）
    pub fn rasterized_texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::RasterizeText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn measure(text: &str) -> f32 {
        (text.chars().count() as u32 * GLYPH_ADVANCE) as f32
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: RectF, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn blit(&mut self, asset: &AssetHandle, src: RectF, dst: RectF, tint: Color) {
        self.calls.push(DrawCall::Blit {
            asset: asset.label().to_string(),
            src,
            dst,
            tint,
        });
    }

    fn rasterize_text(
        &mut self,
        _face: &Typeface,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Option<RasterizedText> {
        if text.is_empty() {
            return None;
        }

        let lines = wrap_lines(text, wrap_width.map(|w| w as f32), Self::measure);
        let width = lines
            .iter()
            .map(|line| Self::measure(line) as u32)
            .max()
            .unwrap_or(0)
            .max(1);
        let size = Size::new(width, lines.len() as u32 * LINE_HEIGHT);

        self.calls.push(DrawCall::RasterizeText {
            text: text.to_string(),
            color,
            wrap_width,
            size,
        });

        let bitmap = Bitmap::solid(size.width, size.height, [color.r, color.g, color.b, color.a]);
        Some(RasterizedText {
            bitmap: AssetHandle::new(format!("text:{}", text), bitmap),
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face() -> Typeface {
        Typeface::new("test", 24.0, vec![0u8])
    }

    #[test]
    fn test_text_metrics() {
        let mut surface = RecordingSurface::new();
        let text = surface
            .rasterize_text(&face(), "Hello", Color::WHITE, None)
            .unwrap();
        assert_eq!(text.size, Size::new(5 * GLYPH_ADVANCE, LINE_HEIGHT));

        let wrapped = surface
            .rasterize_text(&face(), "aaa bbb", Color::WHITE, Some(3 * GLYPH_ADVANCE))
            .unwrap();
        assert_eq!(wrapped.size, Size::new(3 * GLYPH_ADVANCE, 2 * LINE_HEIGHT));
        assert_eq!(surface.rasterized_texts(), vec!["Hello", "aaa bbb"]);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut surface = RecordingSurface::new();
        assert!(surface.rasterize_text(&face(), "", Color::WHITE, None).is_none());
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_take_calls() {
        let mut surface = RecordingSurface::new();
        surface.fill_rect(RectF::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(surface.take_calls().len(), 1);
        assert!(surface.calls().is_empty());
    }
}
