//! # Surface 模块
//!
//! Stage 向 Host 发出绘制请求的抽象接口。
//!
//! ## 设计说明
//!
//! - Stage 每帧把 `&mut impl DrawSurface` 传进 `render`，不持有绘制目标
//! - tint 是每次 `blit` 的参数，不修改共享的位图
//! - 文本绘制采用"光栅化 → 贴图 → 丢弃"的方式，每次调用生成一张临时位图

mod recording;

pub use recording::{GLYPH_ADVANCE, LINE_HEIGHT, RecordingSurface};

use serde::Serialize;

use crate::asset::AssetHandle;
use crate::geometry::{Color, RectF, Size};
use crate::typeface::Typeface;

/// 光栅化后的文本
#[derive(Debug, Clone)]
pub struct RasterizedText {
    /// 临时位图，用完即弃
    pub bitmap: AssetHandle,
    /// 文本的自然尺寸
    pub size: Size,
}

/// 绘制目标
pub trait DrawSurface {
    /// 填充矩形
    fn fill_rect(&mut self, rect: RectF, color: Color);

    /// 将 `asset` 的 `src` 区域缩放绘制到 `dst`，颜色乘以 `tint`
    fn blit(&mut self, asset: &AssetHandle, src: RectF, dst: RectF, tint: Color);

    /// 将文本光栅化为位图
    ///
    /// `wrap_width` 为 `Some` 时按该宽度自动换行。空文本或字体无法绘制时返回 `None`。
    fn rasterize_text(
        &mut self,
        face: &Typeface,
        text: &str,
        color: Color,
        wrap_width: Option<u32>,
    ) -> Option<RasterizedText>;
}

/// 绘制调用记录（供 [`RecordingSurface`] 使用）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCall {
    FillRect {
        rect: RectF,
        color: Color,
    },
    Blit {
        asset: String,
        src: RectF,
        dst: RectF,
        tint: Color,
    },
    RasterizeText {
        text: String,
        color: Color,
        wrap_width: Option<u32>,
        size: Size,
    },
}

/// 按宽度切分文本行
///
/// - `\n` 强制换行
/// - 优先在空格处断行
/// - 单个单词超宽时按字符断开
/// - `max_width` 为 `None` 时只处理 `\n`
pub fn wrap_lines<F>(text: &str, max_width: Option<f32>, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(paragraph.to_string());
            continue;
        };

        let mut line = String::new();
        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };

            if line.is_empty() || measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::take(&mut line));
                line = word.to_string();
            }

            // 单词本身超宽
            while line.chars().count() > 1 && measure(&line) > max_width {
                let split = split_index(&line, max_width, &measure);
                let rest = line.split_off(split);
                lines.push(std::mem::replace(&mut line, rest));
            }
        }
        lines.push(line);
    }

    lines
}

/// 在不超宽的前提下能容纳的最长前缀的字节下标（至少一个字符）
fn split_index<F>(line: &str, max_width: f32, measure: &F) -> usize
where
    F: Fn(&str) -> f32,
{
    let mut boundaries = line.char_indices().map(|(i, _)| i).skip(1);
    let mut best = boundaries.next().unwrap_or(line.len());
    for i in boundaries {
        if measure(&line[..i]) > max_width {
            break;
        }
        best = i;
    }
    best
}
