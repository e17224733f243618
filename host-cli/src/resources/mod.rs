//! # Resources 模块
//!
//! 资源管理：逻辑路径、资源来源、位图解码与缓存。

mod cache;
mod error;
pub mod path;
mod source;

pub use cache::{AssetCache, CacheStats};
pub use error::ResourceError;
pub use source::{AssetSource, FsSource, MemorySource};

use vn_stage::Bitmap;

/// 使用 image crate 解码图片为 RGBA8 位图
pub fn decode_bitmap(path: &str, bytes: &[u8]) -> Result<Bitmap, ResourceError> {
    let img = image::load_from_memory(bytes).map_err(|error| ResourceError::Decode {
        path: path.to_string(),
        error,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_rgba(width, height, rgba.into_raw()).ok_or_else(|| {
        ResourceError::BadDimensions {
            path: path.to_string(),
            width,
            height,
        }
    })
}
