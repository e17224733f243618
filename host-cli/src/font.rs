//! # Font 模块
//!
//! 从文件系统加载字体，并用 rusttype 校验字体数据可以解析。

use std::fs;

use rusttype::Font;
use tracing::debug;
use vn_stage::{FontSource, Typeface, TypefaceError, TypefaceLoader};

/// 文件系统字体加载器
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTypefaceLoader;

impl FsTypefaceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TypefaceLoader for FsTypefaceLoader {
    fn load(&self, source: &FontSource, point_size: f32) -> Result<Typeface, TypefaceError> {
        let (name, bytes): (String, Vec<u8>) = match source {
            FontSource::File(path) => {
                let bytes = fs::read(path).map_err(|error| TypefaceError::Io {
                    name: path.clone(),
                    error,
                })?;
                (path.clone(), bytes)
            }
            FontSource::Memory { name, bytes } => (name.clone(), bytes.to_vec()),
        };

        if Font::try_from_bytes(&bytes).is_none() {
            return Err(TypefaceError::Invalid { name });
        }

        debug!(font = %name, bytes = bytes.len(), "字体数据校验通过");
        Ok(Typeface::new(name, point_size, bytes))
    }
}

/// 把配置中的路径列表转换为字体来源
pub fn file_candidates(paths: &[String]) -> Vec<FontSource> {
    paths.iter().map(FontSource::file).collect()
}
