//! # Typeface 模块
//!
//! 字体来源、字体数据与加载接口。
//!
//! Stage 不解析字体文件，只持有字节并把它交给 [`DrawSurface`](crate::DrawSurface)
//! 光栅化。真正的读取与校验由 Host 实现 [`TypefaceLoader`] 完成。

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{InitError, StageResult, TypefaceError};

/// 字体来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// 文件路径（相对路径由 Host 解释）
    File(String),
    /// 已在内存中的字体数据
    Memory { name: String, bytes: Arc<[u8]> },
}

impl FontSource {
    pub fn file(path: impl Into<String>) -> Self {
        Self::File(path.into())
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => f.write_str(path),
            FontSource::Memory { name, .. } => write!(f, "<memory:{}>", name),
        }
    }
}

/// 已加载的字体
#[derive(Clone)]
pub struct Typeface {
    name: String,
    point_size: f32,
    data: Arc<[u8]>,
}

impl Typeface {
    pub fn new(name: impl Into<String>, point_size: f32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            point_size,
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("name", &self.name)
            .field("point_size", &self.point_size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// 字体加载器
pub trait TypefaceLoader {
    /// 加载单个来源
    fn load(&self, source: &FontSource, point_size: f32) -> Result<Typeface, TypefaceError>;
}

/// 按顺序尝试候选字体，返回第一个成功加载的
pub fn load_first_available(
    loader: &dyn TypefaceLoader,
    candidates: &[FontSource],
    point_size: f32,
) -> StageResult<Typeface> {
    if candidates.is_empty() {
        error!("没有配置候选字体");
        return Err(InitError::NoCandidates);
    }

    for source in candidates {
        match loader.load(source, point_size) {
            Ok(face) => {
                info!(source = %source, point_size, "字体加载成功");
                return Ok(face);
            }
            Err(e) => {
                warn!(source = %source, error = %e, "字体加载失败，尝试下一个");
            }
        }
    }

    let tried: Vec<String> = candidates.iter().map(ToString::to_string).collect();
    error!(tried = ?tried, "所有候选字体均加载失败");
    Err(InitError::NoTypeface { tried })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 只接受指定文件名的加载器
    pub(crate) struct OnlyLoader(pub &'static str);

    impl TypefaceLoader for OnlyLoader {
        fn load(&self, source: &FontSource, point_size: f32) -> Result<Typeface, TypefaceError> {
            match source {
                FontSource::File(path) if path == self.0 => {
                    Ok(Typeface::new(path.clone(), point_size, vec![0u8; 4]))
                }
                FontSource::Memory { name, bytes } => {
                    Ok(Typeface::new(name.clone(), point_size, bytes.clone()))
                }
                other => Err(TypefaceError::Io {
                    name: other.to_string(),
                    error: std::io::ErrorKind::NotFound.into(),
                }),
            }
        }
    }

    #[test]
    fn test_first_candidate_wins() {
        let loader = OnlyLoader("b.ttf");
        let candidates = [
            FontSource::file("a.ttf"),
            FontSource::file("b.ttf"),
            FontSource::file("c.ttf"),
        ];
        let face = load_first_available(&loader, &candidates, 24.0).unwrap();
        assert_eq!(face.name(), "b.ttf");
        assert_eq!(face.point_size(), 24.0);
    }

    #[test]
    fn test_all_candidates_fail() {
        let loader = OnlyLoader("missing.ttf");
        let candidates = [FontSource::file("a.ttf"), FontSource::file("b.ttf")];
        let err = load_first_available(&loader, &candidates, 24.0).unwrap_err();
        assert_eq!(
            err,
            InitError::NoTypeface {
                tried: vec!["a.ttf".to_string(), "b.ttf".to_string()]
            }
        );
    }

    #[test]
    fn test_no_candidates() {
        let loader = OnlyLoader("a.ttf");
        assert_eq!(
            load_first_available(&loader, &[], 24.0).unwrap_err(),
            InitError::NoCandidates
        );
    }

    #[test]
    fn test_memory_source_display() {
        let src = FontSource::Memory {
            name: "builtin".to_string(),
            bytes: Arc::from(vec![1u8, 2, 3]),
        };
        assert_eq!(src.to_string(), "<memory:builtin>");
    }
}
