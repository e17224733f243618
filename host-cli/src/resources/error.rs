//! # Resource Error 模块
//!
//! 位图资源的读取与解码错误。

use std::io;

use thiserror::Error;

/// 资源错误
#[derive(Error, Debug)]
pub enum ResourceError {
    /// 资源不存在
    #[error("资源未找到: {path}")]
    NotFound { path: String },

    /// 其它读取错误（权限、目录等）
    #[error("读取资源失败: {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: io::Error,
    },

    /// 字节无法解码为图片
    #[error("无法解码位图: {path}: {error}")]
    Decode {
        path: String,
        #[source]
        error: image::ImageError,
    },

    /// 解码结果的像素数与宽高不符
    #[error("位图尺寸无效: {path} ({width}x{height})")]
    BadDimensions { path: String, width: u32, height: u32 },
}

impl ResourceError {
    /// 把文件读取错误分为"不存在"与其它 IO 错误
    pub fn from_io(path: impl Into<String>, error: io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_from_io_not_found() {
        let err = ResourceError::from_io("a.png", io::ErrorKind::NotFound.into());
        assert!(matches!(err, ResourceError::NotFound { ref path } if path == "a.png"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_io_keeps_source() {
        let err = ResourceError::from_io(
            "a.png",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ResourceError::Io { .. }));
        assert_eq!(err.source().map(ToString::to_string), Some("denied".to_string()));
        assert!(err.to_string().contains("a.png"));
    }
}
