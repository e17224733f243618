//! # Asset Source 模块
//!
//! 资源来源抽象层：缓存只关心"按逻辑路径读出字节"，不关心字节从哪里来。
//!
//! 所有路径参数都是**逻辑路径**（见 [`normalize_logical_path`]）。

use std::collections::HashMap;
use std::path::PathBuf;

use super::ResourceError;
use super::path::normalize_logical_path;

/// 资源来源 trait
pub trait AssetSource {
    /// 读取资源字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 获取资源的完整路径（用于日志）
    fn full_path(&self, path: &str) -> String;
}

/// 文件系统资源来源
#[derive(Debug, Clone)]
pub struct FsSource {
    base_path: PathBuf,
}

impl FsSource {
    /// 创建文件系统资源来源
    ///
    /// `base_path` 为资源根目录（如 `assets`）。
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    fn resolve(&self, logical_path: &str) -> PathBuf {
        self.base_path.join(normalize_logical_path(logical_path))
    }
}

impl AssetSource for FsSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.resolve(path);

        std::fs::read(&full_path)
            .map_err(|e| ResourceError::from_io(full_path.to_string_lossy(), e))
    }

    fn full_path(&self, path: &str) -> String {
        self.resolve(path).to_string_lossy().to_string()
    }
}

/// 内存资源来源
///
/// 以逻辑路径为键保存字节，用于测试与内嵌资源。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个文件（路径会被规范化）
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize_logical_path(path), bytes.into());
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let key = normalize_logical_path(path);
        self.files
            .get(&key)
            .cloned()
            .ok_or(ResourceError::NotFound { path: key })
    }

    fn full_path(&self, path: &str) -> String {
        format!("<memory>/{}", normalize_logical_path(path))
    }
}
