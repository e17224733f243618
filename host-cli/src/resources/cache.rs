//! # Asset Cache 模块
//!
//! 以逻辑路径为键的位图缓存。
//!
//! ## 设计说明
//!
//! - 缓存由会话创建并显式传递，会话结束时随之销毁
//! - 缓存只持有 `AssetHandle` 的一份引用，`unload` 之后已分发的句柄仍然有效
//! - 加载失败不进入缓存，下次访问会重新尝试

use std::collections::HashMap;

use tracing::{debug, info, warn};
use vn_stage::{AssetHandle, AssetProvider};

use super::path::normalize_logical_path;
use super::source::AssetSource;
use super::{ResourceError, decode_bitmap};

/// 位图缓存
pub struct AssetCache {
    source: Box<dyn AssetSource>,
    /// 逻辑路径 -> 句柄
    entries: HashMap<String, AssetHandle>,
    hits: u64,
    misses: u64,
    failures: u64,
}

impl AssetCache {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            failures: 0,
        }
    }

    /// 加载资源（已缓存则直接返回）
    pub fn load(&mut self, path: &str) -> Result<AssetHandle, ResourceError> {
        let key = normalize_logical_path(path);

        if let Some(handle) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(handle.clone());
        }
        self.misses += 1;

        let bytes = self.source.read(&key)?;
        let bitmap = decode_bitmap(&key, &bytes)?;
        let handle = AssetHandle::new(key.as_str(), bitmap);

        debug!(
            path = %self.source.full_path(&key),
            width = handle.size().width,
            height = handle.size().height,
            "位图加载完成"
        );
        self.entries.insert(key, handle.clone());
        Ok(handle)
    }

    /// 只查询缓存，不触发加载
    pub fn get(&self, path: &str) -> Option<AssetHandle> {
        self.entries.get(&normalize_logical_path(path)).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&normalize_logical_path(path))
    }

    /// 从缓存移除；返回是否确实移除了条目
    pub fn unload(&mut self, path: &str) -> bool {
        let removed = self.entries.remove(&normalize_logical_path(path)).is_some();
        if removed {
            debug!(path, "卸载位图");
        }
        removed
    }

    /// 清空缓存
    pub fn unload_all(&mut self) {
        if !self.entries.is_empty() {
            info!(count = self.entries.len(), "卸载全部位图");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            entries: self.entries.len(),
            used_bytes: self
                .entries
                .values()
                .map(|h| h.bitmap().pixels().len())
                .sum(),
            hits: self.hits,
            misses: self.misses,
            failures: self.failures,
            hit_rate: if lookups > 0 {
                self.hits as f64 / lookups as f64
            } else {
                0.0
            },
        }
    }
}

impl AssetProvider for AssetCache {
    fn get_or_load(&mut self, path: &str) -> Option<AssetHandle> {
        match self.load(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                self.failures += 1;
                warn!(path, error = %e, "位图加载失败");
                None
            }
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// 缓存条目数量
    pub entries: usize,
    /// 像素数据占用（字节）
    pub used_bytes: usize,
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 加载失败次数
    pub failures: u64,
    /// 命中率
    pub hit_rate: f64,
}

impl CacheStats {
    /// 格式化为可读字符串
    pub fn format(&self) -> String {
        format!(
            "Cache: {} entries, {:.1}KB, hit rate: {:.1}%, failures: {}",
            self.entries,
            self.used_bytes as f64 / 1024.0,
            self.hit_rate * 100.0,
            self.failures,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{MemorySource, tests::png_bytes};

    fn cache() -> AssetCache {
        let source = MemorySource::new()
            .with_file("characters/base.png", png_bytes(4, 2, [255, 0, 0, 255]))
            .with_file("characters/broken.png", b"not a png".to_vec());
        AssetCache::new(source)
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = cache();
        let first = cache.get_or_load("characters/base.png").unwrap();
        let second = cache.get_or_load("./assets/characters/base.png").unwrap();

        assert!(first.same_asset(&second));
        assert_eq!(first.size().width, 4);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.used_bytes, 4 * 2 * 4);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = cache();
        assert!(cache.get_or_load("characters/missing.png").is_none());
        assert!(cache.get_or_load("characters/broken.png").is_none());
        assert!(matches!(
            cache.load("characters/broken.png"),
            Err(ResourceError::Decode { .. })
        ));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().failures, 2);
    }

    #[test]
    fn test_get_does_not_load() {
        let mut cache = cache();
        assert!(cache.get("characters/base.png").is_none());
        cache.get_or_load("characters/base.png");
        assert!(cache.get("characters/base.png").is_some());
    }

    #[test]
    fn test_unload_keeps_outstanding_handles() {
        let mut cache = cache();
        let handle = cache.get_or_load("characters/base.png").unwrap();
        assert_eq!(handle.share_count(), 2);

        assert!(cache.unload("characters/base.png"));
        assert!(!cache.unload("characters/base.png"));
        assert_eq!(handle.share_count(), 1);
        assert_eq!(handle.bitmap().pixel(0, 0), Some([255, 0, 0, 255]));

        // 重新加载得到新的位图
        let reloaded = cache.get_or_load("characters/base.png").unwrap();
        assert!(!reloaded.same_asset(&handle));
    }

    #[test]
    fn test_unload_all() {
        let mut cache = cache();
        cache.get_or_load("characters/base.png");
        cache.unload_all();
        assert!(cache.is_empty());
        assert!(!cache.contains("characters/base.png"));
    }

    #[test]
    fn test_cache_stats_format() {
        let stats = CacheStats {
            entries: 3,
            used_bytes: 2048,
            hits: 8,
            misses: 2,
            failures: 1,
            hit_rate: 0.8,
        };
        let formatted = stats.format();
        assert!(formatted.contains("3 entries"));
        assert!(formatted.contains("2.0KB"));
        assert!(formatted.contains("80.0%"));
    }
}
