//! # Asset 模块
//!
//! 资源句柄与资源提供者接口。
//!
//! ## 设计说明
//!
//! - 位图由 Host 的资源缓存持有，Stage 只克隆 `Arc` 句柄
//! - Stage 不解码图片字节，也不负责释放资源
//! - tint 不写回句柄，而是作为每次绘制的参数传给 [`DrawSurface`](crate::DrawSurface)

use std::fmt;
use std::sync::Arc;

use crate::geometry::Size;

/// RGBA8 位图
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    /// 行优先，每像素 4 字节
    pixels: Vec<u8>,
}

impl Bitmap {
    /// 从 RGBA8 像素创建位图
    ///
    /// 像素数量与尺寸不符时返回 `None`。
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// 纯色位图
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// 读取像素，越界返回 `None`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// 位图句柄
///
/// 引用计数共享；`label` 通常是资源的逻辑路径，仅用于日志与调试。
#[derive(Clone)]
pub struct AssetHandle {
    label: Arc<str>,
    bitmap: Arc<Bitmap>,
}

impl AssetHandle {
    pub fn new(label: impl Into<Arc<str>>, bitmap: Bitmap) -> Self {
        Self {
            label: label.into(),
            bitmap: Arc::new(bitmap),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn size(&self) -> Size {
        self.bitmap.size()
    }

    /// 两个句柄是否指向同一份位图
    pub fn same_asset(&self, other: &AssetHandle) -> bool {
        Arc::ptr_eq(&self.bitmap, &other.bitmap)
    }

    /// 当前共享该位图的句柄数量
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.bitmap)
    }
}

impl PartialEq for AssetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_asset(other)
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(f, "Asset({} {}x{})", self.label, size.width, size.height)
    }
}

/// 资源提供者
///
/// 按逻辑路径取得（必要时加载）位图；加载失败返回 `None`，由调用方跳过。
pub trait AssetProvider {
    fn get_or_load(&mut self, path: &str) -> Option<AssetHandle>;
}
