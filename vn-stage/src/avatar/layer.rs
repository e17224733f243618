//! # Layer 模块
//!
//! 立绘图层枚举与图层存储。

use serde::{Deserialize, Serialize};

use crate::asset::AssetHandle;
use crate::geometry::{Color, Rect};

/// 立绘图层
///
/// 声明顺序不代表绘制顺序，绘制顺序见 [`AvatarLayer::DRAW_ORDER`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarLayer {
    Base,
    Hair,
    Eyes,
    Outfit,
    Accessory,
}

impl AvatarLayer {
    /// 所有图层（声明顺序）
    pub const ALL: [AvatarLayer; 5] = [
        AvatarLayer::Base,
        AvatarLayer::Hair,
        AvatarLayer::Eyes,
        AvatarLayer::Outfit,
        AvatarLayer::Accessory,
    ];

    /// 从后往前的绘制顺序
    pub const DRAW_ORDER: [AvatarLayer; 5] = [
        AvatarLayer::Base,
        AvatarLayer::Outfit,
        AvatarLayer::Hair,
        AvatarLayer::Eyes,
        AvatarLayer::Accessory,
    ];

    fn slot(self) -> usize {
        match self {
            AvatarLayer::Base => 0,
            AvatarLayer::Hair => 1,
            AvatarLayer::Eyes => 2,
            AvatarLayer::Outfit => 3,
            AvatarLayer::Accessory => 4,
        }
    }
}

/// 单个图层的部件
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    /// 位图句柄；`None` 表示记录存在但没有可绘制的图
    pub asset: Option<AssetHandle>,
    /// 在位图中的源矩形
    pub source_rect: Rect,
    /// 调制颜色（含 alpha）
    pub tint: Color,
}

impl PartRecord {
    pub fn new(asset: Option<AssetHandle>, source_rect: Rect) -> Self {
        Self {
            asset,
            source_rect,
            tint: Color::WHITE,
        }
    }
}

/// 图层存储：每个图层至多一条记录
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    slots: [Option<PartRecord>; 5],
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, layer: AvatarLayer) -> Option<&PartRecord> {
        self.slots[layer.slot()].as_ref()
    }

    pub fn contains(&self, layer: AvatarLayer) -> bool {
        self.get(layer).is_some()
    }

    /// 写入位图与源矩形
    ///
    /// 新记录的 tint 为不透明白色；已有记录保留原 tint。
    pub fn set(&mut self, layer: AvatarLayer, asset: Option<AssetHandle>, source_rect: Rect) {
        let slot = &mut self.slots[layer.slot()];
        if let Some(record) = slot.as_mut() {
            record.asset = asset;
            record.source_rect = source_rect;
            return;
        }
        *slot = Some(PartRecord::new(asset, source_rect));
    }

    /// 修改 tint；图层不存在时返回 `false` 且不创建记录
    pub fn set_tint(&mut self, layer: AvatarLayer, tint: Color) -> bool {
        match self.slots[layer.slot()].as_mut() {
            Some(record) => {
                record.tint = tint;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Bitmap;

    fn handle(label: &str) -> AssetHandle {
        AssetHandle::new(label, Bitmap::solid(4, 4, [255, 255, 255, 255]))
    }

    #[test]
    fn test_draw_order_is_permutation() {
        let mut sorted = AvatarLayer::DRAW_ORDER;
        sorted.sort();
        assert_eq!(sorted, AvatarLayer::ALL);
        assert_ne!(AvatarLayer::DRAW_ORDER, AvatarLayer::ALL);
    }

    #[test]
    fn test_new_record_has_white_tint() {
        let mut store = LayerStore::new();
        store.set(AvatarLayer::Hair, Some(handle("hair")), Rect::new(0, 0, 4, 4));
        assert_eq!(store.get(AvatarLayer::Hair).unwrap().tint, Color::WHITE);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_keeps_tint() {
        let mut store = LayerStore::new();
        let red = Color::rgb(255, 100, 100);
        store.set(AvatarLayer::Hair, Some(handle("a")), Rect::new(0, 0, 4, 4));
        assert!(store.set_tint(AvatarLayer::Hair, red));
        store.set(AvatarLayer::Hair, Some(handle("b")), Rect::new(0, 0, 2, 2));

        let record = store.get(AvatarLayer::Hair).unwrap();
        assert_eq!(record.tint, red);
        assert_eq!(record.source_rect, Rect::new(0, 0, 2, 2));
        assert_eq!(record.asset.as_ref().unwrap().label(), "b");
    }

    #[test]
    fn test_tint_on_missing_layer() {
        let mut store = LayerStore::new();
        assert!(!store.set_tint(AvatarLayer::Eyes, Color::rgb(1, 2, 3)));
        assert!(!store.contains(AvatarLayer::Eyes));
        assert!(store.is_empty());
    }

    #[test]
    fn test_layer_serde_name() {
        let json = serde_json::to_string(&AvatarLayer::Accessory).unwrap();
        assert_eq!(json, "\"accessory\"");
    }
}
