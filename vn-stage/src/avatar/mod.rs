//! # Avatar 模块
//!
//! 分层立绘：按固定顺序合成多个图层，并驱动 BASE 图层的行走帧动画。
//!
//! ## 动画模型
//!
//! ```text
//! update(dt):
//!   clock += dt
//!   while clock + TIME_EPSILON >= FRAME_DURATION:
//!       clock -= FRAME_DURATION
//!       frame = (frame + 1) % FRAME_COUNT
//! ```
//!
//! 动画只影响 BASE 图层：动画进行中其源矩形的 x 取 `frame * width`，
//! 即横向排列的精灵表。

mod layer;

pub use layer::{AvatarLayer, LayerStore, PartRecord};

use tracing::{debug, trace};

use crate::asset::AssetHandle;
use crate::geometry::{Color, Point, Rect, RectF};
use crate::surface::DrawSurface;

/// 默认位置：1280×720 画布中心
pub const DEFAULT_POSITION: Point = Point::new(640, 360);
/// 每帧持续时间（秒）
pub const FRAME_DURATION: f32 = 0.1;
/// 行走循环帧数
pub const FRAME_COUNT: u32 = 4;
/// 比较时钟与帧时长时的容差，吸收 f32 累加的舍入误差
const TIME_EPSILON: f32 = 1e-4;

/// 单个图层的绘制参数
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDraw {
    pub layer: AvatarLayer,
    pub asset: AssetHandle,
    pub src: RectF,
    pub dst: RectF,
    pub tint: Color,
}

/// 分层立绘
#[derive(Debug, Clone)]
pub struct Avatar {
    layers: LayerStore,
    position: Point,
    scale: f32,
    current_frame: u32,
    animation_time: f32,
    animating: bool,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new()
    }
}

impl Avatar {
    pub fn new() -> Self {
        Self {
            layers: LayerStore::new(),
            position: DEFAULT_POSITION,
            scale: 1.0,
            current_frame: 0,
            animation_time: 0.0,
            animating: false,
        }
    }

    /// 设置图层的位图与源矩形
    pub fn set_part(&mut self, layer: AvatarLayer, asset: Option<AssetHandle>, source_rect: Rect) {
        debug!(layer = ?layer, asset = ?asset, "设置立绘部件");
        self.layers.set(layer, asset, source_rect);
    }

    /// 设置图层颜色；图层尚未设置时忽略
    pub fn set_part_color(&mut self, layer: AvatarLayer, color: Color) {
        if !self.layers.set_tint(layer, color) {
            trace!(layer = ?layer, "图层未设置，忽略颜色修改");
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Point::new(x, y);
    }

    /// 设置缩放（不做校验）
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn part(&self, layer: AvatarLayer) -> Option<&PartRecord> {
        self.layers.get(layer)
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// 推进动画时钟
    pub fn update(&mut self, dt: f32) {
        if !self.animating {
            return;
        }

        self.animation_time += dt;
        while self.animation_time + TIME_EPSILON >= FRAME_DURATION {
            self.animation_time -= FRAME_DURATION;
            self.current_frame = (self.current_frame + 1) % FRAME_COUNT;
        }
    }

    pub fn start_animation(&mut self) {
        self.animating = true;
        self.current_frame = 0;
        self.animation_time = 0.0;
    }

    pub fn stop_animation(&mut self) {
        self.animating = false;
        self.current_frame = 0;
        self.animation_time = 0.0;
    }

    /// 计算本帧需要绘制的图层（已按绘制顺序排列）
    ///
    /// 没有位图的图层被跳过。
    pub fn draw_plan(&self) -> Vec<LayerDraw> {
        AvatarLayer::DRAW_ORDER
            .iter()
            .filter_map(|&layer| {
                let part = self.layers.get(layer)?;
                let asset = part.asset.as_ref()?;
                let rect = part.source_rect;

                let w = rect.w as f32 * self.scale;
                let h = rect.h as f32 * self.scale;
                let dst = RectF::centered_on(self.position, w, h);

                let mut src = rect.to_f32();
                if self.animating && layer == AvatarLayer::Base {
                    src.x = (self.current_frame as i32 * rect.w) as f32;
                }

                Some(LayerDraw {
                    layer,
                    asset: asset.clone(),
                    src,
                    dst,
                    tint: part.tint,
                })
            })
            .collect()
    }

    /// 从后往前绘制所有图层
    pub fn render(&self, surface: &mut dyn DrawSurface) {
        for draw in self.draw_plan() {
            surface.blit(&draw.asset, draw.src, draw.dst, draw.tint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Bitmap;
    use crate::surface::{DrawCall, RecordingSurface};

    fn sheet(label: &str) -> AssetHandle {
        AssetHandle::new(label, Bitmap::solid(256, 128, [255, 255, 255, 255]))
    }

    fn dressed_avatar() -> Avatar {
        let mut avatar = Avatar::new();
        // 故意打乱设置顺序
        avatar.set_part(AvatarLayer::Accessory, Some(sheet("acc")), Rect::new(0, 0, 64, 128));
        avatar.set_part(AvatarLayer::Eyes, Some(sheet("eyes")), Rect::new(0, 0, 64, 128));
        avatar.set_part(AvatarLayer::Hair, Some(sheet("hair")), Rect::new(0, 0, 64, 128));
        avatar.set_part(AvatarLayer::Outfit, Some(sheet("outfit")), Rect::new(0, 0, 64, 128));
        avatar.set_part(AvatarLayer::Base, Some(sheet("base")), Rect::new(0, 0, 64, 128));
        avatar
    }

    #[test]
    fn test_defaults() {
        let avatar = Avatar::new();
        assert_eq!(avatar.position(), Point::new(640, 360));
        assert_eq!(avatar.scale(), 1.0);
        assert_eq!(avatar.current_frame(), 0);
        assert!(!avatar.is_animating());
        assert!(avatar.layers().is_empty());
    }

    #[test]
    fn test_render_order_is_fixed() {
        let avatar = dressed_avatar();
        let mut surface = RecordingSurface::new();
        avatar.render(&mut surface);
        assert_eq!(
            surface.blitted_assets(),
            vec!["base", "outfit", "hair", "eyes", "acc"]
        );
    }

    #[test]
    fn test_destination_is_centered_and_scaled() {
        let mut avatar = Avatar::new();
        avatar.set_part(AvatarLayer::Base, Some(sheet("base")), Rect::new(0, 0, 64, 128));
        avatar.set_position(100, 200);
        avatar.set_scale(2.0);

        let plan = avatar.draw_plan();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].dst, RectF::new(36.0, 72.0, 128.0, 256.0));
        assert_eq!(plan[0].src, RectF::new(0.0, 0.0, 64.0, 128.0));
    }

    #[test]
    fn test_tint_is_passed_per_draw() {
        // 两个图层共用同一份位图，各自的 tint 互不影响
        let shared = sheet("shared");
        let mut avatar = Avatar::new();
        avatar.set_part(AvatarLayer::Hair, Some(shared.clone()), Rect::new(0, 0, 8, 8));
        avatar.set_part(AvatarLayer::Eyes, Some(shared), Rect::new(8, 0, 8, 8));
        avatar.set_part_color(AvatarLayer::Hair, Color::rgb(255, 100, 100));

        let mut surface = RecordingSurface::new();
        avatar.render(&mut surface);
        let tints: Vec<Color> = surface
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Blit { tint, .. } => Some(*tint),
                _ => None,
            })
            .collect();
        assert_eq!(tints, vec![Color::rgb(255, 100, 100), Color::WHITE]);
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        let mut avatar = Avatar::new();
        avatar.set_part(AvatarLayer::Base, None, Rect::new(0, 0, 64, 128));
        avatar.set_part(AvatarLayer::Hair, Some(sheet("hair")), Rect::new(0, 0, 64, 128));
        // 记录存在，tint 可以修改，但不会绘制
        avatar.set_part_color(AvatarLayer::Base, Color::rgb(1, 2, 3));
        assert_eq!(avatar.part(AvatarLayer::Base).unwrap().tint, Color::rgb(1, 2, 3));

        let mut surface = RecordingSurface::new();
        avatar.render(&mut surface);
        assert_eq!(surface.blitted_assets(), vec!["hair"]);
    }

    #[test]
    fn test_color_on_unset_layer_creates_nothing() {
        let mut avatar = Avatar::new();
        avatar.set_part_color(AvatarLayer::Hair, Color::rgb(255, 100, 100));
        assert!(avatar.part(AvatarLayer::Hair).is_none());

        let mut surface = RecordingSurface::new();
        avatar.render(&mut surface);
        assert!(surface.calls().is_empty());

        // 之后首次设置部件仍然是默认白色
        avatar.set_part(AvatarLayer::Hair, Some(sheet("hair")), Rect::new(0, 0, 1, 1));
        assert_eq!(avatar.part(AvatarLayer::Hair).unwrap().tint, Color::WHITE);
    }

    #[test]
    fn test_update_without_animation_does_nothing() {
        let mut avatar = Avatar::new();
        avatar.update(1.0);
        assert_eq!(avatar.current_frame(), 0);
    }

    #[test]
    fn test_multiple_frames_per_tick() {
        let mut avatar = Avatar::new();
        avatar.start_animation();
        avatar.update(0.35);
        assert_eq!(avatar.current_frame(), 3);
        // 累计 0.6s，共 6 次阈值 → 6 % 4 == 2
        avatar.update(0.25);
        assert_eq!(avatar.current_frame(), 2);
    }

    #[test]
    fn test_frame_follows_elapsed_time() {
        // 7 × 0.25s = 1.75s → 17 次阈值 → 17 % 4 == 1
        let mut avatar = Avatar::new();
        avatar.start_animation();
        let mut elapsed = 0.0f32;
        for _ in 0..7 {
            avatar.update(0.25);
            elapsed += 0.25;
        }
        let expected = ((elapsed / FRAME_DURATION).floor() as u32) % FRAME_COUNT;
        assert_eq!(elapsed, 1.75);
        assert_eq!(avatar.current_frame(), expected);
        assert_eq!(avatar.current_frame(), 1);
    }

    #[test]
    fn test_frame_matches_elapsed_for_decimal_steps() {
        // (dt, 次数, 经过的帧阈值数 ⌊T / 0.1⌋)
        let cases: [(f32, u32, u32); 8] = [
            (0.01, 10, 1),
            (0.01, 30, 3),
            (0.02, 5, 1),
            (0.03, 10, 3),
            (0.07, 3, 2),
            (0.05, 7, 3),
            (1.0 / 60.0, 60, 10),
            (1.0 / 60.0, 600, 100),
        ];
        for (dt, steps, crossings) in cases {
            let mut avatar = Avatar::new();
            avatar.start_animation();
            for _ in 0..steps {
                avatar.update(dt);
            }
            assert_eq!(
                avatar.current_frame(),
                crossings % FRAME_COUNT,
                "dt = {dt}, steps = {steps}"
            );
        }
    }

    #[test]
    fn test_mixed_steps_reach_same_frame() {
        // 三组不同的 Δt 序列，总和都是 0.3s
        let sequences: [&[f32]; 3] = [
            &[0.1, 0.1, 0.1],
            &[0.05, 0.15, 0.04, 0.06],
            &[0.3],
        ];
        for seq in sequences {
            let mut avatar = Avatar::new();
            avatar.start_animation();
            for &dt in seq {
                avatar.update(dt);
            }
            assert_eq!(avatar.current_frame(), 3, "{seq:?}");
        }
    }

    #[test]
    fn test_small_steps_accumulate() {
        let mut avatar = Avatar::new();
        avatar.start_animation();
        avatar.update(0.06);
        assert_eq!(avatar.current_frame(), 0);
        avatar.update(0.06);
        assert_eq!(avatar.current_frame(), 1);
    }

    #[test]
    fn test_stop_resets_frame() {
        let mut avatar = Avatar::new();
        avatar.start_animation();
        avatar.update(0.25);
        assert_eq!(avatar.current_frame(), 2);
        avatar.stop_animation();
        assert!(!avatar.is_animating());
        assert_eq!(avatar.current_frame(), 0);

        // 重新开始时从第 0 帧、时钟 0 计
        avatar.start_animation();
        avatar.update(0.05);
        assert_eq!(avatar.current_frame(), 0);
    }

    #[test]
    fn test_base_layer_walk_cycle_offset() {
        let mut avatar = dressed_avatar();
        avatar.set_part(AvatarLayer::Base, Some(sheet("base")), Rect::new(5, 0, 64, 128));
        avatar.start_animation();
        avatar.update(0.25);

        let plan = avatar.draw_plan();
        let base = plan.iter().find(|d| d.layer == AvatarLayer::Base).unwrap();
        assert_eq!(base.src.x, 128.0);
        // 其他图层不受动画影响
        let hair = plan.iter().find(|d| d.layer == AvatarLayer::Hair).unwrap();
        assert_eq!(hair.src.x, 0.0);

        // 停止后恢复原始源矩形
        avatar.stop_animation();
        let plan = avatar.draw_plan();
        assert_eq!(plan[0].src.x, 5.0);
    }
}
