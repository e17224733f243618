//! # Stage 模块
//!
//! 把 [`InputCommand`] 解释为对立绘和对话引擎的修改，并统一驱动更新与绘制。
//!
//! ## 设计说明
//!
//! - Stage 拥有一个 [`Avatar`] 和一个 [`DialogueEngine`]
//! - 绘制顺序固定：先立绘，后对话框（对话框在上层）

use tracing::{debug, trace};

use crate::avatar::{Avatar, AvatarLayer};
use crate::dialogue::DialogueEngine;
use crate::input::{HAIR_PALETTE, InputCommand};
use crate::surface::DrawSurface;

/// 舞台
#[derive(Debug)]
pub struct Stage {
    avatar: Avatar,
    dialogue: DialogueEngine,
}

impl Stage {
    pub fn new(avatar: Avatar, dialogue: DialogueEngine) -> Self {
        Self { avatar, dialogue }
    }

    /// 处理一条输入指令
    pub fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::Advance => {
                if self.dialogue.is_active() {
                    self.dialogue.next_dialogue();
                } else {
                    trace!("对话未激活，忽略推进");
                }
            }
            InputCommand::Move { direction } => {
                let (dx, dy) = direction.delta();
                let pos = self.avatar.position().offset(dx, dy);
                self.avatar.set_position(pos.x, pos.y);
                self.avatar.start_animation();
            }
            InputCommand::StopMovement => self.avatar.stop_animation(),
            InputCommand::SelectColorPreset { index } => match HAIR_PALETTE.get(index) {
                Some(&color) => {
                    debug!(index, "切换头发颜色");
                    self.avatar.set_part_color(AvatarLayer::Hair, color);
                }
                None => trace!(index, "颜色预设越界，忽略"),
            },
            InputCommand::SelectChoice { index } => {
                self.dialogue.select_choice(index);
            }
        }
    }

    /// 先推进立绘动画，再推进对话
    pub fn update(&mut self, dt: f32) {
        self.avatar.update(dt);
        self.dialogue.update(dt);
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        self.avatar.render(surface);
        self.dialogue.render(surface);
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    pub fn dialogue_mut(&mut self) -> &mut DialogueEngine {
        &mut self.dialogue
    }

    /// 拆分为立绘与对话引擎（用于关闭时释放资源）
    pub fn into_parts(self) -> (Avatar, DialogueEngine) {
        (self.avatar, self.dialogue)
    }
}
