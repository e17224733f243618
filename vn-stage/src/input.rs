//! # Input 模块
//!
//! 定义 Host 向 Stage 传递的输入指令。
//!
//! ## 设计说明
//!
//! - Stage 不直接处理键盘事件，只处理语义化的指令
//! - 按键到指令的映射由 Host 决定
//! - 非法指令（越界下标、错误状态）由 Stage 忽略

use serde::{Deserialize, Serialize};

use crate::geometry::Color;

/// 每次移动的距离（像素）
pub const MOVE_STEP: i32 = 10;

/// HAIR 图层的预设颜色
pub const HAIR_PALETTE: [Color; 5] = [
    Color::rgb(255, 100, 100),
    Color::rgb(100, 255, 100),
    Color::rgb(100, 100, 255),
    Color::rgb(255, 255, 100),
    Color::rgb(255, 100, 255),
];

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// 该方向一步对应的位移
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-MOVE_STEP, 0),
            Direction::Right => (MOVE_STEP, 0),
            Direction::Up => (0, -MOVE_STEP),
            Direction::Down => (0, MOVE_STEP),
        }
    }
}

/// Host 向 Stage 传递的输入
///
/// - `Advance`：推进对话（打字中则跳过打字）
/// - `Move`：移动立绘并开始行走动画
/// - `StopMovement`：停止行走动画
/// - `SelectColorPreset`：从 [`HAIR_PALETTE`] 中选择头发颜色
/// - `SelectChoice`：选择对话选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputCommand {
    Advance,
    Move { direction: Direction },
    StopMovement,
    SelectColorPreset { index: usize },
    SelectChoice { index: usize },
}

impl InputCommand {
    pub fn move_to(direction: Direction) -> Self {
        Self::Move { direction }
    }

    pub fn color_preset(index: usize) -> Self {
        Self::SelectColorPreset { index }
    }

    pub fn choice(index: usize) -> Self {
        Self::SelectChoice { index }
    }
}
