//! # Keymap 模块
//!
//! 把按键事件翻译为 [`InputCommand`]，并提供按帧排列的输入时间线。
//!
//! ## 按键映射
//!
//! | 按键 | 按下 | 松开 |
//! |------|------|------|
//! | Space | `Advance`（仅对话激活时生效，由 Stage 判断） | - |
//! | 方向键 | `Move` | `StopMovement` |
//! | 1 - 5 | `SelectColorPreset(0..=4)` | - |
//! | F1 - F4 | `SelectChoice(0..=3)`（仅等待选择时生效） | - |
//! | Escape | 退出 | - |

use serde::{Deserialize, Serialize};
use vn_stage::{Direction, InputCommand};

/// 按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Space,
    Escape,
    Left,
    Right,
    Up,
    Down,
    #[serde(rename = "1")]
    Num1,
    #[serde(rename = "2")]
    Num2,
    #[serde(rename = "3")]
    Num3,
    #[serde(rename = "4")]
    Num4,
    #[serde(rename = "5")]
    Num5,
    F1,
    F2,
    F3,
    F4,
}

impl Key {
    fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            _ => None,
        }
    }

    fn preset_index(self) -> Option<usize> {
        match self {
            Key::Num1 => Some(0),
            Key::Num2 => Some(1),
            Key::Num3 => Some(2),
            Key::Num4 => Some(3),
            Key::Num5 => Some(4),
            _ => None,
        }
    }

    fn choice_index(self) -> Option<usize> {
        match self {
            Key::F1 => Some(0),
            Key::F2 => Some(1),
            Key::F3 => Some(2),
            Key::F4 => Some(3),
            _ => None,
        }
    }
}

/// 按键动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    Pressed,
    Released,
}

/// 翻译结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(InputCommand),
    Quit,
}

/// 把一次按键事件翻译为动作；无对应动作时返回 `None`
pub fn translate(key: Key, state: KeyState) -> Option<KeyAction> {
    match state {
        KeyState::Pressed => {
            if key == Key::Escape {
                return Some(KeyAction::Quit);
            }
            if key == Key::Space {
                return Some(KeyAction::Command(InputCommand::Advance));
            }
            if let Some(direction) = key.direction() {
                return Some(KeyAction::Command(InputCommand::move_to(direction)));
            }
            if let Some(index) = key.choice_index() {
                return Some(KeyAction::Command(InputCommand::choice(index)));
            }
            key.preset_index()
                .map(|index| KeyAction::Command(InputCommand::color_preset(index)))
        }
        KeyState::Released => key
            .direction()
            .map(|_| KeyAction::Command(InputCommand::StopMovement)),
    }
}

/// 时间线上的一次按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedKey {
    /// 触发帧（从 0 开始）
    pub frame: u64,
    pub key: Key,
    #[serde(default = "default_key_state")]
    pub state: KeyState,
}

fn default_key_state() -> KeyState {
    KeyState::Pressed
}

impl TimedKey {
    pub fn press(frame: u64, key: Key) -> Self {
        Self {
            frame,
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn release(frame: u64, key: Key) -> Self {
        Self {
            frame,
            key,
            state: KeyState::Released,
        }
    }
}

/// 按帧排序的输入时间线
#[derive(Debug, Clone, Default)]
pub struct InputTimeline {
    events: Vec<TimedKey>,
    cursor: usize,
}

impl InputTimeline {
    pub fn new(mut events: Vec<TimedKey>) -> Self {
        // 稳定排序，同一帧内保持原有顺序
        events.sort_by_key(|e| e.frame);
        Self { events, cursor: 0 }
    }

    /// 取出 `frame` 及之前所有未处理的事件
    pub fn drain_until(&mut self, frame: u64) -> &[TimedKey] {
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.frame <= frame)
        {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 内置演示时间线（60 fps 下约 4 秒）
///
/// 跳过第一句 → 进入第二句 → 走几步 → 换发色 → 跳过第二句 → 第三句选择选项后结束对话。
pub fn demo_timeline() -> Vec<TimedKey> {
    vec![
        TimedKey::press(30, Key::Space),
        TimedKey::press(60, Key::Space),
        TimedKey::press(90, Key::Right),
        TimedKey::press(95, Key::Right),
        TimedKey::press(100, Key::Down),
        TimedKey::release(120, Key::Down),
        TimedKey::press(130, Key::Num2),
        TimedKey::press(150, Key::Space),
        TimedKey::press(180, Key::Space),
        TimedKey::press(220, Key::F1),
    ]
}
