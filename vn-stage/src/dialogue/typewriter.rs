//! # Typewriter 模块
//!
//! 按时间逐字显示文本。
//!
//! 进度只由 `dt * speed` 的累积决定，与帧率无关：
//! 累积量每满 1.0 显示一个字符，一次 `advance` 可以显示多个字符。

/// 默认显示速度（字符/秒）
pub const DEFAULT_TYPEWRITER_SPEED: f32 = 30.0;
/// 判断累积量是否满 1.0 时的容差，吸收 f32 累加的舍入误差
const REVEAL_EPSILON: f32 = 1e-4;

/// 打字机状态
///
/// 不持有文本本身；每次调用都传入当前节点的正文。
#[derive(Debug, Clone, PartialEq)]
pub struct Typewriter {
    speed: f32,
    accumulator: f32,
    /// 已显示字符数
    cursor: usize,
    /// `cursor` 对应的字节偏移
    byte_pos: usize,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_TYPEWRITER_SPEED)
    }
}

impl Typewriter {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.max(0.0),
            accumulator: 0.0,
            cursor: 0,
            byte_pos: 0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// 已显示字符数
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 回到文本开头
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.cursor = 0;
        self.byte_pos = 0;
    }

    /// 推进 `dt` 秒，返回本次新显示的字符数
    pub fn advance(&mut self, dt: f32, text: &str) -> usize {
        self.accumulator += dt * self.speed;

        let mut revealed = 0;
        while self.accumulator + REVEAL_EPSILON >= 1.0 {
            let Some(ch) = text[self.byte_pos..].chars().next() else {
                break;
            };
            self.byte_pos += ch.len_utf8();
            self.cursor += 1;
            self.accumulator -= 1.0;
            revealed += 1;
        }
        revealed
    }

    /// 立即显示全部文本
    pub fn finish(&mut self, text: &str) {
        self.cursor += text[self.byte_pos..].chars().count();
        self.byte_pos = text.len();
    }

    /// 已显示的前缀
    pub fn revealed<'a>(&self, text: &'a str) -> &'a str {
        &text[..self.byte_pos]
    }

    pub fn is_complete(&self, text: &str) -> bool {
        self.byte_pos >= text.len()
    }
}
