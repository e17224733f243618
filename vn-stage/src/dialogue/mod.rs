//! # Dialogue 模块
//!
//! 对话队列、逐字显示与对话框绘制。
//!
//! ## 设计说明
//!
//! - 对话按 FIFO 顺序展示，选项只决定"何时"进入下一句，不决定"进入哪一句"
//! - 当前节点是出队后的独立值，已显示文本始终是正文的前缀切片
//! - 绘制只通过 [`DrawSurface`](crate::surface::DrawSurface) 完成，本模块不做任何 IO

mod engine;
mod layout;
mod node;
mod queue;
mod typewriter;

pub use engine::{DialogueEngine, DialoguePhase};
pub use layout::DialogueLayout;
pub use node::{DialogueChoice, DialogueNode};
pub use queue::DialogueQueue;
pub use typewriter::{DEFAULT_TYPEWRITER_SPEED, Typewriter};
