//! # VN Stage
//!
//! 视觉小说舞台层的核心库：分层立绘合成 + 对话引擎。
//!
//! ## 架构概述
//!
//! `vn-stage` 是纯逻辑核心，不依赖任何窗口、IO 或具体渲染后端。
//! 它与宿主层（Host）之间只通过几个窄接口交互：
//!
//! ```text
//! Host                                   Stage
//!   │                                      │
//!   │──── InputCommand ──────────────────►│ apply()
//!   │──── dt ────────────────────────────►│ update()
//!   │──── &mut impl DrawSurface ─────────►│ render()
//!   │◄─── fill_rect / blit / rasterize ───│
//! ```
//!
//! ## 核心类型
//!
//! - [`Avatar`]：分层立绘（BASE / HAIR / EYES / OUTFIT / ACCESSORY）
//! - [`DialogueEngine`]：对话队列 + 打字机效果 + 选项
//! - [`Stage`]：把 [`InputCommand`] 解释为对上面两者的修改
//! - [`DrawSurface`]：Host 提供的绘制接口
//! - [`AssetHandle`]：Host 持有、Stage 借用的位图句柄
//!
//! ## 使用示例
//!
//! ```ignore
//! let engine = DialogueEngine::initialize(&loader, &candidates, DialogueLayout::default())?;
//! let mut stage = Stage::new(Avatar::new(), engine);
//!
//! loop {
//!     for cmd in host.poll_commands() {
//!         stage.apply(cmd);
//!     }
//!     stage.update(dt);
//!     stage.render(&mut surface);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`asset`]：资源句柄与资源提供者接口
//! - [`avatar`]：分层立绘
//! - [`dialogue`]：对话节点、队列与引擎
//! - [`error`]：错误类型定义
//! - [`geometry`]：点、矩形、颜色
//! - [`input`]：输入指令
//! - [`stage`]：指令分发
//! - [`surface`]：绘制接口与录制实现
//! - [`typeface`]：字体来源与加载接口

pub mod asset;
pub mod avatar;
pub mod dialogue;
pub mod error;
pub mod geometry;
pub mod input;
pub mod stage;
pub mod surface;
pub mod typeface;

// 重导出核心类型
pub use asset::{AssetHandle, AssetProvider, Bitmap};
pub use avatar::{Avatar, AvatarLayer, LayerDraw, LayerStore, PartRecord};
pub use dialogue::{
    DialogueChoice, DialogueEngine, DialogueLayout, DialogueNode, DialoguePhase, DialogueQueue,
};
pub use error::{InitError, StageResult, TypefaceError};
pub use geometry::{Color, Point, Rect, RectF, Size};
pub use input::{Direction, HAIR_PALETTE, InputCommand, MOVE_STEP};
pub use stage::Stage;
pub use surface::{DrawCall, DrawSurface, RasterizedText, RecordingSurface, wrap_lines};
pub use typeface::{FontSource, Typeface, TypefaceLoader};
