//! # Host CLI
//!
//! vn-stage 的无窗口宿主：资源加载、软件渲染、帧循环。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 配置加载（config.json + 命令行）
//! - 位图解码与缓存
//! - 字体加载
//! - CPU 画布渲染与画面导出
//! - 按键时间线 → `InputCommand`
//!
//! Host 层不包含对话与立绘逻辑，只驱动 [`vn_stage::Stage`]。

pub mod config;
pub mod font;
pub mod headless;
pub mod keymap;
pub mod resources;
pub mod session;
pub mod surface;

pub use config::{
    AppConfig, AvatarConfig, ConfigError, DialogueConfig, HeadlessConfig, LoadOutcome, PartConfig,
    WindowConfig,
};
pub use font::FsTypefaceLoader;
pub use headless::{BACKGROUND, FrameTarget, RunOptions, RunSummary, run};
pub use keymap::{InputTimeline, Key, KeyAction, KeyState, TimedKey};
pub use resources::{AssetCache, AssetSource, CacheStats, FsSource, MemorySource, ResourceError};
pub use session::Session;
pub use surface::CanvasSurface;
