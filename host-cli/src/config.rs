//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use vn_stage::{AvatarLayer, DialogueLayout, Rect};

use crate::keymap::TimedKey;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 候选字体（按顺序尝试，相对路径相对于工作目录）
    #[serde(default = "default_font_candidates")]
    pub font_candidates: Vec<String>,

    /// 日志级别（trace / debug / info / warn / error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 画布配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 帧循环配置
    #[serde(default)]
    pub headless: HeadlessConfig,

    /// 对话配置
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// 立绘配置
    #[serde(default)]
    pub avatar: AvatarConfig,

    /// 输入时间线；未配置时使用内置演示时间线
    #[serde(default)]
    pub timeline: Option<Vec<TimedKey>>,
}

/// 画布配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,

    /// 标题（仅用于日志）
    #[serde(default = "default_window_title")]
    pub title: String,
}

/// 帧循环配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessConfig {
    /// 运行帧数
    #[serde(default = "default_frames")]
    pub frames: u32,

    /// 目标帧率
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// 每隔多少帧导出一次画面（0 表示不导出）
    #[serde(default)]
    pub dump_every: u32,

    /// 导出目录
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// 按真实时间节奏运行（睡眠补足每帧剩余时间）
    #[serde(default)]
    pub realtime: bool,
}

/// 对话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// 打字速度（字符/秒）
    #[serde(default = "default_typewriter_speed")]
    pub typewriter_speed: f32,

    /// 对话框布局
    #[serde(default)]
    pub layout: DialogueLayout,
}

/// 立绘配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// 缩放
    #[serde(default = "default_avatar_scale")]
    pub scale: f32,

    /// 各图层的精灵表
    #[serde(default)]
    pub parts: Vec<PartConfig>,
}

/// 单个图层的精灵表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartConfig {
    pub layer: AvatarLayer,
    /// 逻辑路径（相对于 assets_root）
    pub path: String,
    /// 单帧源矩形
    pub rect: Rect,
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_font_candidates() -> Vec<String> {
    vec![
        "assets/fonts/arial.ttf".to_string(),
        "/System/Library/Fonts/Arial.ttf".to_string(),
        "/System/Library/Fonts/Helvetica.ttc".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_window_title() -> String {
    "Visual Novel Game".to_string()
}

fn default_frames() -> u32 {
    600
}

fn default_target_fps() -> u32 {
    60
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_typewriter_speed() -> f32 {
    30.0
}

fn default_avatar_scale() -> f32 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            font_candidates: default_font_candidates(),
            log_level: default_log_level(),
            window: WindowConfig::default(),
            headless: HeadlessConfig::default(),
            dialogue: DialogueConfig::default(),
            avatar: AvatarConfig::default(),
            timeline: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
        }
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            target_fps: default_target_fps(),
            dump_every: 0,
            out_dir: default_out_dir(),
            realtime: false,
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            typewriter_speed: default_typewriter_speed(),
            layout: DialogueLayout::default(),
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            scale: default_avatar_scale(),
            parts: Vec::new(),
        }
    }
}

/// [`AppConfig::resolve`] 的结果
#[derive(Debug)]
pub enum LoadOutcome {
    /// 成功读取配置文件
    Loaded,
    /// 文件不存在，使用默认配置
    Missing,
    /// 文件无效，使用默认配置
    Invalid(ConfigError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded)
    }

    pub fn log(&self, path: &Path) {
        match self {
            LoadOutcome::Loaded => info!(path = %path.display(), "配置文件加载成功"),
            LoadOutcome::Missing => {
                warn!(path = %path.display(), "配置文件不存在，使用默认配置")
            }
            LoadOutcome::Invalid(e) => warn!(error = %e, "配置文件无效，使用默认配置"),
        }
    }
}

impl AppConfig {
    /// 读取并解析配置文件
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 读取配置文件，不存在或解析失败时退回默认配置
    ///
    /// 不打印日志：调用方可能需要先根据配置初始化日志，再用
    /// [`LoadOutcome::log`] 报告结果。
    pub fn resolve(path: impl AsRef<Path>) -> (Self, LoadOutcome) {
        let path = path.as_ref();

        if !path.exists() {
            return (Self::default(), LoadOutcome::Missing);
        }

        match Self::try_load(path) {
            Ok(config) => (config, LoadOutcome::Loaded),
            Err(e) => (Self::default(), LoadOutcome::Invalid(e)),
        }
    }

    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let (config, outcome) = Self::resolve(path);
        outcome.log(path);
        config
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 每帧的固定时长（秒）
    pub fn frame_step(&self) -> f32 {
        1.0 / self.headless.target_fps.max(1) as f32
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "画布尺寸必须大于 0".to_string(),
            ));
        }

        if self.headless.target_fps == 0 || self.headless.target_fps > 240 {
            return Err(ConfigError::ValidationFailed(
                "目标帧率必须在 1 - 240 之间".to_string(),
            ));
        }

        if self.font_candidates.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "至少需要配置一个候选字体".to_string(),
            ));
        }

        let speed = self.dialogue.typewriter_speed;
        if !speed.is_finite() || speed < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "打字速度无效: {}",
                speed
            )));
        }

        if !(self.avatar.scale.is_finite() && self.avatar.scale > 0.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "立绘缩放无效: {}",
                self.avatar.scale
            )));
        }

        for part in &self.avatar.parts {
            if part.rect.w <= 0 || part.rect.h <= 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "图层 {:?} 的源矩形尺寸必须大于 0",
                    part.layer
                )));
            }
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "未知的日志级别: {}",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// 解析失败
    #[error("配置解析失败: {0}")]
    ParseFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
