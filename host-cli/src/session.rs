//! # Session 模块
//!
//! 一次运行的全部状态：资源缓存、舞台、输入时间线。
//!
//! ## 生命周期
//!
//! ```text
//! Session::new        -> 加载字体、立绘部件、演示对话
//! Session::step × N   -> 输入 → update
//! Session::render × N -> 立绘 → 对话框
//! Session::shutdown   -> 释放对话引擎与缓存
//! ```

use tracing::{debug, info, warn};
use vn_stage::{
    AssetProvider, Avatar, DialogueChoice, DialogueEngine, DialogueNode, DrawSurface, StageResult,
    Stage, TypefaceLoader,
};

use crate::config::{AppConfig, AvatarConfig};
use crate::font::{FsTypefaceLoader, file_candidates};
use crate::keymap::{InputTimeline, KeyAction, demo_timeline, translate};
use crate::resources::{AssetCache, AssetSource, CacheStats, FsSource};

/// 演示对话
pub fn demo_dialogue() -> Vec<DialogueNode> {
    vec![
        DialogueNode::new(
            "Player",
            "Welcome to our visual novel game! Press SPACE to continue, Arrow keys to move.",
        ),
        DialogueNode::new(
            "System",
            "You can customize your character using the number keys.",
        ),
        DialogueNode::new("Player", "Shall we begin?").with_choices([
            DialogueChoice::new("Yes", 1),
            DialogueChoice::new("Not yet", 2),
        ]),
    ]
}

/// 按配置组装立绘；加载失败的部件以"无位图"记录
pub fn build_avatar(config: &AvatarConfig, provider: &mut dyn AssetProvider) -> Avatar {
    let mut avatar = Avatar::new();
    avatar.set_scale(config.scale);
    for part in &config.parts {
        let asset = provider.get_or_load(&part.path);
        if asset.is_none() {
            warn!(layer = ?part.layer, path = %part.path, "立绘部件缺失，该图层不会绘制");
        }
        avatar.set_part(part.layer, asset, part.rect);
    }
    avatar
}

/// 运行会话
pub struct Session {
    cache: AssetCache,
    stage: Stage,
    timeline: InputTimeline,
    frame: u64,
    quit_requested: bool,
}

impl Session {
    /// 使用文件系统资源与字体创建会话
    pub fn new(config: &AppConfig) -> StageResult<Self> {
        Self::with_sources(
            config,
            FsSource::new(&config.assets_root),
            &FsTypefaceLoader::new(),
        )
    }

    /// 使用指定的资源来源与字体加载器创建会话
    pub fn with_sources(
        config: &AppConfig,
        source: impl AssetSource + 'static,
        loader: &dyn TypefaceLoader,
    ) -> StageResult<Self> {
        let candidates = file_candidates(&config.font_candidates);
        let mut engine =
            DialogueEngine::initialize(loader, &candidates, config.dialogue.layout.clone())?;
        engine.set_typewriter_speed(config.dialogue.typewriter_speed);

        let mut cache = AssetCache::new(source);
        let avatar = build_avatar(&config.avatar, &mut cache);

        for node in demo_dialogue() {
            engine.add_dialogue(node);
        }
        engine.start_dialogue();

        let events = config.timeline.clone().unwrap_or_else(demo_timeline);
        let timeline = InputTimeline::new(events);
        info!(
            title = %config.window.title,
            parts = config.avatar.parts.len(),
            inputs = timeline.len(),
            "会话初始化完成"
        );

        Ok(Self {
            cache,
            stage: Stage::new(avatar, engine),
            timeline,
            frame: 0,
            quit_requested: false,
        })
    }

    /// 处理当前帧的输入并推进 `dt` 秒
    ///
    /// 收到退出请求后返回 `false`，此时不再推进。
    pub fn step(&mut self, dt: f32) -> bool {
        for event in self.timeline.drain_until(self.frame) {
            match translate(event.key, event.state) {
                Some(KeyAction::Command(command)) => {
                    debug!(frame = self.frame, command = ?command, "输入");
                    self.stage.apply(command);
                }
                Some(KeyAction::Quit) => {
                    info!(frame = self.frame, "收到退出请求");
                    self.quit_requested = true;
                }
                None => {}
            }
        }
        if self.quit_requested {
            return false;
        }

        self.stage.update(dt);
        self.frame += 1;
        true
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        self.stage.render(surface);
    }

    /// 已完成的帧数
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut AssetCache {
        &mut self.cache
    }

    /// 关闭对话引擎并清空缓存，返回关闭前的缓存统计
    pub fn shutdown(self) -> CacheStats {
        let Session {
            mut cache, stage, ..
        } = self;
        let (_avatar, engine) = stage.into_parts();
        engine.shutdown();

        let stats = cache.stats();
        cache.unload_all();
        info!("{}", stats.format());
        stats
    }
}
