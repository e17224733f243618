//! # Headless 模块
//!
//! 无窗口帧循环：输入 → update → render → （可选）导出画面。
//!
//! ## 时间步
//!
//! - 默认模式：每帧固定 `1 / target_fps` 秒，结果可复现
//! - realtime 模式：测量每帧实际耗时作为下一帧的 Δt，不足一帧的部分睡眠补足

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};
use vn_stage::{Color, DialoguePhase, DrawSurface, RecordingSurface};

use crate::config::AppConfig;
use crate::session::Session;
use crate::surface::CanvasSurface;

/// 每帧的背景色
pub const BACKGROUND: Color = Color::rgb(30, 30, 40);

/// 帧输出目标
pub trait FrameTarget: DrawSurface {
    /// 开始新的一帧
    fn begin_frame(&mut self, background: Color);

    /// 把当前帧写入 `dir`，返回写出的文件路径
    fn dump(&self, dir: &Path, frame: u64) -> anyhow::Result<PathBuf>;
}

impl FrameTarget for CanvasSurface {
    fn begin_frame(&mut self, background: Color) {
        self.clear(background);
    }

    fn dump(&self, dir: &Path, frame: u64) -> anyhow::Result<PathBuf> {
        let path = dir.join(format!("frame_{:05}.png", frame));
        self.save_png(&path)
            .with_context(|| format!("写出画面失败: {}", path.display()))?;
        Ok(path)
    }
}

impl FrameTarget for RecordingSurface {
    fn begin_frame(&mut self, _background: Color) {
        self.clear();
    }

    fn dump(&self, dir: &Path, frame: u64) -> anyhow::Result<PathBuf> {
        let path = dir.join(format!("frame_{:05}.json", frame));
        let json = serde_json::to_string_pretty(self.calls())?;
        fs::write(&path, json).with_context(|| format!("写出绘制记录失败: {}", path.display()))?;
        Ok(path)
    }
}

/// 帧循环参数
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub frames: u32,
    /// 每隔多少帧导出一次（0 表示不导出）
    pub dump_every: u32,
    pub out_dir: PathBuf,
    pub realtime: bool,
    /// 每帧目标时长（秒）
    pub frame_step: f32,
}

impl RunOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            frames: config.headless.frames,
            dump_every: config.headless.dump_every,
            out_dir: config.headless.out_dir.clone(),
            realtime: config.headless.realtime,
            frame_step: config.frame_step(),
        }
    }
}

/// 帧循环结果
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// 实际运行的帧数
    pub frames: u64,
    /// 导出的文件
    pub dumps: Vec<PathBuf>,
    /// 是否因退出请求提前结束
    pub quit_early: bool,
    /// 结束时的对话状态
    pub final_phase: DialoguePhase,
}

/// 帧时钟
struct FrameClock {
    step: Duration,
    realtime: bool,
    frame_start: Instant,
    last_dt: f32,
}

impl FrameClock {
    fn new(step: f32, realtime: bool) -> Self {
        Self {
            step: Duration::from_secs_f32(step),
            realtime,
            frame_start: Instant::now(),
            // 第一帧没有上一帧可供测量
            last_dt: if realtime { 0.0 } else { step },
        }
    }

    fn begin(&mut self) -> f32 {
        self.frame_start = Instant::now();
        self.last_dt
    }

    fn end(&mut self) {
        if !self.realtime {
            return;
        }
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.step {
            thread::sleep(self.step - elapsed);
        }
        self.last_dt = self.frame_start.elapsed().as_secs_f32();
    }
}

/// 运行帧循环
pub fn run<T: FrameTarget>(
    session: &mut Session,
    target: &mut T,
    options: &RunOptions,
) -> anyhow::Result<RunSummary> {
    if options.dump_every > 0 {
        fs::create_dir_all(&options.out_dir)
            .with_context(|| format!("无法创建导出目录: {}", options.out_dir.display()))?;
    }

    let mut clock = FrameClock::new(options.frame_step, options.realtime);
    let mut dumps = Vec::new();
    let mut quit_early = false;

    for _ in 0..options.frames {
        let dt = clock.begin();
        let frame = session.frame();

        if !session.step(dt) {
            quit_early = true;
            break;
        }

        target.begin_frame(BACKGROUND);
        session.render(target);

        if options.dump_every > 0 && frame % options.dump_every as u64 == 0 {
            let path = target.dump(&options.out_dir, frame)?;
            debug!(frame, path = %path.display(), "导出画面");
            dumps.push(path);
        }

        clock.end();
    }

    let summary = RunSummary {
        frames: session.frame(),
        dumps,
        quit_early,
        final_phase: session.stage().dialogue().phase(),
    };
    info!(
        frames = summary.frames,
        dumps = summary.dumps.len(),
        quit_early,
        phase = ?summary.final_phase,
        "帧循环结束"
    );
    Ok(summary)
}
