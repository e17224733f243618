//! vn-stage 无窗口运行器
//!
//! ```bash
//! vn-stage-cli --frames 240 --dump-every 30 --out-dir frames
//! vn-stage-cli --dry-run --verbose
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use host_cli::{AppConfig, CanvasSurface, RunOptions, Session, run};
use tracing::{Level, info};
use vn_stage::RecordingSurface;

#[derive(Parser)]
#[command(name = "vn-stage-cli")]
#[command(about = "分层立绘 + 对话引擎的无窗口运行器")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 运行帧数（覆盖配置）
    #[arg(long)]
    frames: Option<u32>,

    /// 每隔多少帧导出一次画面（0 表示不导出）
    #[arg(long)]
    dump_every: Option<u32>,

    /// 导出目录
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// 按真实时间节奏运行
    #[arg(long)]
    realtime: bool,

    /// 只记录绘制调用，不进行光栅化
    #[arg(long)]
    dry_run: bool,

    /// 输出 debug 级别日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut AppConfig) {
        if let Some(frames) = self.frames {
            config.headless.frames = frames;
        }
        if let Some(dump_every) = self.dump_every {
            config.headless.dump_every = dump_every;
        }
        if let Some(out_dir) = &self.out_dir {
            config.headless.out_dir = out_dir.clone();
        }
        if self.realtime {
            config.headless.realtime = true;
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 日志级别取决于配置文件，先读配置再初始化日志
    let (mut config, outcome) = AppConfig::resolve(&cli.config);
    cli.apply(&mut config);
    init_logging(&config.log_level);
    outcome.log(&cli.config);

    config.validate().context("配置无效")?;

    let mut session = Session::new(&config).context("会话初始化失败")?;
    let options = RunOptions::from_config(&config);

    let summary = if cli.dry_run {
        let mut surface = RecordingSurface::new();
        run(&mut session, &mut surface, &options)?
    } else {
        let mut surface = CanvasSurface::new(config.window.width, config.window.height);
        run(&mut session, &mut surface, &options)?
    };

    session.shutdown();
    info!(
        frames = summary.frames,
        dumps = summary.dumps.len(),
        "运行结束"
    );
    Ok(())
}
