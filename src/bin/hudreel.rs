use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hudreel::{FfmpegEncoder, HudConfig, Pipeline, TimeWindow, parse_utc};

#[derive(Parser, Debug)]
#[command(name = "hudreel", version, about)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the overlay video (requires `ffmpeg` on PATH).
    Render(SourceArgs),
    /// Render a single overlay frame as a PNG.
    Frame(FrameArgs),
    /// Print the resolved configuration and exit.
    Config(SourceArgs),
}

/// Where the telemetry comes from and how it is rendered. Flags override `--config`.
#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// FIT telemetry file.
    #[arg(long)]
    fit: Option<PathBuf>,

    /// Window start, RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
    #[arg(long)]
    start: Option<String>,

    /// Window end, same formats as `--start`.
    #[arg(long)]
    end: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Overlay text size in points.
    #[arg(long)]
    font_size: Option<f32>,

    /// Seconds between render progress reports.
    #[arg(long)]
    print_interval: Option<f64>,

    /// Working directory for frames.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Directory for the finished video.
    #[arg(long)]
    video_dir: Option<PathBuf>,

    /// Extra font directory.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Keep the frames directory after a successful run.
    #[arg(long)]
    keep_frames: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Offset from the window start, in seconds. May be negative or past the end.
    #[arg(long, allow_negative_numbers = true)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: SourceArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    if !hudreel::is_ffmpeg_on_path() {
        tracing::warn!("ffmpeg was not found on PATH; the encode stage will fail");
    }

    let encoder = FfmpegEncoder::new();
    let outcome = Pipeline::new(&cfg, &encoder).execute();
    // Failures and total time are already logged; the process still exits normally.
    if let Ok(report) = outcome.result {
        eprintln!(
            "wrote {} ({} frames)",
            report.artifact.path.display(),
            report.frames
        );
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.source.resolve()?;
    let metrics = hudreel::render_preview(&cfg, args.at, &args.out)?;
    for line in hudreel::format_metrics(&metrics) {
        eprintln!("{line}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: SourceArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    println!(
        "duration: {:.3}s ({})",
        cfg.duration_secs(),
        hudreel::pipeline::minutes_seconds(cfg.duration_secs())
    );
    println!("frames: {}", cfg.frame_count());
    cfg.validate()?;
    Ok(())
}

impl SourceArgs {
    fn resolve(self) -> anyhow::Result<HudConfig> {
        let mut cfg = match &self.config {
            Some(path) => HudConfig::from_json_file(path)?,
            None => {
                let fit = self
                    .fit
                    .clone()
                    .context("--fit is required without --config")?;
                let start = self.start.as_deref().context("--start is required without --config")?;
                let end = self.end.as_deref().context("--end is required without --config")?;
                HudConfig::new(fit, TimeWindow::new(parse_utc(start)?, parse_utc(end)?)?)
            }
        };

        if let Some(fit) = self.fit {
            cfg.fit_path = fit;
        }
        if self.start.is_some() || self.end.is_some() {
            let start = match &self.start {
                Some(s) => parse_utc(s)?,
                None => cfg.window.start,
            };
            let end = match &self.end {
                Some(s) => parse_utc(s)?,
                None => cfg.window.end,
            };
            cfg.window = TimeWindow::new(start, end)?;
        }
        if let Some(v) = self.fps {
            cfg.fps = v;
        }
        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v;
        }
        if let Some(v) = self.font_size {
            cfg.font_size = v;
        }
        if let Some(v) = self.print_interval {
            cfg.print_interval_secs = v;
        }
        if let Some(v) = self.frames_dir {
            cfg.frames_dir = v;
        }
        if let Some(v) = self.video_dir {
            cfg.video_dir = v;
        }
        if let Some(v) = self.font_dir {
            cfg.font_dir = Some(v);
        }
        if self.keep_frames {
            cfg.keep_frames = true;
        }
        Ok(cfg)
    }
}
