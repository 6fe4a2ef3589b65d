use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::Local;

use crate::{
    config::HudConfig,
    encode::encoder::{
        EncodeParams, VideoArtifact, VideoEncoder, ensure_parent_dir, video_file_name,
    },
    foundation::error::{HudError, HudErrorKind, HudResult},
    render::{
        frames::FrameRenderer,
        overlay::{OverlayRenderer, OverlayStyle, format_metrics},
    },
    resample::grid::{Metrics, resample, sample_at},
    telemetry::filter::load_and_filter,
};

/// Wall-clock time spent in each stage of a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageTimings {
    pub load: Duration,
    pub resample: Duration,
    pub render: Duration,
    pub encode: Duration,
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineReport {
    /// Records kept by the window filter.
    pub records: usize,
    /// Points on the resample grid (one more than `frames`).
    pub grid_len: usize,
    pub frames: u64,
    pub artifact: VideoArtifact,
    pub timings: StageTimings,
    /// `false` when the frames directory was kept on request or could not be removed.
    pub cleaned_up: bool,
}

/// Result of [`Pipeline::execute`]: the run's result plus total runtime, which is measured
/// whether or not the run succeeded.
#[derive(Debug)]
pub struct Outcome {
    pub result: HudResult<PipelineReport>,
    pub total: Duration,
}

/// Load → resample → render → encode, strictly in sequence.
///
/// The frames directory is removed only after the encoder succeeds. On any failure it is left
/// as it is for inspection; it is not created at all if loading fails.
pub struct Pipeline<'a> {
    cfg: &'a HudConfig,
    encoder: &'a dyn VideoEncoder,
}

impl<'a> Pipeline<'a> {
    pub fn new(cfg: &'a HudConfig, encoder: &'a dyn VideoEncoder) -> Self {
        Self { cfg, encoder }
    }

    pub fn config(&self) -> &HudConfig {
        self.cfg
    }

    /// Output path for a run starting now.
    pub fn video_path(&self) -> PathBuf {
        self.cfg.video_dir.join(video_file_name(&Local::now()))
    }

    pub fn run(&self) -> HudResult<PipelineReport> {
        self.run_to(&self.video_path())
    }

    /// Run every stage, writing the finished video to `video_path`.
    #[tracing::instrument(skip(self), fields(fit = %self.cfg.fit_path.display()))]
    pub fn run_to(&self, video_path: &Path) -> HudResult<PipelineReport> {
        let cfg = self.cfg;
        cfg.validate()?;
        let fps = cfg.fps()?;
        let duration = cfg.duration_secs();
        let frame_count = cfg.frame_count();
        log_summary(cfg, video_path);

        let mut timings = StageTimings::default();

        let t = Instant::now();
        let series = load_and_filter(&cfg.fit_path, &cfg.window)?;
        timings.load = t.elapsed();

        let t = Instant::now();
        let grid = resample(&series, duration, fps)?;
        timings.resample = t.elapsed();

        let renderer = FrameRenderer::new(
            overlay_for(cfg),
            &cfg.frames_dir,
            Duration::from_secs_f64(cfg.print_interval_secs),
        );
        let frames = renderer.render_all(&grid, frame_count)?;
        timings.render = frames.elapsed;

        let params = EncodeParams {
            fps,
            resolution: cfg.resolution(),
            out_path: video_path.to_path_buf(),
            overwrite: true,
        };
        let t = Instant::now();
        let artifact = self.encoder.encode(&frames, &params)?;
        timings.encode = t.elapsed();
        tracing::info!(video = %artifact.path.display(), "overlay video written");

        let cleaned_up = if cfg.keep_frames {
            tracing::info!(dir = %frames.dir.display(), "keeping frames directory");
            false
        } else {
            match std::fs::remove_dir_all(&frames.dir) {
                Ok(()) => {
                    tracing::info!(dir = %frames.dir.display(), "removed frames directory");
                    true
                }
                // The video is already written; a leftover directory does not fail the run.
                Err(e) => {
                    tracing::warn!(dir = %frames.dir.display(), "could not remove frames directory: {e}");
                    false
                }
            }
        };

        Ok(PipelineReport {
            records: series.len(),
            grid_len: grid.len(),
            frames: frames.count,
            artifact,
            timings,
            cleaned_up,
        })
    }

    /// Run and log the outcome. Failures are logged by kind, total runtime is logged either
    /// way, and nothing propagates.
    pub fn execute(&self) -> Outcome {
        let started = Instant::now();
        let result = self.run();
        let total = started.elapsed();
        if let Err(err) = &result {
            log_failure(err, &self.cfg.frames_dir);
        }
        tracing::info!("total time: {:.1}s", total.as_secs_f64());
        Outcome { result, total }
    }
}

/// Render the overlay for one offset into `out`. No frames directory, no encoding.
#[tracing::instrument(skip(cfg))]
pub fn render_preview(cfg: &HudConfig, offset_secs: f64, out: &Path) -> HudResult<Metrics> {
    cfg.validate()?;
    let series = load_and_filter(&cfg.fit_path, &cfg.window)?;
    let metrics = sample_at(&series, offset_secs)?;
    ensure_parent_dir(out)?;
    overlay_for(cfg).render_to_png(&format_metrics(&metrics), out)?;
    tracing::info!(out = %out.display(), "preview written");
    Ok(metrics)
}

fn overlay_for(cfg: &HudConfig) -> OverlayRenderer {
    OverlayRenderer::new(
        OverlayStyle::new(cfg.resolution(), cfg.font_size),
        cfg.font_dir.as_deref(),
    )
}

fn log_summary(cfg: &HudConfig, video_path: &Path) {
    let duration = cfg.duration_secs();
    tracing::info!(
        fit = %cfg.fit_path.display(),
        frames_dir = %cfg.frames_dir.display(),
        video = %video_path.display(),
        fps = cfg.fps,
        width = cfg.width,
        height = cfg.height,
        start = %cfg.window.start,
        end = %cfg.window.end,
        "configuration"
    );
    tracing::info!(
        expected_frames = cfg.frame_count(),
        "clip duration {:.1}s ({})",
        duration,
        minutes_seconds(duration)
    );
}

/// `2172.0` → `36m 12.0s`
pub fn minutes_seconds(secs: f64) -> String {
    let whole = secs.max(0.0);
    let minutes = (whole / 60.0).floor();
    format!("{}m {:.1}s", minutes as u64, whole - minutes * 60.0)
}

/// What to tell the operator about a failed run.
pub fn failure_hint(kind: HudErrorKind) -> &'static str {
    match kind {
        HudErrorKind::ContainerEmpty => "the telemetry file holds no timestamped records",
        HudErrorKind::WindowEmpty => "no records fall inside the window; check start/end (UTC)",
        HudErrorKind::InsufficientSamples => {
            "the window needs records at two or more distinct times"
        }
        HudErrorKind::Completeness => "frame sequence is incomplete; rerun to regenerate it",
        HudErrorKind::Decode => "the telemetry file could not be decoded",
        HudErrorKind::Render => "a frame could not be rendered",
        HudErrorKind::Encode => "the encoder failed; the rendered frames were kept",
        HudErrorKind::Config => "the configuration is invalid",
        HudErrorKind::Io => "a filesystem operation failed",
    }
}

fn log_failure(err: &HudError, frames_dir: &Path) {
    let kind = err.kind();
    tracing::error!(?kind, "{err}");
    tracing::error!("{}", failure_hint(kind));
    if frames_dir.exists() {
        tracing::warn!(
            dir = %frames_dir.display(),
            "frames directory left in place for inspection"
        );
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
