use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::FrameIndex,
        error::{HudError, HudResult},
    },
    render::overlay::{OverlayRenderer, format_metrics},
    resample::grid::InterpolatedSeries,
};

pub const FRAME_PREFIX: &str = "frame_";
pub const FRAME_EXT: &str = "png";
/// printf-style input pattern matching [`frame_file_name`], as understood by ffmpeg.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// `frame_000042.png`
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("{FRAME_PREFIX}{:06}.{FRAME_EXT}", idx.0)
}

pub fn is_frame_file_name(name: &str) -> bool {
    name.strip_prefix(FRAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(FRAME_EXT))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn frame_entries(dir: &Path) -> HudResult<Vec<PathBuf>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("list frames directory '{}'", dir.display()))?;
    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        if entry.file_name().to_str().is_some_and(is_frame_file_name) {
            out.push(entry.path());
        }
    }
    Ok(out)
}

/// Delete leftover frame files from an earlier run. Other files are left alone.
pub fn clear_frames(dir: &Path) -> HudResult<usize> {
    let stale = frame_entries(dir)?;
    for path in &stale {
        std::fs::remove_file(path)
            .with_context(|| format!("remove stale frame '{}'", path.display()))?;
    }
    Ok(stale.len())
}

pub fn count_frames(dir: &Path) -> HudResult<u64> {
    Ok(frame_entries(dir)?.len() as u64)
}

/// Check that `dir` holds exactly `expected` frame files.
pub fn validate_frames(dir: &Path, expected: u64) -> HudResult<()> {
    let found = count_frames(dir)?;
    if found != expected {
        return Err(HudError::Completeness {
            expected,
            found,
            dir: dir.to_path_buf(),
        });
    }
    tracing::info!(frames = found, "frame sequence complete");
    Ok(())
}

/// Frames written by [`FrameRenderer::render_all`].
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSet {
    pub dir: PathBuf,
    pub count: u64,
    pub elapsed: Duration,
}

/// One progress line: frames done so far and time estimates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressReport {
    pub done: u64,
    pub total: u64,
    pub elapsed: Duration,
    pub remaining: Duration,
    pub frames_per_sec: f64,
}

/// Emits a [`ProgressReport`] at most once per `interval` of wall-clock time.
#[derive(Clone, Debug)]
pub struct Progress {
    total: u64,
    interval: Duration,
    started: Instant,
    last: Instant,
}

impl Progress {
    pub fn new(total: u64, interval: Duration, now: Instant) -> Self {
        Self {
            total,
            interval,
            started: now,
            last: now,
        }
    }

    /// Called before rendering frame `idx`.
    pub fn tick(&mut self, idx: u64, now: Instant) -> Option<ProgressReport> {
        if now.duration_since(self.last) < self.interval {
            return None;
        }
        self.last = now;

        let elapsed = now.duration_since(self.started);
        let secs = elapsed.as_secs_f64();
        let per_frame = secs / (idx + 1) as f64;
        let remaining = per_frame * self.total.saturating_sub(idx) as f64;
        Some(ProgressReport {
            done: idx + 1,
            total: self.total,
            elapsed,
            remaining: Duration::from_secs_f64(remaining.max(0.0)),
            frames_per_sec: if secs > 0.0 { idx as f64 / secs } else { 0.0 },
        })
    }
}

/// Writes one transparent overlay PNG per frame into a working directory.
pub struct FrameRenderer {
    overlay: OverlayRenderer,
    dir: PathBuf,
    print_interval: Duration,
}

impl FrameRenderer {
    pub fn new(overlay: OverlayRenderer, dir: impl Into<PathBuf>, print_interval: Duration) -> Self {
        Self {
            overlay,
            dir: dir.into(),
            print_interval,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render grid points `0..frame_count` and verify the directory afterwards.
    ///
    /// The grid normally has one point more than `frame_count`; that last point is never
    /// rendered.
    #[tracing::instrument(skip(self, series), fields(dir = %self.dir.display()))]
    pub fn render_all(&self, series: &InterpolatedSeries, frame_count: u64) -> HudResult<FrameSet> {
        if (series.len() as u64) < frame_count {
            return Err(HudError::render(format!(
                "resample grid has {} points, cannot render {frame_count} frames",
                series.len()
            )));
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frames directory '{}'", self.dir.display()))?;
        let stale = clear_frames(&self.dir)?;
        if stale > 0 {
            tracing::info!(stale, "removed frames left by a previous run");
        }

        let started = Instant::now();
        let mut progress = Progress::new(frame_count, self.print_interval, started);

        for i in 0..frame_count {
            if let Some(p) = progress.tick(i, Instant::now()) {
                tracing::info!(
                    "progress {}/{} frames | elapsed {:.1}s | remaining {:.1}s | {:.1} frames/s",
                    p.done,
                    p.total,
                    p.elapsed.as_secs_f64(),
                    p.remaining.as_secs_f64(),
                    p.frames_per_sec
                );
            }
            self.render_one(series, FrameIndex(i))?;
        }

        let elapsed = started.elapsed();
        tracing::info!(
            frames = frame_count,
            "rendered frames in {:.1}s",
            elapsed.as_secs_f64()
        );

        validate_frames(&self.dir, frame_count)?;
        Ok(FrameSet {
            dir: self.dir.clone(),
            count: frame_count,
            elapsed,
        })
    }

    fn render_one(&self, series: &InterpolatedSeries, idx: FrameIndex) -> HudResult<()> {
        let metrics = series
            .metrics_at(idx)
            .ok_or_else(|| HudError::render(format!("no grid point for frame {}", idx.0)))?;
        let path = self.dir.join(frame_file_name(idx));
        self.overlay.render_to_png(&format_metrics(&metrics), &path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frames.rs"]
mod tests;
