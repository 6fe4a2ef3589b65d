use std::{
    fs::File,
    io::BufReader,
    path::{Component, Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::{Fps, Resolution, TimeWindow},
    error::{HudError, HudResult},
};

/// Everything a pipeline run needs, resolved up front and passed down explicitly.
///
/// JSON layout (all fields except `fit_path` and `window` are optional):
///
/// ```json
/// {
///   "fit_path": "2025-12-09-18-56-51.fit",
///   "window": { "start": "2025-12-09 11:29:45", "end": "2025-12-09 12:05:55" },
///   "frames_dir": "frames_hud",
///   "fps": 30,
///   "width": 480,
///   "height": 270
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HudConfig {
    /// Telemetry container to read.
    pub fit_path: PathBuf,
    /// Absolute UTC bounds of the clip.
    pub window: TimeWindow,
    /// Working directory for rendered frames. Removed after a successful run.
    #[serde(default = "default_frames_dir")]
    pub frames_dir: PathBuf,
    /// Directory the finished `.mov` is written to.
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Overlay text size in points (rendered at 100 DPI).
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Wall-clock seconds between render progress reports.
    #[serde(default = "default_print_interval")]
    pub print_interval_secs: f64,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files.
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
    /// Skip removing `frames_dir` after a successful run.
    #[serde(default)]
    pub keep_frames: bool,
}

fn default_frames_dir() -> PathBuf {
    PathBuf::from("frames_hud")
}

fn default_video_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_fps() -> u32 {
    30
}

fn default_width() -> u32 {
    480
}

fn default_height() -> u32 {
    270
}

fn default_font_size() -> f32 {
    25.0
}

fn default_print_interval() -> f64 {
    10.0
}

impl HudConfig {
    /// Config with the default render settings for `fit_path` and `window`.
    pub fn new(fit_path: impl Into<PathBuf>, window: TimeWindow) -> Self {
        Self {
            fit_path: fit_path.into(),
            window,
            frames_dir: default_frames_dir(),
            video_dir: default_video_dir(),
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            font_size: default_font_size(),
            print_interval_secs: default_print_interval(),
            font_dir: None,
            keep_frames: false,
        }
    }

    pub fn from_json_file(path: &Path) -> HudResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| HudError::config(format!("parse '{}': {e}", path.display())))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> HudResult<()> {
        Fps::new(self.fps)?;
        if self.width == 0 || self.height == 0 {
            return Err(HudError::config("width/height must be non-zero"));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(HudError::config("font_size must be > 0"));
        }
        if !(self.print_interval_secs.is_finite() && self.print_interval_secs > 0.0) {
            return Err(HudError::config("print_interval_secs must be > 0"));
        }
        if self.window.end <= self.window.start {
            return Err(HudError::config(format!(
                "window end {} must be after start {}",
                self.window.end, self.window.start
            )));
        }
        if self.frame_count() == 0 {
            return Err(HudError::config(format!(
                "window of {:.3}s is shorter than one frame at {} fps",
                self.duration_secs(),
                self.fps
            )));
        }
        if self.frames_dir.as_os_str().is_empty() {
            return Err(HudError::config("frames_dir must not be empty"));
        }
        self.validate_dirs()
    }

    /// `frames_dir` is deleted after a successful run, so nothing else may live under it.
    fn validate_dirs(&self) -> HudResult<()> {
        let frames = normalized(&self.frames_dir)?;
        if normalized(Path::new("."))?.starts_with(&frames) {
            return Err(HudError::config(format!(
                "frames_dir '{}' must not be the working directory or one of its parents",
                self.frames_dir.display()
            )));
        }
        if normalized(&self.fit_path)?.starts_with(&frames) {
            return Err(HudError::config(format!(
                "frames_dir '{}' must not contain fit_path '{}'",
                self.frames_dir.display(),
                self.fit_path.display()
            )));
        }
        if normalized(&self.video_dir)?.starts_with(&frames) {
            return Err(HudError::config(format!(
                "video_dir '{}' must not be frames_dir '{}' or inside it",
                self.video_dir.display(),
                self.frames_dir.display()
            )));
        }
        Ok(())
    }

    pub fn fps(&self) -> HudResult<Fps> {
        Fps::new(self.fps)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// `window.end - window.start` in seconds; drives both grid size and frame count.
    pub fn duration_secs(&self) -> f64 {
        self.window.duration_secs()
    }

    pub fn frame_count(&self) -> u64 {
        match Fps::new(self.fps) {
            Ok(fps) => fps.frames_in(self.duration_secs()),
            Err(_) => 0,
        }
    }

    pub fn grid_len(&self) -> usize {
        self.frame_count() as usize + 1
    }
}

/// Absolute form of `p` with `.` and `..` resolved lexically; the path need not exist.
fn normalized(p: &Path) -> HudResult<PathBuf> {
    let p = if p.as_os_str().is_empty() {
        Path::new(".")
    } else {
        p
    };
    let abs = std::path::absolute(p).with_context(|| format!("resolve path '{}'", p.display()))?;
    let mut out = PathBuf::new();
    for c in abs.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
