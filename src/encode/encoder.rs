use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::Context as _;
use chrono::{DateTime, TimeZone};

use crate::{
    foundation::{
        core::{Fps, Resolution},
        error::{HudError, HudResult},
    },
    render::frames::{FrameSet, count_frames},
};

/// Output settings for one encode.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeParams {
    pub fps: Fps,
    /// Output size; frames are scaled to it.
    pub resolution: Resolution,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeParams {
    pub fn validate(&self) -> HudResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(HudError::encode("encode width/height must be non-zero"));
        }
        if self.out_path.as_os_str().is_empty() {
            return Err(HudError::encode("encode output path must not be empty"));
        }
        Ok(())
    }
}

/// The finished overlay video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoArtifact {
    pub path: PathBuf,
    /// Frames encoded.
    pub frames: u64,
    /// Wall-clock time spent in the encoder.
    pub encode_time: Duration,
}

/// Turns a rendered frame sequence into a single video file.
pub trait VideoEncoder {
    fn encode(&self, frames: &FrameSet, params: &EncodeParams) -> HudResult<VideoArtifact>;
}

/// One call seen by [`RecordingEncoder`].
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeCall {
    pub frames: FrameSet,
    pub params: EncodeParams,
    /// Frame files present in `frames.dir` when the encoder ran.
    pub files_on_disk: u64,
}

/// Encoder that records its calls and writes a placeholder artifact instead of a video.
///
/// Useful for exercising the pipeline without an external encoder installed.
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    calls: Mutex<Vec<EncodeCall>>,
    fail_with: Option<String>,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `encode` call fails with [`HudError::Encode`] carrying `msg`.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            calls: Mutex::default(),
            fail_with: Some(msg.into()),
        }
    }

    pub fn calls(&self) -> Vec<EncodeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl VideoEncoder for RecordingEncoder {
    fn encode(&self, frames: &FrameSet, params: &EncodeParams) -> HudResult<VideoArtifact> {
        params.validate()?;
        let call = EncodeCall {
            frames: frames.clone(),
            params: params.clone(),
            files_on_disk: count_frames(&frames.dir)?,
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if let Some(msg) = &self.fail_with {
            return Err(HudError::encode(msg.clone()));
        }

        ensure_parent_dir(&params.out_path)?;
        std::fs::write(&params.out_path, b"")
            .with_context(|| format!("write '{}'", params.out_path.display()))?;
        Ok(VideoArtifact {
            path: params.out_path.clone(),
            frames: frames.count,
            encode_time: Duration::ZERO,
        })
    }
}

pub const VIDEO_PREFIX: &str = "hud_overlay_alpha_";
pub const VIDEO_EXT: &str = "mov";

/// `hud_overlay_alpha_20251209_190102.mov`; the timestamp keeps reruns from overwriting.
pub fn video_file_name<Tz: TimeZone>(generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{VIDEO_PREFIX}{}.{VIDEO_EXT}",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn ensure_parent_dir(path: &Path) -> HudResult<()> {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
