//! hudreel turns cycling telemetry into a transparent heads-up-display overlay video.
//!
//! A run is four sequential stages driven by a [`HudConfig`]:
//!
//! - load a FIT container and keep the records inside a time window
//! - resample speed, power, heart rate and cadence onto the frame grid
//! - render one transparent PNG label per frame
//! - hand the frame sequence to a [`VideoEncoder`] (ProRes 4444 with alpha via `ffmpeg`)
//!
//! [`Pipeline`] runs them in order and cleans up the frames directory on success.
#![forbid(unsafe_code)]

pub mod config;
pub mod encode;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod resample;
pub mod telemetry;

pub use crate::config::HudConfig;
pub use crate::encode::encoder::{
    EncodeCall, EncodeParams, RecordingEncoder, VideoArtifact, VideoEncoder, video_file_name,
};
pub use crate::encode::ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
pub use crate::foundation::core::{Fps, FrameIndex, Resolution, TimeWindow, parse_utc};
pub use crate::foundation::error::{HudError, HudErrorKind, HudResult};
pub use crate::pipeline::{Outcome, Pipeline, PipelineReport, StageTimings, render_preview};
pub use crate::render::frames::{FrameRenderer, FrameSet, validate_frames};
pub use crate::render::overlay::{OverlayRenderer, OverlayStyle, format_metrics};
pub use crate::resample::grid::{InterpolatedSeries, Metrics, resample, sample_at};
pub use crate::telemetry::filter::{filter_window, load_and_filter};
pub use crate::telemetry::fit::{decode_samples, read_samples};
pub use crate::telemetry::sample::{FilteredSeries, RawSample};
