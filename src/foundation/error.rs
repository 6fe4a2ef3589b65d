use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Convenience result type used across hudreel.
pub type HudResult<T> = Result<T, HudError>;

/// Top-level error type for loading, resampling, rendering and encoding.
#[derive(thiserror::Error, Debug)]
pub enum HudError {
    /// The container decoded, but carried no timestamped records at all.
    #[error("container error: no timestamped records in '{}'", path.display())]
    ContainerEmpty {
        /// Container that was read.
        path: PathBuf,
    },

    /// Timestamped records exist, but none fall inside the requested window.
    #[error("window error: none of {records} records fall inside [{start}, {end}]")]
    WindowEmpty {
        /// Inclusive window start.
        start: DateTime<Utc>,
        /// Inclusive window end.
        end: DateTime<Utc>,
        /// Number of timestamped records seen outside the window.
        records: usize,
    },

    /// Linear interpolation needs two distinct offsets.
    #[error("resample error: need at least 2 distinct offsets, got {distinct}")]
    InsufficientSamples {
        /// Distinct offsets available.
        distinct: usize,
    },

    /// The frames directory does not hold exactly the frames that were rendered.
    #[error(
        "completeness error: expected {expected} frames in '{}', found {found} (interrupted render or file name collision)",
        dir.display()
    )]
    Completeness {
        /// Frames the render loop produced.
        expected: u64,
        /// Frame files counted on disk.
        found: u64,
        /// Frames directory.
        dir: PathBuf,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of [`HudError`], one per failure the pipeline knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudErrorKind {
    ContainerEmpty,
    WindowEmpty,
    InsufficientSamples,
    Completeness,
    Decode,
    Render,
    Encode,
    Config,
    Io,
}

impl HudError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> HudErrorKind {
        match self {
            Self::ContainerEmpty { .. } => HudErrorKind::ContainerEmpty,
            Self::WindowEmpty { .. } => HudErrorKind::WindowEmpty,
            Self::InsufficientSamples { .. } => HudErrorKind::InsufficientSamples,
            Self::Completeness { .. } => HudErrorKind::Completeness,
            Self::Decode(_) => HudErrorKind::Decode,
            Self::Render(_) => HudErrorKind::Render,
            Self::Encode(_) => HudErrorKind::Encode,
            Self::Config(_) => HudErrorKind::Config,
            Self::Other(_) => HudErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for HudError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
