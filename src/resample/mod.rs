//! Resampling of irregular telemetry onto the video frame grid.

pub mod grid;
pub mod linear;
