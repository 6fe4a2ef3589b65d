//! Hand-off of the rendered frame sequence to a video encoder.

/// Encoder trait, parameters and output naming.
pub mod encoder;
/// `ffmpeg`-based ProRes 4444 encoder.
pub mod ffmpeg;
