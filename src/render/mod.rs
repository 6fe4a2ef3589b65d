//! Overlay rasterization and frame sequence output.

pub mod fonts;
pub mod frames;
pub mod overlay;
