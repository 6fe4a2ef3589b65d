//! Telemetry loading: FIT decoding and absolute-window filtering.

pub mod filter;
pub mod fit;
pub mod sample;
