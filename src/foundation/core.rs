use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::error::{HudError, HudResult};

/// 0-based index of a rendered overlay frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameIndex(pub u64);

/// Integer frames-per-second of the output video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fps(u32);

impl Fps {
    pub fn new(fps: u32) -> HudResult<Self> {
        if fps == 0 {
            return Err(HudError::config("fps must be non-zero"));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Frames covering `secs` seconds: `floor(secs * fps)`.
    pub fn frames_in(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Points on the resample grid for `secs` seconds: one more than [`Fps::frames_in`].
    pub fn grid_len(self, secs: f64) -> usize {
        self.frames_in(secs) as usize + 1
    }
}

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Absolute UTC window `[start, end]`, both bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(deserialize_with = "de_utc")]
    pub start: DateTime<Utc>,
    #[serde(deserialize_with = "de_utc")]
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> HudResult<Self> {
        if start > end {
            return Err(HudError::config(format!(
                "time window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Seconds from the window start to `ts` (negative before the window).
    pub fn offset_secs(&self, ts: DateTime<Utc>) -> f64 {
        delta_secs(ts - self.start)
    }

    pub fn duration_secs(&self) -> f64 {
        delta_secs(self.end - self.start)
    }
}

fn delta_secs(d: chrono::TimeDelta) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => d.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Parse an absolute timestamp.
///
/// Accepts RFC 3339 (`2025-12-09T11:29:45Z`, any offset) or a naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`, which is taken as UTC.
pub fn parse_utc(s: &str) -> HudResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(HudError::config(format!(
        "invalid timestamp '{s}' (expected RFC 3339 or 'YYYY-MM-DD HH:MM:SS')"
    )))
}

fn de_utc<'de, D>(de: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(de)?;
    parse_utc(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
