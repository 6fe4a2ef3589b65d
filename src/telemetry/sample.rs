use chrono::{DateTime, Utc};

/// m/s to km/h.
pub const MPS_TO_KMH: f64 = 3.6;

/// One decoded telemetry record.
///
/// Channels a record does not carry stay `None`; a present `Some(0)` is a real reading.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    /// `speed` field, m/s.
    pub speed: Option<f64>,
    /// `enhanced_speed` field, m/s.
    pub enhanced_speed: Option<f64>,
    /// Watts.
    pub power: Option<u32>,
    /// Beats per minute.
    pub heart_rate: Option<u32>,
    /// Revolutions per minute.
    pub cadence: Option<u32>,
}

impl RawSample {
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            speed: None,
            enhanced_speed: None,
            power: None,
            heart_rate: None,
            cadence: None,
        }
    }

    /// Speed in km/h.
    ///
    /// Falls back to `enhanced_speed` when `speed` is absent or zero, and to 0.0 when
    /// neither is present.
    pub fn speed_kmh(&self) -> f64 {
        let mps = match self.speed {
            Some(v) if v != 0.0 => v,
            _ => self.enhanced_speed.unwrap_or(0.0),
        };
        mps * MPS_TO_KMH
    }
}

/// Window-relative telemetry with one entry per in-window record.
///
/// All columns have the same length as `offsets`. Missing channel values are `NaN`, so a
/// record without power still occupies its slot in `power`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredSeries {
    /// Seconds since the window start, non-decreasing, duplicates kept.
    pub offsets: Vec<f64>,
    /// km/h.
    pub speed: Vec<f64>,
    pub power: Vec<f64>,
    pub heart_rate: Vec<f64>,
    pub cadence: Vec<f64>,
}

impl FilteredSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(n),
            speed: Vec::with_capacity(n),
            power: Vec::with_capacity(n),
            heart_rate: Vec::with_capacity(n),
            cadence: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, offset: f64, sample: &RawSample) {
        fn opt(v: Option<u32>) -> f64 {
            v.map_or(f64::NAN, f64::from)
        }

        self.offsets.push(offset);
        self.speed.push(sample.speed_kmh());
        self.power.push(opt(sample.power));
        self.heart_rate.push(opt(sample.heart_rate));
        self.cadence.push(opt(sample.cadence));
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// `(min, max)` of the offsets, if any.
    pub fn offset_range(&self) -> Option<(f64, f64)> {
        let first = *self.offsets.first()?;
        Some(
            self.offsets
                .iter()
                .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x))),
        )
    }

    /// Number of distinct offset values.
    pub fn distinct_offsets(&self) -> usize {
        let mut n = 0usize;
        let mut last: Option<f64> = None;
        for &x in &self.offsets {
            if last != Some(x) {
                n += 1;
                last = Some(x);
            }
        }
        n
    }
}
