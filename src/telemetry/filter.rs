use std::path::Path;

use crate::{
    foundation::{
        core::TimeWindow,
        error::{HudError, HudResult},
    },
    telemetry::{
        fit::read_samples,
        sample::{FilteredSeries, RawSample},
    },
};

/// Decode `path` and keep the records inside `window`, as offsets from `window.start`.
///
/// Fails with [`HudError::ContainerEmpty`] when the container has no timestamped records and
/// with [`HudError::WindowEmpty`] when none of them fall inside the window.
#[tracing::instrument(skip(window), fields(start = %window.start, end = %window.end))]
pub fn load_and_filter(path: &Path, window: &TimeWindow) -> HudResult<FilteredSeries> {
    let samples = read_samples(path)?;
    let Some(first) = samples.first() else {
        return Err(HudError::ContainerEmpty {
            path: path.to_path_buf(),
        });
    };
    tracing::debug!(
        records = samples.len(),
        first = %first.timestamp,
        "decoded timestamped records"
    );
    filter_window(&samples, window)
}

/// Restrict `samples` to the inclusive `window` and convert timestamps to offsets.
///
/// The result is ordered by offset; records sharing a timestamp keep their file order.
pub fn filter_window(samples: &[RawSample], window: &TimeWindow) -> HudResult<FilteredSeries> {
    let mut inside: Vec<(f64, &RawSample)> = samples
        .iter()
        .filter(|s| window.contains(s.timestamp))
        .map(|s| (window.offset_secs(s.timestamp), s))
        .collect();

    if inside.is_empty() {
        return Err(HudError::WindowEmpty {
            start: window.start,
            end: window.end,
            records: samples.len(),
        });
    }

    inside.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut series = FilteredSeries::with_capacity(inside.len());
    for (offset, sample) in inside {
        series.push(offset, sample);
    }

    if let Some((lo, hi)) = series.offset_range() {
        tracing::info!(
            kept = series.len(),
            of = samples.len(),
            "filtered records, offsets {lo:.1}-{hi:.1}s"
        );
    }
    Ok(series)
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/filter.rs"]
mod tests;
