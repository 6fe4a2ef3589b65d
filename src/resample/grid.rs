use crate::{
    foundation::{
        core::{Fps, FrameIndex},
        error::{HudError, HudResult},
    },
    resample::linear::LinearInterp,
    telemetry::sample::FilteredSeries,
};

/// Telemetry resampled onto the uniform frame grid.
///
/// `times` spans `[0, duration]` with `floor(duration * fps) + 1` points. Speed keeps its
/// fraction; the other channels are truncated toward zero, and become `None` where the
/// interpolated value is not finite (missing source data).
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedSeries {
    pub times: Vec<f64>,
    pub speed: Vec<f64>,
    pub power: Vec<Option<i64>>,
    pub heart_rate: Vec<Option<i64>>,
    pub cadence: Vec<Option<i64>>,
}

/// Channel values at one grid point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub speed_kmh: f64,
    pub power: Option<i64>,
    pub heart_rate: Option<i64>,
    pub cadence: Option<i64>,
}

impl InterpolatedSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn metrics_at(&self, frame: FrameIndex) -> Option<Metrics> {
        let i = usize::try_from(frame.0).ok()?;
        Some(Metrics {
            speed_kmh: *self.speed.get(i)?,
            power: *self.power.get(i)?,
            heart_rate: *self.heart_rate.get(i)?,
            cadence: *self.cadence.get(i)?,
        })
    }
}

/// `floor(duration * fps) + 1` evenly spaced points over `[0, duration]`, endpoints included.
pub fn time_grid(duration_secs: f64, fps: Fps) -> Vec<f64> {
    let n = fps.grid_len(duration_secs);
    if n == 1 {
        return vec![0.0];
    }
    let last = (n - 1) as f64;
    (0..n).map(|i| duration_secs * i as f64 / last).collect()
}

/// Resample every channel of `series` onto the frame grid for `duration_secs`.
///
/// Grid points outside the observed offsets are extrapolated from the edge segments, so a
/// clip may run longer than the sensor data covers.
#[tracing::instrument(skip(series), fields(records = series.len()))]
pub fn resample(
    series: &FilteredSeries,
    duration_secs: f64,
    fps: Fps,
) -> HudResult<InterpolatedSeries> {
    if !(duration_secs.is_finite() && duration_secs >= 0.0) {
        return Err(HudError::config(format!(
            "resample duration must be a finite, non-negative number of seconds, got {duration_secs}"
        )));
    }
    let distinct = series.distinct_offsets();
    if distinct < 2 {
        return Err(HudError::InsufficientSamples { distinct });
    }

    let times = time_grid(duration_secs, fps);
    tracing::debug!(points = times.len(), "built time grid");

    let channel = |ys: &[f64]| -> HudResult<Vec<f64>> {
        Ok(LinearInterp::new(&series.offsets, ys)?.eval_many(&times))
    };
    let truncated = |ys: &[f64]| -> HudResult<Vec<Option<i64>>> {
        Ok(channel(ys)?.into_iter().map(truncate).collect())
    };

    let out = InterpolatedSeries {
        speed: channel(&series.speed)?,
        power: truncated(&series.power)?,
        heart_rate: truncated(&series.heart_rate)?,
        cadence: truncated(&series.cadence)?,
        times,
    };
    tracing::info!(points = out.len(), "interpolation done");
    Ok(out)
}

/// Channel values at a single offset, interpolated the same way as [`resample`].
pub fn sample_at(series: &FilteredSeries, offset_secs: f64) -> HudResult<Metrics> {
    if !offset_secs.is_finite() {
        return Err(HudError::config(format!(
            "sample offset must be finite, got {offset_secs}"
        )));
    }
    let distinct = series.distinct_offsets();
    if distinct < 2 {
        return Err(HudError::InsufficientSamples { distinct });
    }
    let at = |ys: &[f64]| -> HudResult<f64> {
        Ok(LinearInterp::new(&series.offsets, ys)?.eval(offset_secs))
    };
    Ok(Metrics {
        speed_kmh: at(&series.speed)?,
        power: truncate(at(&series.power)?),
        heart_rate: truncate(at(&series.heart_rate)?),
        cadence: truncate(at(&series.cadence)?),
    })
}

fn truncate(v: f64) -> Option<i64> {
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/grid.rs"]
mod tests;
