//! Piecewise-linear interpolation with linear extrapolation past both ends.

use crate::foundation::error::{HudError, HudResult};

/// Linear interpolant over sorted knots `xs` with values `ys`.
///
/// Queries left of the first knot extend the first segment, queries right of the last knot
/// extend the last segment. Repeated knots are allowed; the edge segments skip over them so
/// their slope is always finite. `NaN` values propagate into every segment that touches them.
#[derive(Clone, Copy, Debug)]
pub struct LinearInterp<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
    first_hi: usize,
    last_lo: usize,
}

impl<'a> LinearInterp<'a> {
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> HudResult<Self> {
        if xs.len() != ys.len() {
            return Err(HudError::Other(anyhow::anyhow!(
                "interpolation knots/values length mismatch: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let (Some(&x_first), Some(&x_last)) = (xs.first(), xs.last()) else {
            return Err(HudError::InsufficientSamples { distinct: 0 });
        };
        if x_first >= x_last {
            return Err(HudError::InsufficientSamples { distinct: 1 });
        }

        let first_hi = xs.partition_point(|&x| x <= x_first);
        let last_lo = xs.partition_point(|&x| x < x_last) - 1;
        Ok(Self {
            xs,
            ys,
            first_hi,
            last_lo,
        })
    }

    pub fn eval(&self, t: f64) -> f64 {
        let n = self.xs.len();
        let idx = self.xs.partition_point(|&x| x < t);
        let (lo, hi) = if idx == 0 {
            (0, self.first_hi)
        } else if idx >= n {
            (self.last_lo, n - 1)
        } else {
            (idx - 1, idx)
        };

        let (x_lo, x_hi) = (self.xs[lo], self.xs[hi]);
        let (y_lo, y_hi) = (self.ys[lo], self.ys[hi]);
        let slope = (y_hi - y_lo) / (x_hi - x_lo);
        slope * (t - x_lo) + y_lo
    }

    pub fn eval_many(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.eval(t)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/linear.rs"]
mod tests;
