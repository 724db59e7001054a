//! Temperature trend estimation
//!
//! Fits one ordinary-least-squares regression over samples pooled from
//! every sensor's ring history and extrapolates a short distance into the
//! future. The pool uses a single running sample index shared across
//! sensors, so samples from different sensors interleave positionally into
//! one artificial time axis. That conflation is deliberate: correctness
//! here means matching the controller's established behavior, not
//! statistical rigor.

use crate::constants::trend::{MILLIDEG, PREDICT_STEPS, RANGE_SEED};
use crate::hw::sensor::Sensor;

/// One tick's trend estimate, in the mixed units the state machine expects.
///
/// `current` and `max` are whole degrees Celsius; `predicted` and `min`
/// stay in millidegrees. The asymmetry is inherited from the original
/// controller arithmetic and the state machine thresholds assume it, so it
/// must not be "fixed" in isolation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendSample {
    /// Smoothed current level: the regression intercept, degrees
    pub current: f64,
    /// Extrapolated near-future value, millidegrees
    pub predicted: f64,
    /// Lowest observed minimum across sensors, millidegrees
    pub min: f64,
    /// Lowest configured ceiling across sensors, degrees
    pub max: f64,
}

/// Fit the pooled regression over every sensor's history.
///
/// Each sensor's ring is scanned newest to oldest, stopping at the first
/// zero entry (zero is the "no more valid data" sentinel, not a real
/// reading). Returns `None` when the pool is empty or holds too few
/// distinct indices for a slope; the caller must then skip the tick and
/// keep the previous fan state.
///
/// The temperature ceiling is reduced with `min` across sensors on
/// purpose: the most conservative configured limit governs.
pub fn compute(sensors: &[Sensor]) -> Option<TrendSample> {
    let mut n = 0.0_f64;
    let mut sx = 0.0_f64;
    let mut sxx = 0.0_f64;
    let mut sy = 0.0_f64;
    let mut sxy = 0.0_f64;

    let mut min = RANGE_SEED;
    let mut max = RANGE_SEED;

    for sensor in sensors {
        min = min.min(f64::from(sensor.observed_min()));
        max = max.min(f64::from(sensor.configured_max()));

        for &reading in sensor.history() {
            if reading == 0 {
                break;
            }
            sx += n;
            sxx += n * n;
            sy += f64::from(reading);
            sxy += n * f64::from(reading);
            n += 1.0;
        }
    }

    if n == 0.0 {
        return None;
    }

    let denominator = sxx - (sx * sx) / n;
    if denominator == 0.0 {
        return None;
    }

    // y = mx + b, with smaller x = more recent
    let m = (sxy - (sx * sy) / n) / denominator;
    let b = (sy - m * sx) / n;

    // Evaluate the model two steps past the newest index
    let y = m * (n * -PREDICT_STEPS) + b;

    Some(TrendSample {
        current: b / MILLIDEG,
        predicted: y,
        min,
        max: max / MILLIDEG,
    })
}
