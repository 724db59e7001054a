//! Coretemp sensor access
//!
//! Each sensor is a pair of hwmon files: `temp<N>_input` for the
//! instantaneous reading and `temp<N>_max` for the hardware trip limit
//! (both in millidegrees Celsius). The limit is read once at init and is
//! immutable for the process lifetime.
//!
//! A reading of zero is the "unreadable this tick" sentinel: it still
//! shifts the ring (so stale data ages out) but is excluded from minimum
//! tracking, and the trend estimator treats it as end-of-data.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use tp_error::{Result, TpError};

use crate::constants::trend::HISTORY_LEN;

/// A single coretemp sensor with its ring of recent readings
#[derive(Debug, Clone)]
pub struct Sensor {
    input_path: PathBuf,
    /// Readings in millidegrees, newest at index 0
    history: [i32; HISTORY_LEN],
    /// Hardware trip limit, read once at init
    configured_max: i32,
    /// Running minimum of nonzero readings, starts at the configured limit
    observed_min: i32,
}

impl Sensor {
    /// Open sensor `id` under `base`.
    ///
    /// Fails when the input file is missing or not a regular file, or when
    /// the limit file is absent or reports zero.
    pub fn open(base: &Path, id: &str) -> Result<Self> {
        let input_path = base.join(format!("temp{id}_input"));
        let is_file = fs::metadata(&input_path)
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(TpError::SensorInput(input_path));
        }

        let max_path = base.join(format!("temp{id}_max"));
        let configured_max = read_millidegrees(&max_path);
        if configured_max == 0 {
            return Err(TpError::SensorLimit(max_path));
        }

        debug!(
            input = %input_path.display(),
            limit = configured_max,
            "sensor initialized"
        );

        Ok(Self {
            input_path,
            history: [0; HISTORY_LEN],
            configured_max,
            observed_min: configured_max,
        })
    }

    /// Read the instantaneous temperature and push it into the history.
    /// A failed read records the zero sentinel.
    pub fn poll(&mut self) {
        let reading = read_millidegrees(&self.input_path);
        self.record(reading);
    }

    /// Shift the ring one slot toward the past (discarding the oldest
    /// entry) and insert `reading` at the newest position.
    pub fn record(&mut self, reading: i32) {
        self.history.copy_within(0..HISTORY_LEN - 1, 1);
        self.history[0] = reading;
        if reading != 0 && reading < self.observed_min {
            self.observed_min = reading;
        }
    }

    /// Readings newest-first; a zero entry marks the end of valid data
    pub fn history(&self) -> &[i32] {
        &self.history
    }

    /// Lowest nonzero reading seen since startup, millidegrees
    pub fn observed_min(&self) -> i32 {
        self.observed_min
    }

    /// Hardware trip limit, millidegrees
    pub fn configured_max(&self) -> i32 {
        self.configured_max
    }

    /// Build a sensor with no backing files, for engine tests
    #[cfg(test)]
    pub(crate) fn synthetic(configured_max: i32) -> Self {
        Self {
            input_path: PathBuf::from("synthetic"),
            history: [0; HISTORY_LEN],
            configured_max,
            observed_min: configured_max,
        }
    }
}

/// Read a hwmon-style integer file; 0 when missing or unparseable
fn read_millidegrees(path: &Path) -> i32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| text.trim().parse::<i32>().ok())
        .unwrap_or(0)
}
