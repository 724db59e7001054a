//! Constants and configuration defaults for tpfand
//!
//! Centralizes paths, timing, and threshold values. This is the single
//! source of truth - never use magic numbers in other files, add them
//! here first.

use std::time::Duration;

/// System paths
pub mod paths {
    /// ThinkPad ACPI fan control file
    pub const FAN_CONTROL: &str = "/proc/acpi/ibm/fan";

    /// Base path for hwmon devices
    pub const HWMON_BASE: &str = "/sys/class/hwmon";

    /// hwmon driver name the discovery probe looks for
    pub const CORETEMP_DRIVER: &str = "coretemp";

    /// Sensor identifier used when none is given on the command line
    pub const DEFAULT_SENSOR_ID: &str = "1";
}

/// Timing values
pub mod timing {
    use super::Duration;

    /// Interval between TIMER events
    pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
}

/// Trend estimation parameters
pub mod trend {
    /// Ring history length per sensor
    pub const HISTORY_LEN: usize = 32;

    /// Extrapolation distance, in pooled sample indices beyond the newest
    /// (index 0 is the newest sample, so the future lies in the negative
    /// direction of the index axis)
    pub const PREDICT_STEPS: f64 = 2.0;

    /// Millidegrees per degree Celsius
    pub const MILLIDEG: f64 = 1000.0;

    /// Seed for the pooled min/max accumulators, millidegrees
    pub const RANGE_SEED: f64 = 100_000.0;
}

/// Fan state machine thresholds
pub mod fsm {
    /// Margin below the configured ceiling that triggers AUTO -> HIGHSPEED,
    /// degrees Celsius
    pub const HIGHSPEED_MARGIN_C: f64 = 20.0;

    /// Margin below the configured ceiling that triggers HIGHSPEED ->
    /// FULLSPEED, degrees Celsius. Tighter than the AUTO margin so response
    /// accelerates once already elevated.
    pub const FULLSPEED_MARGIN_C: f64 = 10.0;
}

/// Hard limits
pub mod limits {
    /// Maximum sensors accepted on the command line
    pub const MAX_SENSORS: usize = 16;

    /// Number of hwmon indices probed during base-path discovery
    pub const HWMON_PROBE_COUNT: usize = 8;
}
