//! tpfand Core Library
//!
//! Temperature monitoring and fan state control for ThinkPad laptops.
//!
//! # Features
//!
//! - **Trend Estimation**: Pooled linear regression over per-sensor ring
//!   histories, extrapolating a short-horizon future temperature
//! - **Fan State Machine**: Table-driven transitions between auto, high
//!   and full fan speed with tightening hysteresis margins
//! - **Hardware Access**: coretemp hwmon sensors and the ThinkPad ACPI
//!   fan control file
//! - **Discovery**: Automatic location of the coretemp hwmon device
//!
//! # Module Structure
//!
//! - `engine/` - Trend estimator and fan state machine
//! - `hw/` - Hardware interaction (fan, sensors, discovery)
//! - `monitor` - Owned monitor context and event dispatch
//! - `constants` - Paths, timing, thresholds

pub mod constants;
pub mod engine;
pub mod hw;
pub mod monitor;

// Re-export primary types
pub use engine::fsm::{Event, FanState};
pub use engine::trend::TrendSample;
pub use hw::discovery::find_coretemp;
pub use hw::fan::{AcpiFan, FanActuator};
pub use hw::sensor::Sensor;
pub use monitor::Monitor;

// Re-export error types
pub use tp_error::{Result, TpError};
