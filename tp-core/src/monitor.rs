//! Monitor context and event dispatch
//!
//! [`Monitor`] owns the fan handle and the sensor set for the whole
//! process lifetime and is passed explicitly to the daemon loop; there is
//! no ambient global state. Events are strictly serialized by the caller:
//! exactly one of START, TIMER or STOP is in flight at a time.

use std::path::Path;

use tracing::{debug, warn};

use tp_error::{Result, TpError};

use crate::engine::fsm::{self, Event, FanState};
use crate::engine::trend::{self, TrendSample};
use crate::hw::fan::{AcpiFan, FanActuator};
use crate::hw::sensor::Sensor;

/// Process-wide monitor state: the fan, the sensors, and the current fan
/// level (`None` until the first transition lands)
pub struct Monitor<A: FanActuator> {
    fan: A,
    sensors: Vec<Sensor>,
    state: Option<FanState>,
}

impl Monitor<AcpiFan> {
    /// Initialize the fan handle and every usable sensor.
    ///
    /// Sensors that fail to initialize are skipped with a warning; an
    /// unusable fan handle or zero usable sensors is fatal.
    pub fn init(fan_path: &Path, sensor_base: &Path, sensor_ids: &[String]) -> Result<Self> {
        let fan = AcpiFan::open(fan_path)?;

        let mut sensors = Vec::new();
        for id in sensor_ids {
            match Sensor::open(sensor_base, id) {
                Ok(sensor) => sensors.push(sensor),
                Err(err) => warn!("sensor {id}: {err}"),
            }
        }
        if sensors.is_empty() {
            return Err(TpError::NoSensors);
        }

        Ok(Self::with_parts(fan, sensors))
    }
}

impl<A: FanActuator> Monitor<A> {
    /// Assemble a monitor from already-built parts
    pub fn with_parts(fan: A, sensors: Vec<Sensor>) -> Self {
        Self {
            fan,
            sensors,
            state: None,
        }
    }

    /// Current fan level
    pub fn state(&self) -> Option<FanState> {
        self.state
    }

    /// Handle one event: poll every sensor, then run the transition table
    /// over the fresh trend.
    pub fn handle_event(&mut self, event: Event) {
        for sensor in &mut self.sensors {
            sensor.poll();
        }
        self.step(event);
    }

    /// Transition using the sensor histories as they stand, without
    /// polling. Split from [`handle_event`](Self::handle_event) so tests
    /// can feed readings directly.
    pub fn step(&mut self, event: Event) {
        let sample = match trend::compute(&self.sensors) {
            Some(sample) => sample,
            // No reliable trend this tick. TIMER is skipped outright and
            // the current level retained; START and STOP ignore the
            // sample anyway, so a placeholder suffices.
            None if event == Event::Timer => {
                debug!("no reliable trend, keeping fan state");
                return;
            }
            None => TrendSample::default(),
        };

        debug!(
            current = sample.current,
            predicted = sample.predicted,
            min = sample.min,
            max = sample.max,
            "trend"
        );

        let Some(next) = fsm::next_state(self.state, event, &sample) else {
            return;
        };

        if self.state != Some(next) {
            if let Err(err) = self.fan.apply(next) {
                warn!("fan: failed to change speed: {err}");
            }
            // The intended level sticks even when the write failed; the
            // next tick re-evaluates from scratch and retries only if
            // conditions still warrant it.
            self.state = Some(next);
        }
    }

    #[cfg(test)]
    pub(crate) fn sensors_mut(&mut self) -> &mut [Sensor] {
        &mut self.sensors
    }
}
