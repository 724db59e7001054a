//! Monitoring engine: trend estimation and the fan state machine

pub mod fsm;
pub mod trend;
