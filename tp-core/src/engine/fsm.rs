//! Table-driven fan state machine
//!
//! Transitions are a static ordered table of (state pattern, event) rows,
//! each carrying a pure rule function over the current trend sample. Rows
//! are scanned in declared order and the first match wins; the wildcard
//! START/STOP rows deliberately bracket the state-specific TIMER rows, so
//! the row order is part of the dispatch semantics and must not change.
//!
//! Escalation margins tighten as speed increases (20 degrees at
//! AUTO -> HIGHSPEED, 10 at HIGHSPEED -> FULLSPEED) and every elevated
//! state checks the de-escalation valve (predicted future below the
//! observed minimum) before its escalation condition.

use crate::constants::fsm::{FULLSPEED_MARGIN_C, HIGHSPEED_MARGIN_C};
use crate::engine::trend::TrendSample;

/// Resident fan states. The uninitialized state that exists before the
/// first transition is modeled as `Option::<FanState>::None` and only
/// wildcard rows can match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanState {
    Auto,
    HighSpeed,
    FullSpeed,
}

impl FanState {
    /// Command string accepted by the ThinkPad ACPI fan control file
    pub fn command(self) -> &'static str {
        match self {
            FanState::Auto => "level auto",
            FanState::HighSpeed => "level 7",
            FanState::FullSpeed => "level full-speed",
        }
    }
}

/// Events delivered to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    Timer,
    Stop,
}

/// Pattern a transition row uses to match the current state
#[derive(Clone, Copy, PartialEq, Eq)]
enum StatePattern {
    /// Matches any current state, including uninitialized
    Any,
    /// Matches exactly one resident state
    Only(FanState),
}

impl StatePattern {
    fn matches(self, current: Option<FanState>) -> bool {
        match self {
            StatePattern::Any => true,
            StatePattern::Only(state) => current == Some(state),
        }
    }
}

type Rule = fn(&TrendSample) -> FanState;

struct Transition {
    from: StatePattern,
    event: Event,
    rule: Rule,
}

fn clear(_trend: &TrendSample) -> FanState {
    FanState::Auto
}

fn from_auto(trend: &TrendSample) -> FanState {
    if trend.predicted < trend.min {
        return FanState::Auto;
    }
    if trend.current > trend.max - HIGHSPEED_MARGIN_C {
        return FanState::HighSpeed;
    }
    FanState::Auto
}

fn from_highspeed(trend: &TrendSample) -> FanState {
    if trend.predicted < trend.min {
        return FanState::Auto;
    }
    if trend.current > trend.max - FULLSPEED_MARGIN_C {
        return FanState::FullSpeed;
    }
    FanState::HighSpeed
}

fn from_fullspeed(trend: &TrendSample) -> FanState {
    if trend.predicted < trend.min {
        return FanState::Auto;
    }
    FanState::FullSpeed
}

/// The transition table. Row order is load-bearing, see the module docs.
const TRANSITIONS: [Transition; 5] = [
    Transition {
        from: StatePattern::Any,
        event: Event::Start,
        rule: clear,
    },
    Transition {
        from: StatePattern::Only(FanState::Auto),
        event: Event::Timer,
        rule: from_auto,
    },
    Transition {
        from: StatePattern::Only(FanState::HighSpeed),
        event: Event::Timer,
        rule: from_highspeed,
    },
    Transition {
        from: StatePattern::Only(FanState::FullSpeed),
        event: Event::Timer,
        rule: from_fullspeed,
    },
    Transition {
        from: StatePattern::Any,
        event: Event::Stop,
        rule: clear,
    },
];

/// Look up the next state for (current, event) against the table.
///
/// Returns `None` when no row matches, which the caller treats as "keep
/// the current state". A TIMER event in the uninitialized state matches
/// nothing, by construction of the table.
pub fn next_state(current: Option<FanState>, event: Event, trend: &TrendSample) -> Option<FanState> {
    TRANSITIONS
        .iter()
        .find(|t| t.from.matches(current) && t.event == event)
        .map(|t| (t.rule)(trend))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(current: f64, predicted: f64, min: f64, max: f64) -> TrendSample {
        TrendSample {
            current,
            predicted,
            min,
            max,
        }
    }

    // Steady conditions: predicted above the minimum, current well below
    // the escalation threshold.
    fn calm() -> TrendSample {
        sample(55.0, 56_000.0, 35_000.0, 90.0)
    }

    #[test]
    fn start_resets_to_auto_from_anywhere() {
        for current in [
            None,
            Some(FanState::Auto),
            Some(FanState::HighSpeed),
            Some(FanState::FullSpeed),
        ] {
            assert_eq!(
                next_state(current, Event::Start, &calm()),
                Some(FanState::Auto)
            );
        }
    }

    #[test]
    fn stop_resets_to_auto_from_anywhere() {
        for current in [
            None,
            Some(FanState::Auto),
            Some(FanState::HighSpeed),
            Some(FanState::FullSpeed),
        ] {
            assert_eq!(
                next_state(current, Event::Stop, &calm()),
                Some(FanState::Auto)
            );
        }
    }

    #[test]
    fn timer_in_uninitialized_state_matches_no_row() {
        assert_eq!(next_state(None, Event::Timer, &calm()), None);
    }

    #[test]
    fn auto_holds_below_threshold() {
        assert_eq!(
            next_state(Some(FanState::Auto), Event::Timer, &calm()),
            Some(FanState::Auto)
        );
    }

    #[test]
    fn auto_escalates_one_step_at_twenty_degree_margin() {
        // current 71 > 90 - 20: escalate, but only to HIGHSPEED.
        let hot = sample(71.0, 72_000.0, 35_000.0, 90.0);
        assert_eq!(
            next_state(Some(FanState::Auto), Event::Timer, &hot),
            Some(FanState::HighSpeed)
        );
    }

    #[test]
    fn auto_does_not_skip_to_fullspeed() {
        // Even far above the FULLSPEED threshold, AUTO escalates one step.
        let very_hot = sample(89.0, 90_000.0, 35_000.0, 90.0);
        assert_eq!(
            next_state(Some(FanState::Auto), Event::Timer, &very_hot),
            Some(FanState::HighSpeed)
        );
    }

    #[test]
    fn highspeed_escalates_at_ten_degree_margin() {
        let below = sample(79.0, 80_000.0, 35_000.0, 90.0);
        assert_eq!(
            next_state(Some(FanState::HighSpeed), Event::Timer, &below),
            Some(FanState::HighSpeed)
        );

        let above = sample(81.0, 82_000.0, 35_000.0, 90.0);
        assert_eq!(
            next_state(Some(FanState::HighSpeed), Event::Timer, &above),
            Some(FanState::FullSpeed)
        );
    }

    #[test]
    fn fullspeed_holds_unless_valve_fires() {
        assert_eq!(
            next_state(Some(FanState::FullSpeed), Event::Timer, &calm()),
            Some(FanState::FullSpeed)
        );
    }

    #[test]
    fn deescalation_valve_fires_from_every_elevated_state() {
        // Predicted future below the observed minimum drops straight back
        // to AUTO regardless of the current level.
        let cooling = sample(85.0, 30_000.0, 35_000.0, 90.0);
        for state in [FanState::Auto, FanState::HighSpeed, FanState::FullSpeed] {
            assert_eq!(
                next_state(Some(state), Event::Timer, &cooling),
                Some(FanState::Auto)
            );
        }
    }

    #[test]
    fn valve_is_checked_before_escalation() {
        // Both conditions true: the valve wins because it is tested first.
        let contradictory = sample(85.0, 30_000.0, 35_000.0, 90.0);
        assert_eq!(
            next_state(Some(FanState::Auto), Event::Timer, &contradictory),
            Some(FanState::Auto)
        );
    }

    #[test]
    fn commands_match_thinkpad_acpi_syntax() {
        assert_eq!(FanState::Auto.command(), "level auto");
        assert_eq!(FanState::HighSpeed.command(), "level 7");
        assert_eq!(FanState::FullSpeed.command(), "level full-speed");
    }
}
