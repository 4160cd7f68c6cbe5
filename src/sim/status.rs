//! Human-readable status lines.

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

use super::clock::SimTime;
use super::state::BatteryState;
use super::types::{SimulationConfig, TIME_FORMAT, hhmm};

/// One printed status line, captured as values.
///
/// Displays as e.g. `Wed 12:00 1280.00 Wh 100% maxed on limited`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    /// Day of the week.
    pub weekday: Weekday,
    /// Wall-clock time, printed as `HH:MM`.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Stored energy (Wh).
    pub energy_wh: f64,
    /// Truncated percent of capacity.
    pub percent: u32,
    /// Battery hit capacity this minute.
    pub maxed: bool,
    /// Load is powered.
    pub on: bool,
    /// Solar input was capped this minute.
    pub limited: bool,
    /// Energy rose over the last minute.
    pub increasing: bool,
}

impl StatusLine {
    /// Captures the status of `state` at `now`.
    pub fn capture(now: &SimTime, state: &BatteryState, config: &SimulationConfig) -> Self {
        Self {
            weekday: now.weekday(),
            time: now.time,
            energy_wh: state.energy_wh,
            percent: config.percent_of(state.energy_wh),
            maxed: state.maxed,
            on: state.on,
            limited: state.limited,
            increasing: state.increasing,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:>7.2} Wh {:>3}%",
            self.weekday,
            self.time.format(TIME_FORMAT),
            self.energy_wh,
            self.percent
        )?;
        if self.maxed {
            f.write_str(" maxed")?;
        }
        f.write_str(if self.on { " on" } else { " off" })?;
        if self.limited {
            f.write_str(" limited")?;
        }
        if !self.maxed {
            f.write_str(if self.increasing {
                " increasing"
            } else {
                " decreasing"
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> StatusLine {
        StatusLine {
            weekday: Weekday::Wed,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            energy_wh: 1280.0,
            percent: 100,
            maxed: true,
            on: true,
            limited: true,
            increasing: false,
        }
    }

    #[test]
    fn maxed_line_omits_trend() {
        assert_eq!(line().to_string(), "Wed 12:00 1280.00 Wh 100% maxed on limited");
    }

    #[test]
    fn unmaxed_line_shows_trend() {
        let status = StatusLine {
            time: NaiveTime::from_hms_opt(7, 5, 0).unwrap(),
            energy_wh: 95.456,
            percent: 7,
            maxed: false,
            on: false,
            limited: false,
            increasing: true,
            ..line()
        };
        assert_eq!(status.to_string(), "Wed 07:05   95.46 Wh   7% off increasing");
    }
}
