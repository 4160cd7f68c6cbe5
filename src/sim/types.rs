//! Core simulation types: time of day, day-charge window, and configuration.

use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Hour the simulation starts on the first day and the hour of solar noon.
pub const START_HOUR: u32 = 12;

/// Hour after which solar charging is treated as impossible.
pub const EVENING_HOUR: u32 = 18;

/// Format of every printed time of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a wall-clock time given as `H:MM` or `HH:MM`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use power_sim::sim::types::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("7:30"), Ok(NaiveTime::from_hms_opt(7, 30, 0).unwrap()));
/// assert!(parse_time_of_day("7:3").is_err());
/// ```
///
/// # Errors
///
/// Returns a message naming the input when it is malformed or out of range.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, String> {
    let two_digit_minutes = s.split_once(':').is_some_and(|(_, minute)| minute.len() == 2);
    two_digit_minutes
        .then(|| NaiveTime::parse_from_str(s, TIME_FORMAT).ok())
        .flatten()
        .ok_or_else(|| format!("bad time \"{s}\", should be e.g. 12:00"))
}

/// Time of day `minutes` after midnight, wrapping at 24:00.
pub fn time_at_minute(minutes: u32) -> NaiveTime {
    NaiveTime::MIN + TimeDelta::minutes(i64::from(minutes % MINUTES_PER_DAY))
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// `serde` adapters writing times of day as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TIME_FORMAT, parse_time_of_day};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }

    /// The same for optional fields.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::{TIME_FORMAT, parse_time_of_day};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.collect_str(&time.format(TIME_FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| parse_time_of_day(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Scheduled daytime window during which the load is kept off to recharge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayCharge {
    /// Time the load is switched off.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Optional time the load is switched back on; 18:00 applies regardless.
    #[serde(with = "hhmm::option")]
    pub end: Option<NaiveTime>,
    /// Charge every day, even when the battery is above the resume threshold.
    pub always: bool,
}

/// Immutable parameters of one simulation run, in watts and watt-hours.
///
/// Built from a validated [`crate::config::ScenarioConfig`]; the engine
/// assumes `0 <= off_wh < resume_wh <= capacity_wh` and `std_dev > 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    /// Solar panel output at solar noon (W).
    pub solar_w: f64,
    /// Charge controller absorption limit (W), if any.
    pub max_charge_w: Option<f64>,
    /// Usable battery capacity (Wh).
    pub capacity_wh: f64,
    /// Energy below which the load shuts off (Wh).
    pub off_wh: f64,
    /// Energy above which the load resumes (Wh).
    pub resume_wh: f64,
    /// Load draw while on (W).
    pub load_w: f64,
    /// Monitoring circuitry draw, always present (W).
    pub idle_w: f64,
    /// Width of the sunlight curve (hours).
    pub std_dev: f64,
    /// Weekday the run starts on, 0 = Sunday.
    pub start_day: u32,
    /// Optional daily charge window.
    pub day_charge: Option<DayCharge>,
}

impl SimulationConfig {
    /// Absolute day index on which the run stops at 18:00.
    ///
    /// Runs seven days, or eight when starting on a Sunday.
    pub fn end_day(&self) -> u32 {
        let days = if self.start_day == 0 { 8 } else { 7 };
        self.start_day + days
    }

    /// Number of simulated minutes, from 12:00 on the start day through
    /// 18:00 on [`Self::end_day`] inclusive.
    pub fn total_minutes(&self) -> usize {
        let days = self.end_day() - self.start_day;
        let minutes = days * MINUTES_PER_DAY + (EVENING_HOUR - START_HOUR) * 60 + 1;
        minutes as usize
    }

    /// Energy as a whole percentage of capacity, truncated.
    pub fn percent_of(&self, energy_wh: f64) -> u32 {
        (energy_wh / self.capacity_wh * 100.0) as u32
    }

    /// Returns `true` when day-charging is forced regardless of battery level.
    pub fn always_day_charge(&self) -> bool {
        self.day_charge.is_some_and(|d| d.always)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn parses_one_and_two_digit_hours() {
        assert_eq!(parse_time_of_day("9:05"), Ok(hm(9, 5)));
        assert_eq!(parse_time_of_day("14:00"), Ok(hm(14, 0)));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "12", "12:0", "9:5", "123:00", "ab:cd", "24:00", "12:60", "12:00pm"] {
            assert!(parse_time_of_day(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn minute_of_day_wraps_with_time_at_minute() {
        assert_eq!(minute_of_day(hm(10, 0)), 600);
        assert_eq!(time_at_minute(600), hm(10, 0));
        assert_eq!(time_at_minute(MINUTES_PER_DAY + 5), hm(0, 5));
        assert!(hm(9, 59) < hm(10, 0));
    }

    #[test]
    fn day_charge_serializes_as_hours_and_minutes() {
        let window = DayCharge {
            start: hm(9, 0),
            end: None,
            always: false,
        };
        let text = toml::to_string(&window).unwrap();
        assert!(text.contains("start = \"09:00\""), "{text}");
    }

    #[test]
    fn end_day_extends_for_sunday_start() {
        let mut cfg = crate::config::ScenarioConfig::apogaea().to_simulation_config();
        assert_eq!(cfg.end_day(), 10);
        cfg.start_day = 0;
        assert_eq!(cfg.end_day(), 8);
        assert_eq!(cfg.total_minutes(), 8 * 1440 + 361);
    }

    #[test]
    fn percent_truncates() {
        let cfg = crate::config::ScenarioConfig::apogaea().to_simulation_config();
        assert_eq!(cfg.percent_of(cfg.capacity_wh), 100);
        assert_eq!(cfg.percent_of(cfg.capacity_wh * 0.259_9), 25);
    }
}
