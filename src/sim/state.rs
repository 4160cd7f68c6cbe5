//! Battery state and the per-minute power-state machine.

use super::clock::SimTime;
use super::sunlight::sunlight_fraction;
use super::types::{EVENING_HOUR, SimulationConfig};

/// Mutable battery and load state, owned by the engine for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryState {
    /// Stored energy (Wh), within `[0, capacity]` after every update.
    pub energy_wh: f64,
    /// Load is powered.
    pub on: bool,
    /// Battery hit capacity this minute and surplus was discarded.
    pub maxed: bool,
    /// Load is held off for the scheduled day charge.
    pub day_charging: bool,
    /// Solar input was capped by the charge controller this minute.
    pub limited: bool,
    /// Energy rose over the last minute.
    pub increasing: bool,
}

impl BatteryState {
    /// A fully charged battery with the load on.
    pub fn full(capacity_wh: f64) -> Self {
        Self {
            energy_wh: capacity_wh,
            on: true,
            maxed: false,
            day_charging: false,
            limited: false,
            increasing: false,
        }
    }
}

/// Side effects of one minute that are not visible in the state itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinuteUpdate {
    /// The scheduled day charge switched the load off this minute.
    pub day_charge_started: bool,
}

/// Solar energy delivered to the battery this minute (Wh) and whether the
/// charge controller capped it.
pub fn solar_input_wh(config: &SimulationConfig, now: &SimTime) -> (f64, bool) {
    let sun = sunlight_fraction(now.hour(), now.minute(), config.std_dev);
    let raw = sun * config.solar_w / 60.0;
    match config.max_charge_w {
        Some(max_w) if raw > max_w / 60.0 => (max_w / 60.0, true),
        _ => (raw, false),
    }
}

/// Advances `state` by one simulated minute at `now`.
///
/// Applies load and idle draw, solar input with the charge cap, threshold
/// hysteresis and clamping, then the day-charge window.
pub fn advance_minute(
    state: &mut BatteryState,
    config: &SimulationConfig,
    now: &SimTime,
) -> MinuteUpdate {
    let previous_wh = state.energy_wh;
    let always = config.always_day_charge();

    if state.on && !state.day_charging {
        state.energy_wh -= config.load_w / 60.0;
    }
    state.energy_wh -= config.idle_w / 60.0;

    let (solar_wh, limited) = solar_input_wh(config, now);
    state.limited = limited;
    state.energy_wh += solar_wh;

    state.maxed = false;
    if state.energy_wh < config.off_wh {
        state.on = false;
    } else if state.energy_wh > config.capacity_wh {
        state.energy_wh = config.capacity_wh;
        state.maxed = true;
    }
    state.energy_wh = state.energy_wh.max(0.0);

    if state.energy_wh > config.resume_wh && !always {
        state.on = true;
        state.day_charging = false;
    }

    let mut update = MinuteUpdate::default();
    if let Some(window) = config.day_charge {
        let time = now.time;
        if time == window.start && (state.energy_wh < config.resume_wh || window.always) {
            state.on = false;
            state.day_charging = true;
            update.day_charge_started = true;
        } else if state.day_charging
            && (now.hour() >= EVENING_HOUR || window.end.is_some_and(|end| time >= end))
        {
            // No useful sun after the window closes.
            state.on = true;
            state.day_charging = false;
        }
    }

    state.increasing = state.energy_wh > previous_wh;
    update
}
