//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveTime;
use power_sim::config::ScenarioConfig;
use power_sim::sim::engine::Engine;
use power_sim::sim::run::{SeriesRow, SimulationRun};
use power_sim::sim::types::TIME_FORMAT;

/// Minutes in the default Wednesday-to-Wednesday run: 7 days plus 12:00 to 18:00.
pub const DEFAULT_TOTAL_MINUTES: usize = 7 * 1440 + 361;

/// Validates and runs a scenario to completion.
pub fn run_scenario(scenario: &ScenarioConfig) -> SimulationRun {
    let errors = scenario.validate();
    assert!(errors.is_empty(), "scenario should be valid: {errors:?}");
    Engine::new(scenario.to_simulation_config()).run()
}

/// The default preset run.
pub fn apogaea_run() -> SimulationRun {
    run_scenario(&ScenarioConfig::apogaea())
}

/// A light load with an unconditional 09:00–14:00 day charge.
pub fn always_day_charge_scenario() -> ScenarioConfig {
    let mut scenario = ScenarioConfig::apogaea();
    scenario.load.load_w = Some(20.0);
    scenario.schedule.day_charge_start = NaiveTime::from_hms_opt(9, 0, 0);
    scenario.schedule.day_charge_end = NaiveTime::from_hms_opt(14, 0, 0);
    scenario.schedule.always_day_charge = true;
    scenario
}

/// First series row at the given weekday and `HH:MM`.
pub fn row_at(run: &SimulationRun, weekday: &str, time: &str) -> SeriesRow {
    run.rows(0, usize::MAX)
        .into_iter()
        .find(|row| {
            row.weekday.to_string() == weekday && row.time.format(TIME_FORMAT).to_string() == time
        })
        .unwrap_or_else(|| panic!("no row at {weekday} {time}"))
}

/// Checks ordering and bounds of the recorded toggles and annotations.
pub fn assert_recorder_invariants(run: &SimulationRun) {
    let first = run.toggles.first().expect("opening event");
    assert_eq!(first.minute, 0);
    assert!(first.on);
    assert!(!first.day_charging);

    let last = run.toggles.last().expect("closing event");
    assert_eq!(last.minute, run.total_minutes);
    assert!(!last.day_charging);

    let transitions = run.transitions();
    assert!(
        transitions.windows(2).all(|w| w[0].minute < w[1].minute),
        "transitions must be strictly increasing"
    );
    assert!(transitions.iter().all(|t| t.minute > 0 && t.minute <= run.total_minutes));
    assert!(
        run.toggles.windows(2).all(|w| w[0].minute <= w[1].minute),
        "toggles must be non-decreasing"
    );

    assert!(
        run.annotations
            .windows(2)
            .all(|w| w[1].minute >= w[0].minute + 10),
        "annotations must be at least 10 minutes apart"
    );
}
