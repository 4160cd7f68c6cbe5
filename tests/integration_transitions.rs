//! Integration tests tying recorded toggle events to per-minute state.

mod common;

use power_sim::config::ScenarioConfig;
use power_sim::sim::engine::Engine;
use power_sim::sim::event::ToggleEvent;

/// Steps a scenario minute by minute and checks that the recorded
/// transitions are exactly the minutes where `on` or `limited` changed.
fn assert_transitions_match_steps(scenario: &ScenarioConfig) -> usize {
    assert!(scenario.validate().is_empty());
    let mut engine = Engine::new(scenario.to_simulation_config());

    let mut previous = (true, false);
    let mut expected = Vec::new();
    while let Some(step) = engine.step() {
        let current = (step.on, step.limited);
        if current != previous {
            expected.push(ToggleEvent {
                minute: step.time.index,
                on: step.on,
                day_charging: step.day_charging,
                limited: step.limited,
            });
        }
        previous = current;
    }

    let run = engine.finish();
    common::assert_recorder_invariants(&run);
    assert_eq!(run.transitions(), expected.as_slice());
    expected.len()
}

#[test]
fn transitions_match_weak_sun_steps() {
    let mut scenario = ScenarioConfig::apogaea();
    scenario.solar.peak_w = 60.0;
    assert!(assert_transitions_match_steps(&scenario) > 0);
}

#[test]
fn transitions_match_burning_man_steps() {
    assert!(assert_transitions_match_steps(&ScenarioConfig::burning_man()) > 0);
}

#[test]
fn transitions_match_always_day_charge_steps() {
    let count = assert_transitions_match_steps(&common::always_day_charge_scenario());
    assert!(count >= 14, "one off and one on per day, got {count}");
}

#[test]
fn thresholds_hold_with_conditional_day_charge() {
    let mut scenario = ScenarioConfig::burning_man();
    scenario.solar.peak_w = 150.0;
    assert!(scenario.validate().is_empty());
    let config = scenario.to_simulation_config();
    let (off_wh, resume_wh) = (config.off_wh, config.resume_wh);

    let mut engine = Engine::new(config);
    let (mut was_on, mut was_charging) = (true, false);
    let (mut shutdowns, mut day_charges) = (0, 0);
    while let Some(step) = engine.step() {
        let at = step.time;
        if !was_charging && step.day_charging {
            day_charges += 1;
            assert_eq!((at.hour(), at.minute()), (9, 0), "day charge started at {at}");
        } else if was_on && !step.on {
            shutdowns += 1;
            assert!(step.energy_wh < off_wh, "shut off at {at} with {}", step.energy_wh);
        }
        if !was_on && step.on {
            let window_closed = was_charging && at.hour() >= 18;
            assert!(
                step.energy_wh > resume_wh || window_closed,
                "resumed at {at} with {}",
                step.energy_wh
            );
        }
        was_on = step.on;
        was_charging = step.day_charging;
    }

    assert!(shutdowns > 0);
    assert!(day_charges > 0);
}
