//! Simulation engine that drives the clock, battery state, and recorder.

use super::clock::{Clock, SimTime};
use super::event::{Annotation, OFFSET_LEFT, OFFSET_RIGHT, Recorder, ToggleEvent};
use super::run::SimulationRun;
use super::state::{BatteryState, advance_minute};
use super::status::StatusLine;
use super::types::SimulationConfig;

/// Flags compared between consecutive minutes to detect transitions.
#[derive(Debug, Clone, Copy)]
struct Previous {
    on: bool,
    maxed: bool,
    limited: bool,
    increasing: bool,
}

/// Outcome of one simulated minute.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The minute just simulated.
    pub time: SimTime,
    /// Energy after the update (Wh).
    pub energy_wh: f64,
    /// Load is powered.
    pub on: bool,
    /// Battery hit capacity this minute.
    pub maxed: bool,
    /// Load is held off for the day charge.
    pub day_charging: bool,
    /// Solar input was capped this minute.
    pub limited: bool,
    /// Status line emitted this minute, if any.
    pub status: Option<StatusLine>,
}

/// Simulation engine owning all mutable run state.
///
/// Step it minute by minute with [`Engine::step`] or run it to the end with
/// [`Engine::run`].
///
/// # Examples
///
/// ```
/// use power_sim::config::ScenarioConfig;
/// use power_sim::sim::engine::Engine;
///
/// let config = ScenarioConfig::apogaea().to_simulation_config();
/// let run = Engine::new(config).run();
/// assert_eq!(run.status_lines[0].to_string().get(..9), Some("Wed 12:00"));
/// ```
pub struct Engine {
    config: SimulationConfig,
    clock: Clock,
    state: BatteryState,
    previous: Previous,
    recorder: Recorder,
    series: Vec<f64>,
    status_lines: Vec<StatusLine>,
}

impl Engine {
    /// Creates an engine with a full battery at 12:00 on the start day.
    pub fn new(config: SimulationConfig) -> Self {
        let state = BatteryState::full(config.capacity_wh);
        let previous = Previous {
            on: true,
            maxed: true,
            limited: false,
            increasing: false,
        };
        let recorder = Recorder::new(ToggleEvent {
            minute: 0,
            on: true,
            day_charging: false,
            limited: false,
        });
        Self {
            clock: Clock::new(config.start_day, config.end_day()),
            series: Vec::with_capacity(config.total_minutes()),
            config,
            state,
            previous,
            recorder,
            status_lines: Vec::new(),
        }
    }

    /// Executes one simulated minute.
    ///
    /// # Returns
    ///
    /// * `Some(result)` - The minute's outcome
    /// * `None` - If the run has already reached its last minute
    pub fn step(&mut self) -> Option<StepResult> {
        let now = self.clock.tick()?;

        self.series.push(self.state.energy_wh);
        let update = advance_minute(&mut self.state, &self.config, &now);

        let state = &self.state;
        let prev = self.previous;
        let mut need_status = now.index == 1 || update.day_charge_started;

        if state.increasing != prev.increasing && !state.maxed {
            need_status = true;
        }
        if state.on != prev.on || state.limited != prev.limited {
            need_status = true;
            self.recorder
                .record_toggle(ToggleEvent::from_state(now.index, state));
        }
        if state.on != prev.on {
            let offset = if state.on { OFFSET_RIGHT } else { OFFSET_LEFT };
            self.recorder.annotate(Annotation::at(&now, state, offset));
        }
        if state.maxed != prev.maxed {
            need_status = true;
            let offset = if state.maxed { OFFSET_LEFT } else { OFFSET_RIGHT };
            self.recorder.annotate(Annotation::at(&now, state, offset));
        }
        if state.limited != prev.limited {
            self.recorder
                .annotate(Annotation::at(&now, state, OFFSET_LEFT));
        }

        let status = need_status.then(|| StatusLine::capture(&now, state, &self.config));
        if let Some(line) = &status {
            self.status_lines.push(line.clone());
        }

        self.previous = Previous {
            on: state.on,
            maxed: state.maxed,
            limited: state.limited,
            increasing: state.increasing,
        };

        Some(StepResult {
            time: now,
            energy_wh: state.energy_wh,
            on: state.on,
            maxed: state.maxed,
            day_charging: state.day_charging,
            limited: state.limited,
            status,
        })
    }

    /// Returns `true` once every minute has been simulated.
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Runs any remaining minutes and returns the recorded run.
    ///
    /// Appends the final status line and the closing toggle event.
    pub fn finish(mut self) -> SimulationRun {
        while self.step().is_some() {}

        let final_status = self.current_status();
        self.status_lines.push(final_status);
        let closing = self.closing_event();
        let (toggles, annotations) = self.recorder.close(closing);

        SimulationRun {
            total_minutes: self.clock.now().index,
            final_energy_wh: self.state.energy_wh,
            config: self.config,
            series: self.series,
            toggles,
            annotations,
            status_lines: self.status_lines,
        }
    }

    /// Executes all minutes and returns the recorded run.
    pub fn run(self) -> SimulationRun {
        self.finish()
    }

    /// Status line for the most recent minute.
    pub fn current_status(&self) -> StatusLine {
        StatusLine::capture(&self.clock.now(), &self.state, &self.config)
    }

    /// Event closing the toggle log at the most recent minute.
    pub fn closing_event(&self) -> ToggleEvent {
        ToggleEvent {
            minute: self.clock.now().index,
            on: self.state.on,
            day_charging: false,
            limited: self.state.limited,
        }
    }

    /// Current battery state.
    pub fn state(&self) -> &BatteryState {
        &self.state
    }

    /// The configuration this engine runs.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Minutes simulated so far.
    pub fn elapsed_minutes(&self) -> usize {
        self.series.len()
    }

    /// Energy at the start of every minute simulated so far.
    pub fn series(&self) -> &[f64] {
        &self.series
    }

    /// Toggle events recorded so far, starting with the opening event.
    pub fn toggles(&self) -> &[ToggleEvent] {
        self.recorder.toggles()
    }

    /// Annotations recorded so far.
    pub fn annotations(&self) -> &[Annotation] {
        self.recorder.annotations()
    }

    /// Status lines emitted so far.
    pub fn status_lines(&self) -> &[StatusLine] {
        &self.status_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn engine() -> Engine {
        Engine::new(ScenarioConfig::apogaea().to_simulation_config())
    }

    #[test]
    fn first_step_emits_status_line() {
        let mut engine = engine();
        let first = engine.step().unwrap();
        assert_eq!(first.time.to_string(), "Wed 12:00");
        assert!(first.status.is_some());
        assert_eq!(engine.series(), &[1280.0]);
    }

    #[test]
    fn step_returns_none_when_finished() {
        let mut engine = engine();
        let total = engine.config().total_minutes();
        for _ in 0..total {
            assert!(engine.step().is_some());
        }
        assert!(engine.is_finished());
        assert!(engine.step().is_none());
        assert_eq!(engine.elapsed_minutes(), total);
    }

    #[test]
    fn finish_closes_toggle_log() {
        let run = engine().run();
        let first = run.toggles.first().unwrap();
        let last = run.toggles.last().unwrap();
        assert_eq!(first.minute, 0);
        assert_eq!(last.minute, run.total_minutes);
        assert_eq!(run.series.len(), run.total_minutes);
    }

    #[test]
    fn closing_event_matches_finished_run() {
        let mut engine = engine();
        while engine.step().is_some() {}
        let closing = engine.closing_event();
        let status = engine.current_status();
        let annotations = engine.annotations().to_vec();

        let run = engine.finish();
        assert_eq!(run.toggles.last(), Some(&closing));
        assert_eq!(run.status_lines.last(), Some(&status));
        assert_eq!(run.annotations, annotations);
    }

    #[test]
    fn final_status_line_is_always_printed() {
        let run = engine().run();
        let last = run.status_lines.last().unwrap();
        assert_eq!(last.to_string().get(..9), Some("Wed 18:00"));
    }
}
