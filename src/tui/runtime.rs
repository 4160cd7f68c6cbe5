//! Playback state for the terminal chart.

use std::time::Instant;

use crate::sim::clock::SimTime;
use crate::sim::engine::Engine;
use crate::sim::event::{Annotation, SegmentKind, ToggleEvent};
use crate::sim::status::StatusLine;
use crate::sim::types::SimulationConfig;

/// Tick interval in milliseconds.
pub const TICK_MS: u64 = 40;

/// Simulated minutes per tick (slowest → fastest).
const SPEED_LEVELS_MIN: [usize; 6] = [1, 5, 15, 30, 60, 180];

/// Default speed index (15 minutes per tick).
const DEFAULT_SPEED_IDX: usize = 2;

/// One plotted minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// 1-based minute index.
    pub minute: usize,
    /// Energy after the minute (Wh).
    pub energy_wh: f64,
    /// Status of the minute.
    pub kind: SegmentKind,
}

/// TUI application state.
pub struct App {
    engine: Engine,
    /// Configuration kept for restart.
    config: SimulationConfig,
    /// Every minute simulated so far.
    pub history: Vec<ChartPoint>,
    /// Most recent status line, the final one once playback ends.
    pub last_status: Option<StatusLine>,
    /// Closing toggle event, set once playback ends.
    pub closing: Option<ToggleEvent>,
    /// Time of the most recent minute.
    pub now: Option<SimTime>,
    /// Playback is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MIN`.
    pub speed_idx: usize,
    /// The user asked to quit.
    pub quit: bool,
    /// When the last tick was executed.
    pub last_tick: Instant,
}

impl App {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            engine: Engine::new(config.clone()),
            history: Vec::with_capacity(config.total_minutes()),
            config,
            last_status: None,
            closing: None,
            now: None,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
        }
    }

    /// Advances the engine by the current number of minutes per tick.
    ///
    /// After the last minute, shows the final status line and records the
    /// closing event.
    pub fn tick(&mut self) {
        for _ in 0..self.minutes_per_tick() {
            let Some(step) = self.engine.step() else {
                break;
            };
            self.history.push(ChartPoint {
                minute: step.time.index,
                energy_wh: step.energy_wh,
                kind: SegmentKind::from_flags(step.on, step.day_charging, step.limited),
            });
            if step.status.is_some() {
                self.last_status = step.status;
            }
            self.now = Some(step.time);
        }
        if self.engine.is_finished() && self.closing.is_none() {
            self.last_status = Some(self.engine.current_status());
            self.closing = Some(self.engine.closing_event());
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MIN.len() {
            self.speed_idx += 1;
        }
    }

    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    pub fn minutes_per_tick(&self) -> usize {
        SPEED_LEVELS_MIN[self.speed_idx]
    }

    /// Restarts playback from 12:00 on the start day.
    pub fn restart(&mut self) {
        self.engine = Engine::new(self.config.clone());
        self.history.clear();
        self.last_status = None;
        self.closing = None;
        self.now = None;
        self.paused = false;
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current battery fill, 0.0 to 1.0.
    pub fn battery_fraction(&self) -> f64 {
        self.engine.state().energy_wh / self.config.capacity_wh
    }

    /// Minutes simulated so far.
    pub fn elapsed(&self) -> usize {
        self.engine.elapsed_minutes()
    }

    pub fn total_minutes(&self) -> usize {
        self.config.total_minutes()
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Annotations recorded so far.
    pub fn annotations(&self) -> &[Annotation] {
        self.engine.annotations()
    }

    /// Plotted points of one status kind.
    pub fn points_of(&self, kind: SegmentKind) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| (p.minute as f64, p.energy_wh))
            .collect()
    }
}
