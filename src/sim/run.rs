//! The recorded output of a finished run, shared read-only with renderers.

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

use super::clock::SimTime;
use super::event::{Annotation, SegmentKind, ToggleEvent};
use super::status::StatusLine;
use super::types::{SimulationConfig, hhmm};

/// Everything a renderer needs, without re-deriving simulation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    /// Configuration the run was produced from.
    pub config: SimulationConfig,
    /// Energy at the start of each simulated minute (Wh).
    pub series: Vec<f64>,
    /// Opening event, transitions, and closing event, in minute order.
    pub toggles: Vec<ToggleEvent>,
    /// Rate-limited chart annotations, in minute order.
    pub annotations: Vec<Annotation>,
    /// Every status line printed, ending with the final one.
    pub status_lines: Vec<StatusLine>,
    /// Number of simulated minutes.
    pub total_minutes: usize,
    /// Energy after the last minute (Wh).
    pub final_energy_wh: f64,
}

/// A stretch of the series with a constant status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First series index, inclusive.
    pub start: usize,
    /// Last series index, exclusive.
    pub end: usize,
    /// Status of the whole stretch.
    pub kind: SegmentKind,
    /// Flags of the opening event.
    pub event: ToggleEvent,
}

impl Segment {
    /// Number of minutes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` when the segment covers no minutes.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// One minute of the series with its wall-clock time and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    /// Series index.
    pub minute: usize,
    /// Day of the week.
    pub weekday: Weekday,
    /// Wall-clock time, serialized as `HH:MM`.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Energy at the start of the minute (Wh).
    pub energy_wh: f64,
    /// Truncated percent of capacity.
    pub percent: u32,
    /// Load powered during the segment.
    pub on: bool,
    /// Held off for the day charge during the segment.
    pub day_charging: bool,
    /// Solar input capped during the segment.
    pub limited: bool,
}

impl SimulationRun {
    /// Consecutive status segments between toggle events.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.toggles.windows(2).map(|pair| Segment {
            start: pair[0].minute,
            end: pair[1].minute,
            kind: pair[0].kind(),
            event: pair[0],
        })
    }

    /// Wall-clock time of series index `minute`.
    pub fn time_at(&self, minute: usize) -> SimTime {
        SimTime::at_offset(self.config.start_day, minute)
    }

    /// Wall-clock minute in which a toggle event happened.
    ///
    /// The opening event maps to the first minute and the closing event to
    /// the last.
    pub fn event_time(&self, event: &ToggleEvent) -> SimTime {
        self.time_at(event.minute.saturating_sub(1))
    }

    /// Per-minute rows for tabular export, optionally limited to an
    /// inclusive index range.
    pub fn rows(&self, from: usize, to: usize) -> Vec<SeriesRow> {
        let mut rows = Vec::new();
        for segment in self.segments() {
            let start = segment.start.max(from);
            let end = segment.end.min(to.saturating_add(1)).min(self.series.len());
            for minute in start..end {
                let time = self.time_at(minute);
                let energy_wh = self.series[minute];
                rows.push(SeriesRow {
                    minute,
                    weekday: time.weekday(),
                    time: time.time,
                    energy_wh,
                    percent: self.config.percent_of(energy_wh),
                    on: segment.event.on,
                    day_charging: segment.event.day_charging,
                    limited: segment.event.limited,
                });
            }
        }
        rows
    }

    /// Transitions only, without the opening and closing markers.
    pub fn transitions(&self) -> &[ToggleEvent] {
        match self.toggles.len() {
            0..=2 => &[],
            n => &self.toggles[1..n - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::engine::Engine;

    #[test]
    fn segments_cover_the_whole_series() {
        let run = Engine::new(ScenarioConfig::apogaea().to_simulation_config()).run();
        let covered: usize = run.segments().map(|s| s.len()).sum();
        assert_eq!(covered, run.series.len());
    }

    #[test]
    fn rows_respect_range() {
        let run = Engine::new(ScenarioConfig::apogaea().to_simulation_config()).run();
        let rows = run.rows(10, 19);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].minute, 10);
        assert_eq!(rows[0].time, NaiveTime::from_hms_opt(12, 10, 0).unwrap());
        assert_eq!(run.rows(0, usize::MAX).len(), run.series.len());
    }

    #[test]
    fn markers_map_to_first_and_last_minute() {
        let run = Engine::new(ScenarioConfig::apogaea().to_simulation_config()).run();
        let first = run.toggles.first().unwrap();
        let last = run.toggles.last().unwrap();
        assert_eq!(run.event_time(first).to_string(), "Wed 12:00");
        assert_eq!(run.event_time(last).to_string(), "Wed 18:00");
    }
}
