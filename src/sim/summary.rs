//! Post-hoc summary statistics computed from a finished run.

use std::fmt;

use serde::Serialize;

use super::event::SegmentKind;
use super::run::SimulationRun;

/// Aggregate figures derived from a complete [`SimulationRun`].
///
/// Computed after the fact so the report always agrees with the recorded
/// series and events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Lowest energy observed (Wh).
    pub min_energy_wh: f64,
    /// Lowest energy as a percent of capacity.
    pub min_percent: u32,
    /// Energy after the last minute (Wh).
    pub final_energy_wh: f64,
    /// Minutes with the load on.
    pub minutes_on: usize,
    /// Minutes with the load off after hitting the off threshold.
    pub minutes_off: usize,
    /// Minutes held off for the day charge.
    pub minutes_day_charging: usize,
    /// Minutes the charge controller capped solar input.
    pub minutes_limited: usize,
    /// Minutes starting at full capacity.
    pub minutes_full: usize,
    /// Number of times the load switched off.
    pub shutdowns: usize,
}

impl RunSummary {
    /// Computes the summary from a finished run.
    pub fn from_run(run: &SimulationRun) -> Self {
        let min_energy_wh = run
            .series
            .iter()
            .copied()
            .chain(std::iter::once(run.final_energy_wh))
            .fold(f64::INFINITY, f64::min);

        let mut summary = Self {
            min_energy_wh,
            min_percent: run.config.percent_of(min_energy_wh),
            final_energy_wh: run.final_energy_wh,
            minutes_on: 0,
            minutes_off: 0,
            minutes_day_charging: 0,
            minutes_limited: 0,
            minutes_full: run
                .series
                .iter()
                .filter(|&&wh| wh >= run.config.capacity_wh)
                .count(),
            shutdowns: run
                .toggles
                .windows(2)
                .filter(|pair| pair[0].on && !pair[1].on)
                .count(),
        };

        for segment in run.segments() {
            let minutes = segment.len();
            match segment.kind {
                SegmentKind::On | SegmentKind::OnLimited => summary.minutes_on += minutes,
                SegmentKind::Off | SegmentKind::OffLimited => summary.minutes_off += minutes,
                SegmentKind::DayCharging => summary.minutes_day_charging += minutes,
            }
            if segment.event.limited {
                summary.minutes_limited += minutes;
            }
        }
        summary
    }

    /// Fraction of the run with the load on.
    pub fn uptime_fraction(&self) -> f64 {
        let total = self.minutes_on + self.minutes_off + self.minutes_day_charging;
        if total == 0 {
            return 0.0;
        }
        self.minutes_on as f64 / total as f64
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = |minutes: usize| minutes as f64 / 60.0;
        writeln!(f, "--- Run Summary ---")?;
        writeln!(
            f,
            "Minimum battery: {:.2} Wh ({}%)",
            self.min_energy_wh, self.min_percent
        )?;
        writeln!(f, "Final battery: {:.2} Wh", self.final_energy_wh)?;
        writeln!(
            f,
            "On: {:.1} h ({:.1}%), off: {:.1} h, day charging: {:.1} h",
            hours(self.minutes_on),
            self.uptime_fraction() * 100.0,
            hours(self.minutes_off),
            hours(self.minutes_day_charging)
        )?;
        writeln!(
            f,
            "Solar limited: {:.1} h, battery full: {:.1} h",
            hours(self.minutes_limited),
            hours(self.minutes_full)
        )?;
        write!(f, "Shutdowns: {}", self.shutdowns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::engine::Engine;

    #[test]
    fn minutes_add_up_to_run_length() {
        let run = Engine::new(ScenarioConfig::apogaea().to_simulation_config()).run();
        let summary = RunSummary::from_run(&run);
        assert_eq!(
            summary.minutes_on + summary.minutes_off + summary.minutes_day_charging,
            run.total_minutes
        );
        assert!(summary.min_energy_wh >= 0.0);
        assert!(summary.min_energy_wh <= run.config.capacity_wh);
        assert!((0.0..=1.0).contains(&summary.uptime_fraction()));
    }

    #[test]
    fn noon_sun_is_limited_at_default_cap() {
        let run = Engine::new(ScenarioConfig::apogaea().to_simulation_config()).run();
        let summary = RunSummary::from_run(&run);
        assert!(summary.minutes_limited > 0);
        assert!(summary.minutes_full > 0);
    }

    #[test]
    fn shutdowns_match_on_to_off_transitions() {
        let mut scenario = ScenarioConfig::apogaea();
        scenario.solar.peak_w = 60.0;
        let run = Engine::new(scenario.to_simulation_config()).run();
        let summary = RunSummary::from_run(&run);
        assert!(summary.shutdowns > 0);
        assert!(summary.minutes_off > 0);
    }
}
