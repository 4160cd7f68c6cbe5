use std::fmt;

use crate::config::ScenarioConfig;
use crate::sim::clock::weekday_of;
use crate::sim::run::SimulationRun;
use crate::sim::summary::RunSummary;
use crate::sim::sunlight::{MAX_SUN_HOURS, sun_hours};
use crate::sim::types::TIME_FORMAT;

/// The parameter banner printed before a run.
pub struct Banner<'a> {
    scenario: &'a ScenarioConfig,
}

impl<'a> Banner<'a> {
    pub fn new(scenario: &'a ScenarioConfig) -> Self {
        Self { scenario }
    }
}

impl fmt::Display for Banner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.scenario;
        let sim = s.to_simulation_config();
        writeln!(
            f,
            "simulated sun hours: {:.2} (max is {MAX_SUN_HOURS})",
            sun_hours(sim.std_dev)
        )?;
        writeln!(f, "Running simulation with:")?;
        writeln!(f, "- Battery capacity: {} Wh", sim.capacity_wh)?;
        writeln!(
            f,
            "- Off battery: {:.0}% / {:.2} Wh",
            s.battery.off_pct, sim.off_wh
        )?;
        writeln!(
            f,
            "- Resume battery: {:.0}% / {:.2} Wh",
            s.battery.resume_pct, sim.resume_wh
        )?;
        if let Some(window) = sim.day_charge {
            let until = window.end.map_or_else(
                || "18:00".to_string(),
                |end| end.format(TIME_FORMAT).to_string(),
            );
            let condition = if window.always {
                "every day"
            } else {
                "when below the resume battery level"
            };
            writeln!(
                f,
                "- Charging during the day from {} until {until}, {condition}",
                window.start.format(TIME_FORMAT)
            )?;
        }
        writeln!(f, "- Solar power: {} W", sim.solar_w)?;
        if let Some(max_w) = sim.max_charge_w {
            writeln!(f, "- Max charge rate: {max_w} W")?;
        }
        writeln!(f, "- Solar power std dev: {:.2}", sim.std_dev)?;
        writeln!(
            f,
            "- Project power: {:.0}% brightness / {:.2} W",
            s.load.effective_brightness(),
            sim.load_w
        )?;
        write!(f, "- Start day: {}", weekday_of(sim.start_day))
    }
}

pub fn print_banner(scenario: &ScenarioConfig) {
    println!("{}", Banner::new(scenario));
}

pub fn print_status_lines(run: &SimulationRun) {
    for line in &run.status_lines {
        println!("{line}");
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{summary}");
}
