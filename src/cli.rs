use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Args as ClapArgs, Parser};

use crate::config::{ConfigError, ScenarioConfig};
use crate::sim::types::parse_time_of_day;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load the scenario from a TOML file.
    #[clap(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Start from a built-in preset (`apogaea`, `burning_man`).
    #[clap(long)]
    pub preset: Option<String>,

    #[clap(flatten)]
    pub overrides: Overrides,

    /// Write the per-minute energy series to a CSV file.
    #[clap(long)]
    pub series_out: Option<PathBuf>,

    /// Write the toggle events to a CSV file.
    #[clap(long)]
    pub events_out: Option<PathBuf>,

    /// Do not print the status lines.
    #[clap(long, short)]
    pub quiet: bool,

    /// Play the run back as an animated terminal chart.
    #[cfg(feature = "tui")]
    #[clap(long)]
    pub tui: bool,

    /// Serve the finished run over HTTP.
    #[cfg(feature = "api")]
    #[clap(long)]
    pub serve: bool,

    #[cfg(feature = "api")]
    #[clap(long, default_value = "3000")]
    pub port: u16,
}

/// Scenario fields that can be overridden from the command line.
#[derive(Debug, Default, ClapArgs)]
pub struct Overrides {
    /// Battery capacity in watt-hours.
    #[clap(long, short = 'b')]
    pub battery_wh: Option<f64>,

    /// Solar peak power in watts.
    #[clap(long, short = 's')]
    pub solar_w: Option<f64>,

    /// Charge controller limit in watts.
    #[clap(long)]
    pub max_charge_w: Option<f64>,

    /// Battery percent at which the project turns off.
    #[clap(long, short = 'm')]
    pub min_battery: Option<f64>,

    /// Battery percent at which the project turns back on.
    #[clap(long, short = 'r')]
    pub resume_battery: Option<f64>,

    /// Project power draw in watts.
    #[clap(long, short = 'w', conflicts_with = "brightness")]
    pub project_w: Option<f64>,

    /// LED brightness percent, converted to a power draw.
    #[clap(long, short = 'p')]
    pub brightness: Option<f64>,

    /// Start day of the week, 0 = Sunday.
    #[clap(long, short = 'd')]
    pub start_day: Option<u32>,

    /// Width of the sunlight curve in hours.
    #[clap(long)]
    pub std_dev: Option<f64>,

    /// Turn the project off to charge at this time, `HH:MM`.
    #[clap(long, value_parser = parse_time_of_day)]
    pub day_charge: Option<NaiveTime>,

    /// Turn the project back on at this time, `HH:MM`.
    #[clap(long, value_parser = parse_time_of_day)]
    pub day_charge_end: Option<NaiveTime>,

    /// Day-charge every day, not only when the battery is low.
    #[clap(long)]
    pub always_day_charge: bool,
}

impl Overrides {
    /// Writes every given override into the scenario.
    pub fn apply(&self, scenario: &mut ScenarioConfig) {
        let bat = &mut scenario.battery;
        if let Some(wh) = self.battery_wh {
            bat.capacity_wh = wh;
        }
        if let Some(w) = self.max_charge_w {
            bat.max_charge_w = Some(w);
        }
        if let Some(pct) = self.min_battery {
            bat.off_pct = pct;
        }
        if let Some(pct) = self.resume_battery {
            bat.resume_pct = pct;
        }

        if let Some(w) = self.solar_w {
            scenario.solar.peak_w = w;
        }
        if let Some(sigma) = self.std_dev {
            scenario.solar.std_dev = sigma;
        }

        // The two load sources replace each other.
        if let Some(w) = self.project_w {
            scenario.load.load_w = Some(w);
            scenario.load.brightness_pct = None;
        }
        if let Some(pct) = self.brightness {
            scenario.load.brightness_pct = Some(pct);
            scenario.load.load_w = None;
        }

        let sch = &mut scenario.schedule;
        if let Some(day) = self.start_day {
            sch.start_day = day;
        }
        if self.day_charge.is_some() {
            sch.day_charge_start = self.day_charge;
        }
        if self.day_charge_end.is_some() {
            sch.day_charge_end = self.day_charge_end;
        }
        if self.always_day_charge {
            sch.always_day_charge = true;
        }
    }
}

impl Args {
    /// Resolves the scenario source and applies the overrides.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file or preset cannot be loaded.
    pub fn load_scenario(&self) -> Result<ScenarioConfig, ConfigError> {
        let mut scenario = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::apogaea(),
        };
        self.overrides.apply(&mut scenario);
        Ok(scenario)
    }
}
