//! TOML-based scenario configuration, presets, and validation.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

use crate::sim::sunlight::{DEFAULT_STD_DEV, MAX_SUN_HOURS, sun_hours, sun_hours_exceed_max};
use crate::sim::types::{DayCharge, SimulationConfig, TIME_FORMAT, hhmm};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `apogaea` preset. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or start from a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Battery capacity and thresholds.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Solar panel parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Load power parameters.
    #[serde(default)]
    pub load: LoadConfig,
    /// Start day and day-charge window.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Battery capacity and on/off thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable capacity (Wh).
    pub capacity_wh: f64,
    /// Percent of capacity below which the load shuts off.
    pub off_pct: f64,
    /// Percent of capacity above which the load resumes.
    pub resume_pct: f64,
    /// Charge controller absorption limit (W).
    pub max_charge_w: Option<f64>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_wh: 1280.0,
            off_pct: 25.0,
            resume_pct: 40.0,
            max_charge_w: Some(138.0),
        }
    }
}

/// Solar panel parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Output at solar noon (W), after latitude derating.
    pub peak_w: f64,
    /// Width of the sunlight curve (hours).
    pub std_dev: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            peak_w: 270.0,
            std_dev: DEFAULT_STD_DEV,
        }
    }
}

/// Load power, either explicit or derived from LED brightness.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Explicit load draw (W). Mutually exclusive with `brightness_pct`.
    pub load_w: Option<f64>,
    /// LED brightness (percent); 100 when neither field is set.
    pub brightness_pct: Option<f64>,
    /// Monitoring circuitry draw, always present (W).
    pub idle_w: f64,
    /// Measured draw at 100% brightness (W).
    pub full_brightness_w: f64,
    /// Draw with the LEDs lit at 0% brightness (W).
    pub zero_brightness_w: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            load_w: None,
            brightness_pct: None,
            idle_w: 1.0,
            full_brightness_w: 115.2,
            zero_brightness_w: 75.0,
        }
    }
}

impl LoadConfig {
    /// Brightness in effect, defaulting to 100%.
    pub fn brightness(&self) -> f64 {
        self.brightness_pct.unwrap_or(100.0)
    }

    /// Load draw while on (W).
    pub fn power_w(&self) -> f64 {
        self.load_w.unwrap_or_else(|| {
            (self.full_brightness_w - self.zero_brightness_w) * self.brightness() / 100.0
                + self.zero_brightness_w
        })
    }

    /// Brightness equivalent of [`Self::power_w`], for reporting.
    pub fn effective_brightness(&self) -> f64 {
        let span = self.full_brightness_w - self.zero_brightness_w;
        if span <= 0.0 {
            return self.brightness();
        }
        (self.power_w() - self.zero_brightness_w) / span * 100.0
    }
}

/// Start day and optional day-charge window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Weekday the run starts on, 0 = Sunday.
    pub start_day: u32,
    /// Time the load is switched off to charge, `HH:MM`.
    #[serde(with = "hhmm::option")]
    pub day_charge_start: Option<NaiveTime>,
    /// Time the load is switched back on, `HH:MM`.
    #[serde(with = "hhmm::option")]
    pub day_charge_end: Option<NaiveTime>,
    /// Day-charge every day regardless of battery level.
    pub always_day_charge: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_day: 3,
            day_charge_start: None,
            day_charge_end: None,
            always_day_charge: false,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.off_pct"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// A plausibility problem that does not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// Explicit load below the draw of the LEDs at zero brightness.
    LoadBelowIdle { load_w: f64, zero_brightness_w: f64 },
    /// The sunlight curve is wider than the site's sun hours allow.
    TooManySunHours { sun_hours: f64 },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadBelowIdle {
                load_w,
                zero_brightness_w,
            } => write!(
                f,
                "load {load_w:.2} W is unrealistically below idle {zero_brightness_w:.2} W"
            ),
            Self::TooManySunHours { sun_hours } => write!(
                f,
                "std-dev gives unrealistically high solar hours: {sun_hours:.2} (max {MAX_SUN_HOURS})"
            ),
        }
    }
}

impl ScenarioConfig {
    /// Returns the Apogaea preset: Wednesday start, full brightness.
    pub fn apogaea() -> Self {
        Self {
            battery: BatteryConfig::default(),
            solar: SolarConfig::default(),
            load: LoadConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }

    /// Returns the Burning Man preset: Sunday start with a morning day charge.
    pub fn burning_man() -> Self {
        Self {
            schedule: ScheduleConfig {
                start_day: 0,
                day_charge_start: NaiveTime::from_hms_opt(9, 0, 0),
                ..ScheduleConfig::default()
            },
            ..Self::apogaea()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["apogaea", "burning_man"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "apogaea" => Ok(Self::apogaea()),
            "burning_man" => Ok(Self::burning_man()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let bat = &self.battery;
        let sol = &self.solar;
        let load = &self.load;
        // NaN slips through every comparison below.
        let numbers = [
            ("battery.capacity_wh", Some(bat.capacity_wh)),
            ("battery.off_pct", Some(bat.off_pct)),
            ("battery.resume_pct", Some(bat.resume_pct)),
            ("battery.max_charge_w", bat.max_charge_w),
            ("solar.peak_w", Some(sol.peak_w)),
            ("solar.std_dev", Some(sol.std_dev)),
            ("load.load_w", load.load_w),
            ("load.brightness_pct", load.brightness_pct),
            ("load.idle_w", Some(load.idle_w)),
            ("load.full_brightness_w", Some(load.full_brightness_w)),
            ("load.zero_brightness_w", Some(load.zero_brightness_w)),
        ];
        for (field, value) in numbers {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                errors.push(ConfigError::new(
                    field,
                    format!("must be a finite number, got {value}"),
                ));
            }
        }

        if bat.capacity_wh <= 0.0 {
            errors.push(ConfigError::new("battery.capacity_wh", "must be > 0"));
        }
        for (field, pct) in [
            ("battery.off_pct", bat.off_pct),
            ("battery.resume_pct", bat.resume_pct),
        ] {
            if !(pct > 1.0 && pct < 100.0) {
                errors.push(ConfigError::new(
                    field,
                    format!("bad battery percentage {pct}, should be 1 < % < 100"),
                ));
            }
        }
        if bat.off_pct >= bat.resume_pct {
            errors.push(ConfigError::new(
                "battery.off_pct",
                format!(
                    "must be < battery.resume_pct ({} >= {})",
                    bat.off_pct, bat.resume_pct
                ),
            ));
        }
        if bat.max_charge_w.is_some_and(|w| w <= 0.0) {
            errors.push(ConfigError::new("battery.max_charge_w", "must be > 0"));
        }

        if sol.peak_w < 0.0 {
            errors.push(ConfigError::new("solar.peak_w", "must be >= 0"));
        }
        if sol.std_dev <= 0.0 {
            errors.push(ConfigError::new("solar.std_dev", "must be > 0"));
        }

        if load.load_w.is_some() && load.brightness_pct.is_some() {
            errors.push(ConfigError::new(
                "load.load_w",
                "can only specify one of load_w and brightness_pct",
            ));
        }
        if load.load_w.is_some_and(|w| w < 0.0) {
            errors.push(ConfigError::new("load.load_w", "must be >= 0"));
        }
        // Catches 0.5 entered instead of 50.
        if load.brightness() < 2.0 {
            errors.push(ConfigError::new(
                "load.brightness_pct",
                format!("brightness too low: {}", load.brightness()),
            ));
        }
        if load.idle_w < 0.0 {
            errors.push(ConfigError::new("load.idle_w", "must be >= 0"));
        }

        let sch = &self.schedule;
        if sch.start_day > 6 {
            errors.push(ConfigError::new(
                "schedule.start_day",
                format!("must be in 0..=6 (0 = Sunday), got {}", sch.start_day),
            ));
        }
        if let Some(start) = sch.day_charge_start {
            if !(6..=15).contains(&start.hour()) {
                errors.push(ConfigError::new(
                    "schedule.day_charge_start",
                    format!(
                        "day charge is {} but should be between 06:00 and 16:00",
                        start.format(TIME_FORMAT)
                    ),
                ));
            }
            if let Some(end) = sch.day_charge_end {
                if start >= end {
                    errors.push(ConfigError::new(
                        "schedule.day_charge_start",
                        format!(
                            "must be before schedule.day_charge_end ({} >= {})",
                            start.format(TIME_FORMAT),
                            end.format(TIME_FORMAT)
                        ),
                    ));
                }
            }
        } else if sch.day_charge_end.is_some() {
            errors.push(ConfigError::new(
                "schedule.day_charge_end",
                "requires schedule.day_charge_start",
            ));
        }
        if sch.always_day_charge && sch.day_charge_end.is_none() {
            errors.push(ConfigError::new(
                "schedule.always_day_charge",
                "requires schedule.day_charge_end",
            ));
        }

        errors
    }

    /// Non-fatal plausibility warnings.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if let Some(load_w) = self.load.load_w {
            if load_w < self.load.zero_brightness_w {
                warnings.push(ConfigWarning::LoadBelowIdle {
                    load_w,
                    zero_brightness_w: self.load.zero_brightness_w,
                });
            }
        }
        if self.solar.std_dev > 0.0 && sun_hours_exceed_max(self.solar.std_dev) {
            warnings.push(ConfigWarning::TooManySunHours {
                sun_hours: sun_hours(self.solar.std_dev),
            });
        }
        warnings
    }

    /// Converts percentages and load settings into the engine's parameters.
    ///
    /// Call [`Self::validate`] first; invalid input produces a config the
    /// engine's invariants do not hold for.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let capacity = self.battery.capacity_wh;
        let sch = &self.schedule;
        SimulationConfig {
            solar_w: self.solar.peak_w,
            max_charge_w: self.battery.max_charge_w,
            capacity_wh: capacity,
            off_wh: capacity * self.battery.off_pct / 100.0,
            resume_wh: capacity * self.battery.resume_pct / 100.0,
            load_w: self.load.power_w(),
            idle_w: self.load.idle_w,
            std_dev: self.solar.std_dev,
            start_day: sch.start_day,
            day_charge: sch.day_charge_start.map(|start| DayCharge {
                start,
                end: sch.day_charge_end,
                always: sch.always_day_charge,
            }),
        }
    }
}
