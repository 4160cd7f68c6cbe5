//! Sunlight model: normalized solar irradiance by time of day.

/// Hour the curve peaks at.
pub const SOLAR_NOON_HOUR: f64 = 12.0;

/// Fraction below which the panels produce nothing (photovoltaic cut-in).
pub const CUT_IN_FRACTION: f64 = 0.05;

/// Default curve width, tuned to summer sun hours in southern Colorado.
pub const DEFAULT_STD_DEV: f64 = 2.3;

/// Peak summer sun hours per day for the installation site.
pub const MAX_SUN_HOURS: f64 = 5.72;

/// Returns the fraction of peak solar output at `hour:minute`.
///
/// A Gaussian centred on solar noon, scaled so noon is exactly `1.0`.
/// Values below [`CUT_IN_FRACTION`] are returned as `0.0`.
///
/// # Examples
///
/// ```
/// use power_sim::sim::sunlight::sunlight_fraction;
///
/// assert_eq!(sunlight_fraction(12, 0, 2.3), 1.0);
/// assert_eq!(sunlight_fraction(3, 0, 2.3), 0.0);
/// ```
pub fn sunlight_fraction(hour: u32, minute: u32, std_dev: f64) -> f64 {
    let t = f64::from(hour) + f64::from(minute) / 60.0;
    let z = (t - SOLAR_NOON_HOUR) / std_dev;
    // Density at t over density at the mean; the normalizing constant cancels.
    let fraction = (-0.5 * z * z).exp();
    if fraction < CUT_IN_FRACTION {
        0.0
    } else {
        fraction
    }
}

/// Equivalent full-sun hours per day, sampled on the hour.
pub fn sun_hours(std_dev: f64) -> f64 {
    (0..24).map(|hour| sunlight_fraction(hour, 0, std_dev)).sum()
}

/// Returns `true` when `std_dev` yields more sun than the site gets.
pub fn sun_hours_exceed_max(std_dev: f64) -> bool {
    sun_hours(std_dev) > MAX_SUN_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noon_is_exactly_one() {
        for std_dev in [0.5, 1.0, DEFAULT_STD_DEV, 4.0, 10.0] {
            assert_eq!(sunlight_fraction(12, 0, std_dev), 1.0);
        }
    }

    #[test]
    fn symmetric_around_noon() {
        for k in 0..=11 {
            assert_eq!(
                sunlight_fraction(12 - k, 0, DEFAULT_STD_DEV),
                sunlight_fraction(12 + k, 0, DEFAULT_STD_DEV),
                "asymmetric at ±{k}h"
            );
        }
    }

    #[test]
    fn decays_away_from_noon() {
        let mut previous = sunlight_fraction(12, 0, DEFAULT_STD_DEV);
        for minute_of_day in (12 * 60 + 1)..(24 * 60) {
            let value = sunlight_fraction(minute_of_day / 60, minute_of_day % 60, DEFAULT_STD_DEV);
            assert!(value <= previous);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn morning_matches_site_expectations() {
        assert!(sunlight_fraction(5, 0, DEFAULT_STD_DEV) < 0.01);
        assert!(sunlight_fraction(7, 0, DEFAULT_STD_DEV) < 0.2);
        assert!(sunlight_fraction(7, 0, DEFAULT_STD_DEV) > 0.0);
    }

    #[test]
    fn cut_in_clamps_to_zero() {
        assert_eq!(sunlight_fraction(0, 0, DEFAULT_STD_DEV), 0.0);
        assert_eq!(sunlight_fraction(23, 59, DEFAULT_STD_DEV), 0.0);
    }

    #[test]
    fn default_width_stays_under_site_sun_hours() {
        let hours = sun_hours(DEFAULT_STD_DEV);
        assert!(hours <= MAX_SUN_HOURS, "got {hours}");
        assert!(hours > 5.0);
        assert!(!sun_hours_exceed_max(DEFAULT_STD_DEV));
    }

    #[test]
    fn wide_curve_exceeds_site_sun_hours() {
        assert!(sun_hours_exceed_max(4.0));
    }
}
