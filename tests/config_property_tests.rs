use proptest::prelude::*;
use salatr::config::{Config, LocationConfig, validate_config};
use salatr::constants::*;
use salatr::methods::{AsrShadowFactor, PrayerAdjustments};

/// A config that passes validation, for tests to perturb one field at a time
fn base_config() -> Config {
    Config {
        method: Some(DEFAULT_METHOD.to_string()),
        asr: Some(AsrShadowFactor::Standard),
        high_latitude_rule: None,
        polar_circle_resolution: None,
        fajr_angle: None,
        isha_angle: None,
        isha_interval: None,
        timezone: None,
        utc_offset_minutes: Some(240),
        adjustments: PrayerAdjustments::default(),
        locations: vec![LocationConfig {
            id: 1,
            name: "Dubai".to_string(),
            latitude: 25.2048,
            longitude: 55.2708,
        }],
    }
}

fn adjustments_with(index: usize, minutes: f64) -> PrayerAdjustments {
    let mut adjustments = PrayerAdjustments::default();
    match index {
        0 => adjustments.fajr = minutes,
        1 => adjustments.sunrise = minutes,
        2 => adjustments.dhuhr = minutes,
        3 => adjustments.asr = minutes,
        4 => adjustments.maghrib = minutes,
        _ => adjustments.isha = minutes,
    }
    adjustments
}

proptest! {
    #[test]
    fn test_offsets_in_range_are_accepted(
        minutes in MINIMUM_UTC_OFFSET_MINUTES..=MAXIMUM_UTC_OFFSET_MINUTES
    ) {
        let config = Config { utc_offset_minutes: Some(minutes), ..base_config() };
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_offsets_out_of_range_are_rejected(
        minutes in prop_oneof![
            -10_000i32..MINIMUM_UTC_OFFSET_MINUTES,
            (MAXIMUM_UTC_OFFSET_MINUTES + 1)..10_000i32,
        ]
    ) {
        let config = Config { utc_offset_minutes: Some(minutes), ..base_config() };
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_adjustment_bounds(
        index in 0usize..6,
        minutes in -120.0f64..120.0
    ) {
        let config = Config { adjustments: adjustments_with(index, minutes), ..base_config() };
        let within = minutes.abs() <= MAXIMUM_ADJUSTMENT_MINUTES;
        prop_assert_eq!(validate_config(&config).is_ok(), within, "{} minutes", minutes);
    }

    #[test]
    fn test_twilight_angle_bounds(
        angle in -10.0f64..45.0,
        isha in prop::bool::ANY
    ) {
        let config = if isha {
            Config { isha_angle: Some(angle), ..base_config() }
        } else {
            Config { fajr_angle: Some(angle), ..base_config() }
        };
        let within = angle > 0.0 && angle <= MAXIMUM_TWILIGHT_ANGLE;
        prop_assert_eq!(validate_config(&config).is_ok(), within, "{} degrees", angle);
    }

    #[test]
    fn test_isha_interval_bounds(minutes in -30.0f64..300.0) {
        let config = Config { isha_interval: Some(minutes), ..base_config() };
        let within = minutes > 0.0 && minutes <= MAXIMUM_ISHA_INTERVAL_MINUTES;
        prop_assert_eq!(validate_config(&config).is_ok(), within, "{} minutes", minutes);
    }

    #[test]
    fn test_location_coordinate_bounds(
        latitude in -100.0f64..100.0,
        longitude in -200.0f64..200.0
    ) {
        let mut config = base_config();
        config.locations[0].latitude = latitude;
        config.locations[0].longitude = longitude;

        let within = (MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude)
            && (MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude);
        prop_assert_eq!(validate_config(&config).is_ok(), within);
    }
}

#[test]
fn test_base_config_is_valid() {
    assert!(validate_config(&base_config()).is_ok());
}

#[test]
fn test_isha_angle_and_interval_are_exclusive() {
    let config = Config {
        isha_angle: Some(17.0),
        isha_interval: Some(90.0),
        ..base_config()
    };
    assert!(validate_config(&config).is_err());
}
