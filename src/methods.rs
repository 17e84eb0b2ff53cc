//! Calculation method registry.
//!
//! Each method is an immutable parameter record: twilight angles, the Isha
//! rule (angle or fixed interval), the Asr shadow factor, and the policies
//! used when the sun never reaches a required altitude. Lookup by name is
//! case-insensitive and ignores spaces, `_` and `-`. Unknown names are an
//! error, never a silent default.

use serde::{Deserialize, Serialize};

use crate::error::PrayerError;

/// How Isha is determined. Exactly one rule is active per method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IshaRule {
    /// Sun this many degrees below the horizon after sunset.
    Angle(f64),
    /// Fixed number of minutes after Maghrib.
    Interval(f64),
}

/// Shadow-length convention for Asr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AsrShadowFactor {
    /// Shadow equals object height plus noon shadow (Shafi'i, Maliki, Hanbali).
    Standard,
    /// Shadow equals twice the object height plus noon shadow.
    Hanafi,
}

impl AsrShadowFactor {
    pub fn factor(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Hanafi => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hanafi => "hanafi",
        }
    }
}

/// Fallback for Fajr/Isha when the twilight angle is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLatitudeRule {
    /// Report the unreachable instant as an error.
    None,
    /// Fajr no earlier than half the night before sunrise, Isha no later
    /// than half the night after sunset.
    MidnightFraction,
    /// Night split into sevenths: Fajr in the last, Isha in the first.
    OneSeventh,
    /// Portion of the night proportional to the twilight angle (angle / 60).
    AngleBased,
}

impl HighLatitudeRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MidnightFraction => "midnight_fraction",
            Self::OneSeventh => "one_seventh",
            Self::AngleBased => "angle_based",
        }
    }
}

/// What to do when the sun does not rise or does not set at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarCircleResolution {
    /// Report sunrise/sunset as unreachable.
    Unresolved,
    /// Use the solar position of the nearest date with both a sunrise and a sunset.
    NearestDay,
    /// Move toward the equator until the sun rises and sets.
    NearestLatitude,
}

impl PolarCircleResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::NearestDay => "nearest_day",
            Self::NearestLatitude => "nearest_latitude",
        }
    }
}

/// Fixed minute offsets applied to each computed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrayerAdjustments {
    pub fajr: f64,
    pub sunrise: f64,
    pub dhuhr: f64,
    pub asr: f64,
    /// Minutes after sunset at which Maghrib is called.
    pub maghrib: f64,
    pub isha: f64,
}

impl PrayerAdjustments {
    /// Component-wise sum.
    pub fn combined(&self, other: &PrayerAdjustments) -> PrayerAdjustments {
        PrayerAdjustments {
            fajr: self.fajr + other.fajr,
            sunrise: self.sunrise + other.sunrise,
            dhuhr: self.dhuhr + other.dhuhr,
            asr: self.asr + other.asr,
            maghrib: self.maghrib + other.maghrib,
            isha: self.isha + other.isha,
        }
    }
}

/// Parameters for a calculation convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationParameters {
    pub name: &'static str,
    pub description: &'static str,
    /// Degrees below the horizon at Fajr.
    pub fajr_angle: f64,
    pub isha: IshaRule,
    pub asr_shadow: AsrShadowFactor,
    pub high_latitude_rule: HighLatitudeRule,
    pub polar_circle_resolution: PolarCircleResolution,
    pub adjustments: PrayerAdjustments,
}

impl CalculationParameters {
    fn angles(
        name: &'static str,
        description: &'static str,
        fajr_angle: f64,
        isha: IshaRule,
    ) -> Self {
        Self {
            name,
            description,
            fajr_angle,
            isha,
            asr_shadow: AsrShadowFactor::Standard,
            high_latitude_rule: HighLatitudeRule::MidnightFraction,
            polar_circle_resolution: PolarCircleResolution::NearestDay,
            adjustments: PrayerAdjustments::default(),
        }
    }

    fn with_adjustments(mut self, adjustments: PrayerAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Fully custom parameters, starting from the given angles.
    pub fn custom(fajr_angle: f64, isha: IshaRule) -> Self {
        Self::angles("custom", "Custom angles", fajr_angle, isha)
    }

    pub fn with_asr_shadow(mut self, asr_shadow: AsrShadowFactor) -> Self {
        self.asr_shadow = asr_shadow;
        self
    }

    pub fn with_high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = rule;
        self
    }

    pub fn with_polar_circle_resolution(mut self, resolution: PolarCircleResolution) -> Self {
        self.polar_circle_resolution = resolution;
        self
    }

    /// Add user adjustments on top of the method's own.
    pub fn with_extra_adjustments(mut self, extra: &PrayerAdjustments) -> Self {
        self.adjustments = self.adjustments.combined(extra);
        self
    }
}

/// Identifiers of the built-in conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationMethod {
    MuslimWorldLeague,
    Egyptian,
    Karachi,
    UmmAlQura,
    Dubai,
    MoonsightingCommittee,
    NorthAmerica,
    Kuwait,
    Qatar,
    Singapore,
    Turkey,
    Other,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 12] = [
        Self::MuslimWorldLeague,
        Self::Egyptian,
        Self::Karachi,
        Self::UmmAlQura,
        Self::Dubai,
        Self::MoonsightingCommittee,
        Self::NorthAmerica,
        Self::Kuwait,
        Self::Qatar,
        Self::Singapore,
        Self::Turkey,
        Self::Other,
    ];

    /// Canonical registry key.
    pub fn key(self) -> &'static str {
        match self {
            Self::MuslimWorldLeague => "muslim_world_league",
            Self::Egyptian => "egyptian",
            Self::Karachi => "karachi",
            Self::UmmAlQura => "umm_al_qura",
            Self::Dubai => "dubai",
            Self::MoonsightingCommittee => "moonsighting_committee",
            Self::NorthAmerica => "north_america",
            Self::Kuwait => "kuwait",
            Self::Qatar => "qatar",
            Self::Singapore => "singapore",
            Self::Turkey => "turkey",
            Self::Other => "other",
        }
    }

    pub fn parameters(self) -> CalculationParameters {
        use IshaRule::{Angle, Interval};
        let p = CalculationParameters::angles;
        let dhuhr_plus_one = PrayerAdjustments {
            dhuhr: 1.0,
            ..Default::default()
        };
        let key = self.key();

        match self {
            Self::MuslimWorldLeague => p(key, "Muslim World League", 18.0, Angle(17.0))
                .with_adjustments(dhuhr_plus_one),
            Self::Egyptian => p(key, "Egyptian General Authority of Survey", 19.5, Angle(17.5))
                .with_adjustments(dhuhr_plus_one),
            Self::Karachi => p(key, "University of Islamic Sciences, Karachi", 18.0, Angle(18.0))
                .with_adjustments(dhuhr_plus_one),
            Self::UmmAlQura => p(key, "Umm Al-Qura University, Makkah", 18.5, Interval(90.0)),
            Self::Dubai => p(key, "UAE General Authority of Islamic Affairs", 18.2, Angle(18.2))
                .with_adjustments(PrayerAdjustments {
                    sunrise: -3.0,
                    dhuhr: 3.0,
                    asr: 3.0,
                    maghrib: 3.0,
                    ..Default::default()
                }),
            Self::MoonsightingCommittee => {
                p(key, "Moonsighting Committee Worldwide", 18.0, Angle(18.0))
                    .with_adjustments(PrayerAdjustments {
                        dhuhr: 5.0,
                        maghrib: 3.0,
                        ..Default::default()
                    })
            }
            Self::NorthAmerica => p(key, "Islamic Society of North America", 15.0, Angle(15.0))
                .with_adjustments(dhuhr_plus_one),
            Self::Kuwait => p(key, "Kuwait", 18.0, Angle(17.5)),
            Self::Qatar => p(key, "Qatar", 18.0, Interval(90.0)),
            Self::Singapore => p(key, "Majlis Ugama Islam Singapura", 20.0, Angle(18.0))
                .with_adjustments(dhuhr_plus_one),
            Self::Turkey => p(key, "Diyanet İşleri Başkanlığı, Turkey", 18.0, Angle(17.0))
                .with_adjustments(PrayerAdjustments {
                    sunrise: -7.0,
                    dhuhr: 5.0,
                    asr: 4.0,
                    maghrib: 7.0,
                    ..Default::default()
                }),
            Self::Other => p(key, "Other (custom angles)", 0.0, Angle(0.0)),
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a method by name.
///
/// ```
/// use salatr::methods::{lookup_method, IshaRule};
/// let params = lookup_method("Umm Al-Qura").unwrap();
/// assert_eq!(params.isha, IshaRule::Interval(90.0));
/// assert!(lookup_method("nonexistent").is_err());
/// ```
pub fn lookup_method(name: &str) -> Result<CalculationParameters, PrayerError> {
    let wanted = normalize_name(name);
    let aliases: &[(&str, CalculationMethod)] = &[
        ("mwl", CalculationMethod::MuslimWorldLeague),
        ("isna", CalculationMethod::NorthAmerica),
        ("makkah", CalculationMethod::UmmAlQura),
    ];

    CalculationMethod::ALL
        .iter()
        .copied()
        .find(|method| normalize_name(method.key()) == wanted)
        .or_else(|| {
            aliases
                .iter()
                .find(|(alias, _)| *alias == wanted)
                .map(|(_, method)| *method)
        })
        .map(CalculationMethod::parameters)
        .ok_or_else(|| PrayerError::UnknownCalculationMethod(name.to_string()))
}

/// All built-in methods, in registry order.
pub fn all_methods() -> Vec<CalculationParameters> {
    CalculationMethod::ALL
        .iter()
        .map(|method| method.parameters())
        .collect()
}
