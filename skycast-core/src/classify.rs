//! Rule tables that turn raw provider fields into display categories.
//!
//! Every cascade here is an ordered table evaluated top to bottom; the first
//! matching row wins.

use serde::Serialize;
use std::fmt;

use crate::{
    model::{RawCondition, Unit},
    units::celsius_exact,
};

/// Keywords in descending display priority. Precipitation and hazards come
/// before "clouds" so a co-reported cloud entry never hides them.
pub const CONDITION_PRIORITY: [&str; 14] = [
    "thunderstorm",
    "rain",
    "drizzle",
    "snow",
    "mist",
    "fog",
    "haze",
    "dust",
    "sand",
    "ash",
    "squall",
    "tornado",
    "clouds",
    "clear",
];

/// Picks the entry that best represents a report.
///
/// Returns `None` only for an empty slice.
pub fn dominant_condition(conditions: &[RawCondition]) -> Option<&RawCondition> {
    CONDITION_PRIORITY
        .iter()
        .find_map(|keyword| conditions.iter().find(|c| c.mentions(keyword)))
        .or_else(|| conditions.first())
}

struct IconRule {
    applies: fn(&str) -> bool,
    family: &'static str,
}

fn is_wet(desc: &str) -> bool {
    desc.contains("rain") || desc.contains("drizzle")
}

const ICON_RULES: &[IconRule] = &[
    IconRule { applies: |d| is_wet(d) && d.contains("heavy"), family: "09" },
    IconRule { applies: is_wet, family: "10" },
    IconRule { applies: |d| d.contains("thunderstorm") || d.contains("storm"), family: "11" },
    IconRule { applies: |d| d.contains("snow"), family: "13" },
    IconRule {
        applies: |d| d.contains("mist") || d.contains("fog") || d.contains("haze"),
        family: "50",
    },
];

fn day_night_suffix(icon: &str) -> char {
    if icon.ends_with('n') { 'n' } else { 'd' }
}

/// Corrects the provider icon so it agrees with the description.
pub fn resolve_icon(description: &str, provider_icon: &str) -> String {
    let desc = description.to_lowercase();

    match ICON_RULES.iter().find(|rule| (rule.applies)(&desc)) {
        Some(rule) => format!("{}{}", rule.family, day_night_suffix(provider_icon)),
        None => provider_icon.to_string(),
    }
}

/// The two-digit family of an icon code ("10d" -> "10").
pub fn icon_family(icon: &str) -> &str {
    icon.get(..2).unwrap_or(icon)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComfortLevel {
    Freezing,
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
    VeryHot,
    Extreme,
}

impl ComfortLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComfortLevel::Freezing => "freezing",
            ComfortLevel::Cold => "cold",
            ComfortLevel::Cool => "cool",
            ComfortLevel::Comfortable => "comfortable",
            ComfortLevel::Warm => "warm",
            ComfortLevel::Hot => "hot",
            ComfortLevel::VeryHot => "veryHot",
            ComfortLevel::Extreme => "extreme",
        }
    }
}

impl fmt::Display for ComfortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Inclusive upper bounds. Anything above the last row is `Extreme`.
const CELSIUS_BANDS: [(f64, ComfortLevel); 7] = [
    (0.0, ComfortLevel::Freezing),
    (10.0, ComfortLevel::Cold),
    (18.0, ComfortLevel::Cool),
    (24.0, ComfortLevel::Comfortable),
    (29.0, ComfortLevel::Warm),
    (35.0, ComfortLevel::Hot),
    (40.0, ComfortLevel::VeryHot),
];

const FAHRENHEIT_BANDS: [(f64, ComfortLevel); 7] = [
    (32.0, ComfortLevel::Freezing),
    (50.0, ComfortLevel::Cold),
    (65.0, ComfortLevel::Cool),
    (75.0, ComfortLevel::Comfortable),
    (85.0, ComfortLevel::Warm),
    (95.0, ComfortLevel::Hot),
    (104.0, ComfortLevel::VeryHot),
];

pub fn comfort_level(temperature: f64, unit: Unit) -> ComfortLevel {
    let bands = match unit {
        Unit::Celsius => &CELSIUS_BANDS,
        Unit::Fahrenheit => &FAHRENHEIT_BANDS,
    };

    bands
        .iter()
        .find(|(upper, _)| temperature <= *upper)
        .map(|(_, level)| *level)
        .unwrap_or(ComfortLevel::Extreme)
}

/// Background theme hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoodTag {
    Rainy,
    Scorching,
    Hot,
    Cold,
    Snowy,
    Stormy,
    Cloudy,
    ClearDay,
    ClearNight,
    Default,
}

impl MoodTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTag::Rainy => "rainy",
            MoodTag::Scorching => "scorching",
            MoodTag::Hot => "hot",
            MoodTag::Cold => "cold",
            MoodTag::Snowy => "snowy",
            MoodTag::Stormy => "stormy",
            MoodTag::Cloudy => "cloudy",
            MoodTag::ClearDay => "clear-day",
            MoodTag::ClearNight => "clear-night",
            MoodTag::Default => "default",
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct MoodInput<'a> {
    icon: &'a str,
    family: &'a str,
    celsius: Option<f64>,
}

struct MoodRule {
    applies: fn(&MoodInput<'_>) -> bool,
    tag: MoodTag,
}

fn celsius_at_least(input: &MoodInput<'_>, threshold: f64) -> bool {
    input.celsius.is_some_and(|c| c >= threshold)
}

const MOOD_RULES: &[MoodRule] = &[
    MoodRule {
        applies: |m| {
            matches!(m.family, "09" | "10")
                || m.icon.contains("rain")
                || m.icon.contains("drizzle")
                || m.icon.contains("shower")
        },
        tag: MoodTag::Rainy,
    },
    MoodRule { applies: |m| celsius_at_least(m, 38.0), tag: MoodTag::Scorching },
    MoodRule { applies: |m| celsius_at_least(m, 32.0), tag: MoodTag::Hot },
    MoodRule { applies: |m| m.celsius.is_some_and(|c| c <= 5.0), tag: MoodTag::Cold },
    MoodRule { applies: |m| m.family == "13" || m.icon.contains("snow"), tag: MoodTag::Snowy },
    MoodRule {
        applies: |m| m.family == "11" || m.icon.contains("thunder") || m.icon.contains("storm"),
        tag: MoodTag::Stormy,
    },
    MoodRule {
        applies: |m| matches!(m.family, "02" | "03" | "04") || m.icon.contains("cloud"),
        tag: MoodTag::Cloudy,
    },
    MoodRule { applies: |m| m.icon == "01d", tag: MoodTag::ClearDay },
    MoodRule { applies: |m| m.icon == "01n", tag: MoodTag::ClearNight },
];

/// Derives the background tag from the resolved icon and, when known, the
/// displayed temperature. Rain always wins over temperature.
pub fn mood_tag(icon: &str, temperature: Option<f64>, unit: Unit) -> MoodTag {
    let celsius = temperature.map(|t| match unit {
        Unit::Celsius => t,
        Unit::Fahrenheit => celsius_exact(t),
    });
    let input = MoodInput { icon, family: icon_family(icon), celsius };

    MOOD_RULES
        .iter()
        .find(|rule| (rule.applies)(&input))
        .map(|rule| rule.tag)
        .unwrap_or(MoodTag::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(main: &str, description: &str, icon: &str) -> RawCondition {
        RawCondition { main: main.into(), description: description.into(), icon: icon.into() }
    }

    #[test]
    fn rain_beats_clouds_in_either_order() {
        let rain = cond("Rain", "light rain", "10d");
        let clouds = cond("Clouds", "overcast clouds", "04d");

        let forward = vec![clouds.clone(), rain.clone()];
        let backward = vec![rain.clone(), clouds.clone()];

        assert_eq!(dominant_condition(&forward), Some(&rain));
        assert_eq!(dominant_condition(&backward), Some(&rain));
    }

    #[test]
    fn thunderstorm_outranks_rain() {
        let list = vec![
            cond("Rain", "moderate rain", "10n"),
            cond("Thunderstorm", "thunderstorm", "11n"),
        ];

        assert_eq!(dominant_condition(&list).unwrap().main, "Thunderstorm");
    }

    #[test]
    fn unknown_categories_fall_back_to_first_entry() {
        let list = vec![cond("Smoke", "smoke", "50d"), cond("Other", "other", "50d")];

        assert_eq!(dominant_condition(&list).unwrap().main, "Smoke");
        assert!(dominant_condition(&[]).is_none());
    }

    #[test]
    fn light_rain_keeps_family_and_suffix() {
        assert_eq!(resolve_icon("light rain", "10d"), "10d");
        assert_eq!(resolve_icon("moderate rain", "04n"), "10n");
    }

    #[test]
    fn heavy_rain_maps_to_shower_family() {
        assert_eq!(resolve_icon("heavy rain", "04n"), "09n");
        assert_eq!(resolve_icon("Heavy intensity drizzle", "03d"), "09d");
    }

    #[test]
    fn other_icon_families() {
        assert_eq!(resolve_icon("thunderstorm", "04d"), "11d");
        assert_eq!(resolve_icon("light snow", "04n"), "13n");
        assert_eq!(resolve_icon("haze", "01d"), "50d");
        assert_eq!(resolve_icon("broken clouds", "04d"), "04d");
    }

    #[test]
    fn comfort_bands_celsius() {
        assert_eq!(comfort_level(-5.0, Unit::Celsius), ComfortLevel::Freezing);
        assert_eq!(comfort_level(0.0, Unit::Celsius), ComfortLevel::Freezing);
        assert_eq!(comfort_level(0.1, Unit::Celsius), ComfortLevel::Cold);
        assert_eq!(comfort_level(18.0, Unit::Celsius), ComfortLevel::Cool);
        assert_eq!(comfort_level(21.0, Unit::Celsius), ComfortLevel::Comfortable);
        assert_eq!(comfort_level(29.0, Unit::Celsius), ComfortLevel::Warm);
        assert_eq!(comfort_level(35.0, Unit::Celsius), ComfortLevel::Hot);
        assert_eq!(comfort_level(40.0, Unit::Celsius), ComfortLevel::VeryHot);
        assert_eq!(comfort_level(40.5, Unit::Celsius), ComfortLevel::Extreme);
    }

    #[test]
    fn comfort_bands_fahrenheit() {
        assert_eq!(comfort_level(32.0, Unit::Fahrenheit), ComfortLevel::Freezing);
        assert_eq!(comfort_level(33.0, Unit::Fahrenheit), ComfortLevel::Cold);
        assert_eq!(comfort_level(70.0, Unit::Fahrenheit), ComfortLevel::Comfortable);
        assert_eq!(comfort_level(104.0, Unit::Fahrenheit), ComfortLevel::VeryHot);
        assert_eq!(comfort_level(105.0, Unit::Fahrenheit), ComfortLevel::Extreme);
    }

    #[test]
    fn comfort_bands_are_monotonic() {
        let mut previous = ComfortLevel::Freezing as u8;
        for tenth in -200..=600 {
            let level = comfort_level(tenth as f64 / 10.0, Unit::Celsius) as u8;
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, ComfortLevel::Extreme as u8);
    }

    #[test]
    fn rain_wins_over_heat() {
        assert_eq!(mood_tag("10d", Some(41.0), Unit::Celsius), MoodTag::Rainy);
        assert_eq!(mood_tag("09n", Some(-3.0), Unit::Celsius), MoodTag::Rainy);
    }

    #[test]
    fn temperature_bands_before_icon_families() {
        assert_eq!(mood_tag("01d", Some(39.0), Unit::Celsius), MoodTag::Scorching);
        assert_eq!(mood_tag("01d", Some(33.0), Unit::Celsius), MoodTag::Hot);
        assert_eq!(mood_tag("13d", Some(2.0), Unit::Celsius), MoodTag::Cold);
        // 90 F is 32.2 C
        assert_eq!(mood_tag("04d", Some(90.0), Unit::Fahrenheit), MoodTag::Hot);
    }

    #[test]
    fn icon_family_fallbacks() {
        assert_eq!(mood_tag("13d", None, Unit::Celsius), MoodTag::Snowy);
        assert_eq!(mood_tag("11n", Some(20.0), Unit::Celsius), MoodTag::Stormy);
        assert_eq!(mood_tag("03d", Some(20.0), Unit::Celsius), MoodTag::Cloudy);
        assert_eq!(mood_tag("01d", Some(20.0), Unit::Celsius), MoodTag::ClearDay);
        assert_eq!(mood_tag("01n", Some(68.0), Unit::Fahrenheit), MoodTag::ClearNight);
        assert_eq!(mood_tag("50d", Some(20.0), Unit::Celsius), MoodTag::Default);
    }
}
