use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Temperature display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(&self) -> Unit {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Unit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Unit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// One provider condition entry (`weather[]` in OpenWeatherMap payloads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    /// Category label, e.g. "Rain" or "Clouds".
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl RawCondition {
    /// Case-insensitive keyword match against category or description.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.main.to_lowercase().contains(keyword)
            || self.description.to_lowercase().contains(keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWind {
    /// Meters per second.
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
}

/// Current-conditions payload. Every block is optional on the wire so that an
/// incomplete report is rejected by the normalizer instead of by serde.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawConditionReport {
    pub name: Option<String>,
    pub sys: Option<RawSys>,
    pub coord: Option<Coordinates>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
    pub dt: Option<i64>,
    /// Shift from UTC in seconds.
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastEntry {
    /// Unix timestamp, seconds.
    pub dt: i64,
    pub main: RawMain,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
    /// Shift from UTC in seconds.
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawForecast {
    pub city: Option<RawCity>,
    #[serde(default)]
    pub list: Vec<RawForecastEntry>,
}

/// A reverse-geocoding candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Display-ready current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCurrentView {
    pub city: String,
    pub country: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed_kmh: u32,
    pub coordinates: Option<Coordinates>,
    pub unit: Unit,
    pub symbol: &'static str,
}

/// Display-ready aggregate of one calendar day of forecast samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDayForecast {
    pub date: NaiveDate,
    pub day_name: String,
    pub short_date: String,
    pub max_temp: i32,
    pub min_temp: i32,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed_kmh: u32,
    pub unit: Unit,
    pub symbol: &'static str,
}
