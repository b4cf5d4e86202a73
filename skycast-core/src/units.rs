//! Temperature and wind-speed conversion.
//!
//! All displayed values are whole numbers. Rounding is half-up (towards
//! positive infinity on ties), so `-2.5` becomes `-2`.

use crate::model::Unit;

const MPS_TO_KMH: f64 = 3.6;

pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Unrounded Celsius to Fahrenheit.
pub fn fahrenheit_exact(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Unrounded Fahrenheit to Celsius.
pub fn celsius_exact(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn to_fahrenheit(celsius: f64) -> i32 {
    round_half_up(fahrenheit_exact(celsius)) as i32
}

pub fn to_celsius(fahrenheit: f64) -> i32 {
    round_half_up(celsius_exact(fahrenheit)) as i32
}

/// Converts a raw provider temperature (always Celsius) into the display unit.
pub fn display_temperature(celsius: f64, unit: Unit) -> i32 {
    match unit {
        Unit::Celsius => round_half_up(celsius) as i32,
        Unit::Fahrenheit => to_fahrenheit(celsius),
    }
}

/// Meters per second to whole kilometers per hour.
pub fn mps_to_kmh(speed: f64) -> u32 {
    round_half_up(speed * MPS_TO_KMH).max(0.0) as u32
}

/// Expresses a Celsius threshold in `unit` without rounding.
pub fn threshold_in(celsius: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => fahrenheit_exact(celsius),
    }
}
