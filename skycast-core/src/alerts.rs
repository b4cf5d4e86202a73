//! Advisory messages derived from a current view.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::{
    model::{NormalizedCurrentView, Unit},
    units::threshold_in,
};

/// Alert urgency, ordered `Medium < High < Extreme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
    Extreme,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ExtremeHeat,
    SevereHeat,
    HeatAdvisory,
    ExtremeCold,
    ColdWarning,
    HighWind,
    WindAdvisory,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::ExtremeHeat => "extreme_heat",
            AlertKind::SevereHeat => "severe_heat",
            AlertKind::HeatAdvisory => "heat_advisory",
            AlertKind::ExtremeCold => "extreme_cold",
            AlertKind::ColdWarning => "cold_warning",
            AlertKind::HighWind => "high_wind",
            AlertKind::WindAdvisory => "wind_advisory",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherAlert {
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    AtLeast(f64),
    AtMost(f64),
}

impl Trigger {
    fn fires(self, value: f64) -> bool {
        match self {
            Trigger::AtLeast(limit) => value >= limit,
            Trigger::AtMost(limit) => value <= limit,
        }
    }
}

struct Rule {
    /// Celsius for temperature rules, km/h for wind rules.
    trigger: Trigger,
    kind: AlertKind,
    severity: Severity,
}

const HEAT_RULES: &[Rule] = &[
    Rule { trigger: Trigger::AtLeast(45.0), kind: AlertKind::ExtremeHeat, severity: Severity::Extreme },
    Rule { trigger: Trigger::AtLeast(40.0), kind: AlertKind::SevereHeat, severity: Severity::High },
    Rule { trigger: Trigger::AtLeast(35.0), kind: AlertKind::HeatAdvisory, severity: Severity::Medium },
];

const COLD_RULES: &[Rule] = &[
    Rule { trigger: Trigger::AtMost(-20.0), kind: AlertKind::ExtremeCold, severity: Severity::High },
    Rule { trigger: Trigger::AtMost(-10.0), kind: AlertKind::ColdWarning, severity: Severity::Medium },
];

const WIND_RULES: &[Rule] = &[
    Rule { trigger: Trigger::AtLeast(60.0), kind: AlertKind::HighWind, severity: Severity::High },
    Rule { trigger: Trigger::AtLeast(40.0), kind: AlertKind::WindAdvisory, severity: Severity::Medium },
];

fn in_unit(trigger: Trigger, unit: Unit) -> Trigger {
    match trigger {
        Trigger::AtLeast(c) => Trigger::AtLeast(threshold_in(c, unit)),
        Trigger::AtMost(c) => Trigger::AtMost(threshold_in(c, unit)),
    }
}

/// First firing rule of a group, if any.
fn first_match(rules: &[Rule], fires: impl Fn(Trigger) -> bool) -> Option<&Rule> {
    rules.iter().find(|rule| fires(rule.trigger))
}

fn message(kind: AlertKind, view: &NormalizedCurrentView) -> String {
    let temp = format!("{}{}", view.temperature, view.symbol);
    let wind = view.wind_speed_kmh;

    match kind {
        AlertKind::ExtremeHeat => format!(
            "EXTREME HEAT DANGER! Temperature is {temp}. This is life-threatening heat. Stay indoors with air conditioning, drink water constantly, and avoid all outdoor activities."
        ),
        AlertKind::SevereHeat => format!(
            "SEVERE HEAT WARNING! Temperature is {temp}. Stay indoors during peak hours (10 AM - 6 PM), drink plenty of water, and wear light-colored clothing if you must go outside."
        ),
        AlertKind::HeatAdvisory => format!(
            "Heat Advisory: Temperature is {temp}. Stay hydrated, limit outdoor activities during midday, and take frequent breaks in shade or air conditioning."
        ),
        AlertKind::ExtremeCold => format!(
            "EXTREME COLD WARNING! Temperature is {temp}. Frostbite can occur in minutes. Dress in layers, cover exposed skin, and limit time outdoors."
        ),
        AlertKind::ColdWarning => format!(
            "Cold Weather Alert: Temperature is {temp}. Dress warmly, watch for icy conditions, and check on elderly neighbors."
        ),
        AlertKind::HighWind => format!(
            "HIGH WIND WARNING! Wind speed is {wind} km/h. Avoid driving high-profile vehicles, secure outdoor objects, and be cautious of falling debris."
        ),
        AlertKind::WindAdvisory => format!(
            "Wind Advisory: Wind speed is {wind} km/h. Be cautious when driving and walking outdoors."
        ),
    }
}

/// Evaluates the heat, cold and wind tables against a view, most severe first.
///
/// Temperature thresholds are expressed in the view's own unit and compared
/// against the displayed (rounded) value.
pub fn evaluate(view: &NormalizedCurrentView) -> Vec<WeatherAlert> {
    let temp = f64::from(view.temperature);
    let wind = f64::from(view.wind_speed_kmh);

    let temperature_fires = |trigger: Trigger| in_unit(trigger, view.unit).fires(temp);

    let mut alerts: Vec<WeatherAlert> = [
        first_match(HEAT_RULES, temperature_fires),
        first_match(COLD_RULES, temperature_fires),
        first_match(WIND_RULES, |trigger| trigger.fires(wind)),
    ]
    .into_iter()
    .flatten()
    .map(|rule| WeatherAlert {
        kind: rule.kind,
        message: message(rule.kind, view),
        severity: rule.severity,
    })
    .collect();

    // Stable, so equal severities keep evaluation order.
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

    debug!(city = %view.city, count = alerts.len(), "evaluated weather alerts");
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(temperature: i32, wind_speed_kmh: u32, unit: Unit) -> NormalizedCurrentView {
        NormalizedCurrentView {
            city: "Testville".into(),
            country: "TV".into(),
            temperature,
            feels_like: temperature,
            description: "clear sky".into(),
            icon: "01d".into(),
            icon_url: String::new(),
            humidity: 40,
            pressure: 1010,
            wind_speed_kmh,
            coordinates: None,
            unit,
            symbol: unit.symbol(),
        }
    }

    fn kinds(alerts: &[WeatherAlert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn extreme_heat_alone() {
        let alerts = evaluate(&view(46, 10, Unit::Celsius));

        assert_eq!(kinds(&alerts), vec![AlertKind::ExtremeHeat]);
        assert_eq!(alerts[0].severity, Severity::Extreme);
        assert!(alerts[0].message.contains("46°C"));
    }

    #[test]
    fn extreme_cold_alone() {
        let alerts = evaluate(&view(-25, 10, Unit::Celsius));

        assert_eq!(kinds(&alerts), vec![AlertKind::ExtremeCold]);
        assert_eq!(alerts[0].severity, Severity::High);
    }

    #[test]
    fn high_wind_alone() {
        let alerts = evaluate(&view(20, 70, Unit::Celsius));

        assert_eq!(kinds(&alerts), vec![AlertKind::HighWind]);
        assert!(alerts[0].message.contains("70 km/h"));
    }

    #[test]
    fn calm_mild_day_has_no_alerts() {
        assert!(evaluate(&view(20, 10, Unit::Celsius)).is_empty());
    }

    #[test]
    fn heat_bands_are_exclusive() {
        assert_eq!(kinds(&evaluate(&view(40, 0, Unit::Celsius))), vec![AlertKind::SevereHeat]);
        assert_eq!(kinds(&evaluate(&view(35, 0, Unit::Celsius))), vec![AlertKind::HeatAdvisory]);
        assert!(evaluate(&view(34, 0, Unit::Celsius)).is_empty());
        assert_eq!(kinds(&evaluate(&view(-10, 0, Unit::Celsius))), vec![AlertKind::ColdWarning]);
        assert!(evaluate(&view(-9, 0, Unit::Celsius)).is_empty());
    }

    #[test]
    fn wind_advisory_threshold() {
        assert_eq!(kinds(&evaluate(&view(20, 40, Unit::Celsius))), vec![AlertKind::WindAdvisory]);
        assert!(evaluate(&view(20, 39, Unit::Celsius)).is_empty());
    }

    #[test]
    fn most_severe_first_then_evaluation_order() {
        let alerts = evaluate(&view(36, 65, Unit::Celsius));
        assert_eq!(kinds(&alerts), vec![AlertKind::HighWind, AlertKind::HeatAdvisory]);

        let alerts = evaluate(&view(41, 65, Unit::Celsius));
        assert_eq!(kinds(&alerts), vec![AlertKind::SevereHeat, AlertKind::HighWind]);

        let alerts = evaluate(&view(47, 45, Unit::Celsius));
        assert_eq!(kinds(&alerts), vec![AlertKind::ExtremeHeat, AlertKind::WindAdvisory]);
    }

    #[test]
    fn fahrenheit_thresholds() {
        assert_eq!(kinds(&evaluate(&view(113, 0, Unit::Fahrenheit))), vec![AlertKind::ExtremeHeat]);
        assert_eq!(kinds(&evaluate(&view(112, 0, Unit::Fahrenheit))), vec![AlertKind::SevereHeat]);
        assert_eq!(kinds(&evaluate(&view(95, 0, Unit::Fahrenheit))), vec![AlertKind::HeatAdvisory]);
        assert!(evaluate(&view(94, 0, Unit::Fahrenheit)).is_empty());
        assert_eq!(kinds(&evaluate(&view(-4, 0, Unit::Fahrenheit))), vec![AlertKind::ExtremeCold]);
        assert_eq!(kinds(&evaluate(&view(14, 0, Unit::Fahrenheit))), vec![AlertKind::ColdWarning]);
        assert!(evaluate(&view(15, 0, Unit::Fahrenheit)).is_empty());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Extreme);
    }
}
