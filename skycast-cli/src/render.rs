//! Plain-text presentation of lookups, recent searches and failures.

use chrono::{Local, NaiveDate};
use skycast_core::{
    Lookup, NormalizedCurrentView, NormalizedDayForecast, RecentSearchEntry, Severity,
    WeatherAlert, WeatherError,
};

pub fn report(lookup: &Lookup, show_alerts: bool) -> String {
    let mut output = current_block(lookup);
    output.push('\n');
    output.push_str(&forecast_block(&lookup.forecast));

    if show_alerts && !lookup.alerts.is_empty() {
        output.push('\n');
        output.push_str(&alerts_block(&lookup.alerts));
    }
    output
}

fn place(view: &NormalizedCurrentView) -> String {
    if view.country.is_empty() { view.city.clone() } else { format!("{}, {}", view.city, view.country) }
}

fn current_block(lookup: &Lookup) -> String {
    let view = &lookup.current;
    let mut output = format!(
        "{}  ·  {}\n",
        place(view),
        Local::now().format("%A, %B %-d, %Y")
    );

    output.push_str(&format!(
        "  {}{}  {}  (feels like {}{}, {})\n",
        view.temperature, view.symbol, view.description, view.feels_like, view.symbol, lookup.comfort
    ));
    output.push_str(&format!(
        "  Humidity {}%   Wind {} km/h   Pressure {} hPa\n",
        view.humidity, view.wind_speed_kmh, view.pressure
    ));
    output.push_str(&format!("  Mood {}   Icon {}\n", lookup.mood, view.icon_url));
    if let Some(at) = view.coordinates {
        output.push_str(&format!("  At {at}\n"));
    }
    output
}

fn forecast_block(days: &[NormalizedDayForecast]) -> String {
    if days.is_empty() {
        return "No forecast available.\n".to_string();
    }

    let today = Local::now().date_naive();
    let mut output = format!("{}-day forecast\n", days.len());
    for day in days {
        let label = day_label(day, today);
        output.push_str(&format!(
            "  {:<10} {:<7} {:>4} / {:<5} {:<22} wind {:>3} km/h  humidity {:>3}%\n",
            label,
            day.short_date,
            format!("{}{}", day.max_temp, day.symbol),
            format!("{}{}", day.min_temp, day.symbol),
            day.description,
            day.wind_speed_kmh,
            day.humidity
        ));
    }
    output
}

/// Forecast dates are in the location's timezone, so only a date equal to
/// the local one is "Today".
fn day_label(day: &NormalizedDayForecast, today: NaiveDate) -> &str {
    if day.date == today { "Today" } else { day.day_name.as_str() }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Extreme => "EXTREME",
        Severity::High => "HIGH",
        Severity::Medium => "MEDIUM",
    }
}

fn alerts_block(alerts: &[WeatherAlert]) -> String {
    let mut output = String::from("Alerts\n");
    for alert in alerts {
        output.push_str(&format!("  [{}] {}\n", severity_label(alert.severity), alert.message));
    }
    output
}

pub fn recent_list(entries: &[RecentSearchEntry]) -> String {
    if entries.is_empty() {
        return "No recent searches.".to_string();
    }

    let mut output = String::from("Recent searches\n");
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {:<28} {}\n",
            i + 1,
            entry.display_name,
            entry.timestamp.with_timezone(&Local).format("%b %-d %H:%M")
        ));
    }
    output
}

/// One message per failure; invalid-city failures also list example queries.
pub fn weather_error(err: &WeatherError) -> String {
    let mut output = err.to_string();

    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        output.push_str("\nTry searching for:");
        for suggestion in suggestions {
            output.push_str(&format!("\n  - {suggestion}"));
        }
    }
    output
}

pub fn error_report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WeatherError>() {
        Some(weather) => weather_error(weather),
        None => format!("Error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use skycast_core::{
        AlertKind, ComfortLevel, InvalidInput, MoodTag, ProviderError, Unit,
    };

    fn lookup(alerts: Vec<WeatherAlert>) -> Lookup {
        let day = |d: u32, name: &str| NormalizedDayForecast {
            date: NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
            day_name: name.into(),
            short_date: format!("Mar {d}"),
            max_temp: 14,
            min_temp: 8,
            description: "light rain".into(),
            icon: "10d".into(),
            icon_url: "https://icons.test/10d@2x.png".into(),
            humidity: 80,
            pressure: 1012,
            wind_speed_kmh: 12,
            unit: Unit::Celsius,
            symbol: "°C",
        };

        Lookup {
            current: NormalizedCurrentView {
                city: "London".into(),
                country: "GB".into(),
                temperature: 12,
                feels_like: 10,
                description: "light rain".into(),
                icon: "10d".into(),
                icon_url: "https://icons.test/10d@2x.png".into(),
                humidity: 81,
                pressure: 1012,
                wind_speed_kmh: 15,
                coordinates: None,
                unit: Unit::Celsius,
                symbol: "°C",
            },
            forecast: vec![day(1, "Sunday"), day(2, "Monday")],
            alerts,
            comfort: ComfortLevel::Cool,
            mood: MoodTag::Rainy,
        }
    }

    fn wind_alert() -> WeatherAlert {
        WeatherAlert {
            kind: AlertKind::HighWind,
            message: "HIGH WIND WARNING!".into(),
            severity: Severity::High,
        }
    }

    #[test]
    fn report_shows_current_and_forecast() {
        let text = report(&lookup(vec![]), true);

        assert!(text.starts_with("London, GB"));
        assert!(text.contains("12°C  light rain  (feels like 10°C, cool)"));
        assert!(text.contains("Wind 15 km/h"));
        assert!(text.contains("2-day forecast"));
        assert!(text.contains("Mar 2"));
        assert!(!text.contains("Alerts"));
    }

    #[test]
    fn only_the_local_date_is_today() {
        let data = lookup(vec![]);
        let first = &data.forecast[0];

        assert_eq!(day_label(first, first.date), "Today");
        assert_eq!(day_label(first, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()), "Sunday");
        assert_eq!(day_label(&data.forecast[1], first.date), "Monday");
    }

    #[test]
    fn alerts_are_hidden_when_dismissed() {
        let data = lookup(vec![wind_alert()]);

        assert!(report(&data, true).contains("[HIGH] HIGH WIND WARNING!"));
        assert!(!report(&data, false).contains("Alerts"));
    }

    #[test]
    fn invalid_input_lists_suggestions() {
        let text = weather_error(&InvalidInput::NumericOnly("42".into()).into());

        assert!(text.contains("\"42\" is not a valid city name"));
        assert!(text.contains("Try searching for:"));
        assert!(text.contains("  - Tokyo, Japan"));
    }

    #[test]
    fn provider_error_is_a_single_line() {
        let err = anyhow::Error::from(WeatherError::from(ProviderError::RateLimited));

        assert_eq!(error_report(&err), "Too many requests. Please wait a moment and try again.");
    }

    #[test]
    fn other_errors_keep_context() {
        let err = anyhow::anyhow!("disk full").context("Failed to write store file");

        assert_eq!(error_report(&err), "Error: Failed to write store file: disk full");
    }

    #[test]
    fn recent_list_numbers_entries() {
        let entries = vec![
            RecentSearchEntry::new("Paris", "FR", Utc::now()),
            RecentSearchEntry::new("Oslo", "", Utc::now()),
        ];
        let text = recent_list(&entries);

        assert!(text.contains("1. Paris, FR"));
        assert!(text.contains("2. Oslo"));
        assert_eq!(recent_list(&[]), "No recent searches.");
    }
}
