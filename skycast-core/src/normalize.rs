use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::{
    classify::{dominant_condition, resolve_icon},
    error::WeatherError,
    model::{
        NormalizedCurrentView, NormalizedDayForecast, RawCondition, RawConditionReport,
        RawForecastEntry, Unit,
    },
    units::{display_temperature, mps_to_kmh, round_half_up},
};

pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org/img/wn/";

/// Days of forecast kept after grouping.
pub const FORECAST_DAYS: usize = 5;

/// Builds view models from raw provider records for one display unit.
#[derive(Debug, Clone)]
pub struct Normalizer {
    unit: Unit,
    icon_base: String,
}

impl Normalizer {
    pub fn new(unit: Unit) -> Self {
        Self { unit, icon_base: DEFAULT_ICON_BASE.to_string() }
    }

    pub fn with_icon_base(mut self, icon_base: impl Into<String>) -> Self {
        self.icon_base = icon_base.into();
        self
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn icon_url(&self, icon: &str) -> String {
        format!("{}{}@2x.png", self.icon_base, icon)
    }

    pub fn current(&self, report: &RawConditionReport) -> Result<NormalizedCurrentView, WeatherError> {
        let city = report
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| WeatherError::malformed("report has no location name"))?;
        let main = report
            .main
            .as_ref()
            .ok_or_else(|| WeatherError::malformed("report has no main measurements"))?;
        let selected = dominant_condition(&report.weather)
            .ok_or_else(|| WeatherError::malformed("report has no weather conditions"))?;

        let icon = resolve_icon(&selected.description, &selected.icon);
        debug!(
            city,
            condition = %selected.description,
            provider_icon = %selected.icon,
            icon = %icon,
            "selected dominant condition"
        );

        Ok(NormalizedCurrentView {
            city: city.to_string(),
            country: report.sys.as_ref().and_then(|s| s.country.clone()).unwrap_or_default(),
            temperature: display_temperature(main.temp, self.unit),
            feels_like: display_temperature(main.feels_like, self.unit),
            description: selected.description.clone(),
            icon_url: self.icon_url(&icon),
            icon,
            humidity: main.humidity,
            pressure: round_half_up(main.pressure).max(0.0) as u32,
            wind_speed_kmh: mps_to_kmh(report.wind.as_ref().map_or(0.0, |w| w.speed)),
            coordinates: report.coord,
            unit: self.unit,
            symbol: self.unit.symbol(),
        })
    }

    /// Groups samples by calendar day in `offset` and keeps the first
    /// [`FORECAST_DAYS`] days in order of first appearance.
    pub fn forecast(
        &self,
        entries: &[RawForecastEntry],
        offset: FixedOffset,
    ) -> Result<Vec<NormalizedDayForecast>, WeatherError> {
        let mut days: Vec<DayBucket<'_>> = Vec::new();

        for entry in entries {
            let condition = entry.weather.first().ok_or_else(|| {
                WeatherError::malformed(format!("forecast sample at {} has no condition", entry.dt))
            })?;
            let date = DateTime::from_timestamp(entry.dt, 0)
                .ok_or_else(|| {
                    WeatherError::malformed(format!("forecast timestamp {} is out of range", entry.dt))
                })?
                .with_timezone(&offset)
                .date_naive();

            match days.iter_mut().find(|day| day.date == date) {
                Some(day) => day.samples.push((entry, condition)),
                None => days.push(DayBucket { date, samples: vec![(entry, condition)] }),
            }
        }

        debug!(samples = entries.len(), days = days.len(), "grouped forecast samples");

        Ok(days.iter().take(FORECAST_DAYS).map(|day| self.summarize(day)).collect())
    }

    fn summarize(&self, day: &DayBucket<'_>) -> NormalizedDayForecast {
        let temps = day.samples.iter().map(|(e, _)| e.main.temp);
        let max = temps.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = temps.fold(f64::INFINITY, f64::min);

        let humidity = mean(day.samples.iter().map(|(e, _)| f64::from(e.main.humidity)));
        let pressure = mean(day.samples.iter().map(|(e, _)| e.main.pressure));
        let wind = mean(day.samples.iter().map(|(e, _)| e.wind.as_ref().map_or(0.0, |w| w.speed)));

        let description =
            most_frequent(day.samples.iter().map(|(_, c)| c.description.as_str())).unwrap_or_default();
        let icon = most_frequent(day.samples.iter().map(|(_, c)| c.icon.as_str())).unwrap_or_default();

        NormalizedDayForecast {
            date: day.date,
            day_name: day.date.format("%A").to_string(),
            short_date: day.date.format("%b %-d").to_string(),
            max_temp: display_temperature(max, self.unit),
            min_temp: display_temperature(min, self.unit),
            description: description.to_string(),
            icon_url: self.icon_url(icon),
            icon: icon.to_string(),
            humidity: round_half_up(humidity).clamp(0.0, 100.0) as u8,
            pressure: round_half_up(pressure).max(0.0) as u32,
            wind_speed_kmh: mps_to_kmh(wind),
            unit: self.unit,
            symbol: self.unit.symbol(),
        }
    }
}

/// Makes the "now" card agree with the "today" card: description and icon
/// come from the first forecast day when there is one.
pub fn reconcile(
    mut current: NormalizedCurrentView,
    forecast: &[NormalizedDayForecast],
) -> NormalizedCurrentView {
    if let Some(today) = forecast.first() {
        current.description = today.description.clone();
        current.icon = today.icon.clone();
        current.icon_url = today.icon_url.clone();
    }
    current
}

struct DayBucket<'a> {
    date: NaiveDate,
    samples: Vec<(&'a RawForecastEntry, &'a RawCondition)>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Most common value; ties go to the value seen first.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}
