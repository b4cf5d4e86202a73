//! Lookup orchestration: query -> provider -> normalizer -> alerts.

use chrono::{FixedOffset, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    alerts::{self, WeatherAlert},
    classify::{ComfortLevel, MoodTag, comfort_level, mood_tag},
    error::{InvalidInput, WeatherError},
    locate::Locator,
    model::{
        Coordinates, GeoPlace, NormalizedCurrentView, NormalizedDayForecast, RawConditionReport,
        RawForecast, Unit,
    },
    normalize::{DEFAULT_ICON_BASE, Normalizer, reconcile},
    provider::WeatherProvider,
    query::{LocationQuery, is_numeric_only},
    storage::{PreferenceStore, RecentSearchEntry},
};

/// Everything the presentation layer needs for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    pub current: NormalizedCurrentView,
    pub forecast: Vec<NormalizedDayForecast>,
    pub alerts: Vec<WeatherAlert>,
    pub comfort: ComfortLevel,
    pub mood: MoodTag,
}

/// Normalizes a current report and its forecast, reconciles the two and
/// derives alerts. Pure; the caller does the fetching.
pub fn build_lookup(
    normalizer: &Normalizer,
    report: &RawConditionReport,
    forecast: &RawForecast,
) -> Result<Lookup, WeatherError> {
    let current = normalizer.current(report)?;
    let days = normalizer.forecast(&forecast.list, forecast_offset(report, forecast))?;
    let current = reconcile(current, &days);

    let unit = normalizer.unit();
    let temperature = f64::from(current.temperature);

    Ok(Lookup {
        alerts: alerts::evaluate(&current),
        comfort: comfort_level(temperature, unit),
        mood: mood_tag(&current.icon, Some(temperature), unit),
        forecast: days,
        current,
    })
}

/// Days are split in the location's own timezone when the provider reports
/// it, otherwise in this machine's.
fn forecast_offset(report: &RawConditionReport, forecast: &RawForecast) -> FixedOffset {
    forecast
        .city
        .as_ref()
        .and_then(|c| c.timezone)
        .or(report.timezone)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| *Local::now().offset())
}

/// Rejects answers whose place name cannot be a city, e.g. "123".
fn check_city_name(report: &RawConditionReport) -> Result<(), InvalidInput> {
    match report.name.as_deref().map(str::trim) {
        Some(name) if name.chars().count() < 2 || is_numeric_only(name) => {
            Err(InvalidInput::UnrecognizedCity(name.to_string()))
        }
        _ => Ok(()),
    }
}

/// Prefers a candidate that names a state, since those are usually cities.
fn best_place(places: &[GeoPlace]) -> Option<&GeoPlace> {
    places.iter().find(|p| p.state.is_some()).or_else(|| places.first())
}

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    store: Box<dyn PreferenceStore>,
    default_unit: Unit,
    session_unit: Option<Unit>,
    icon_base: String,
    last_position: Option<Coordinates>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, store: Box<dyn PreferenceStore>) -> Self {
        Self {
            provider,
            store,
            default_unit: Unit::default(),
            session_unit: None,
            icon_base: DEFAULT_ICON_BASE.to_string(),
            last_position: None,
        }
    }

    /// Unit used while the store has no explicit choice.
    pub fn with_default_unit(mut self, unit: Unit) -> Self {
        self.default_unit = unit;
        self
    }

    pub fn with_icon_base(mut self, icon_base: impl Into<String>) -> Self {
        self.icon_base = icon_base.into();
        self
    }

    pub fn active_unit(&self) -> Unit {
        self.session_unit.or_else(|| self.store.stored_unit()).unwrap_or(self.default_unit)
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn PreferenceStore {
        self.store.as_mut()
    }

    pub fn recent_searches(&self) -> Vec<RecentSearchEntry> {
        self.store.recent_searches()
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.active_unit()).with_icon_base(self.icon_base.clone())
    }

    /// Search submission: validate, fetch, normalize, remember.
    pub async fn search_city(&mut self, input: &str) -> Result<Lookup, WeatherError> {
        let query = LocationQuery::city(input)?;
        let lookup = self.lookup_city(&query).await?;

        self.remember(&lookup);
        Ok(lookup)
    }

    /// Repeats a saved search. Saved names came from the provider, so they
    /// skip the typed-input rules.
    pub async fn search_recent(&mut self, entry: &RecentSearchEntry) -> Result<Lookup, WeatherError> {
        let lookup = self.lookup_city(&LocationQuery::City(entry.city.clone())).await?;

        self.remember(&lookup);
        Ok(lookup)
    }

    /// Location request: detect the city for `at`, look it up by name and
    /// fall back to the raw coordinates if that fails.
    pub async fn search_coordinates(&mut self, at: Coordinates) -> Result<Lookup, WeatherError> {
        let by_coordinates = LocationQuery::Coordinates(at);

        let lookup = match self.detect_city(at).await {
            Some(city) => match self.lookup_city(&LocationQuery::City(city.clone())).await {
                Ok(lookup) => lookup,
                Err(err) => {
                    debug!(%city, error = %err, "city lookup failed, falling back to coordinates");
                    self.lookup(&by_coordinates).await?
                }
            },
            None => self.lookup(&by_coordinates).await?,
        };

        self.last_position = Some(at);
        self.remember(&lookup);
        Ok(lookup)
    }

    pub async fn search_here(&mut self, locator: &dyn Locator) -> Result<Lookup, WeatherError> {
        let at = locator.locate().await?;
        debug!(%at, "device position");
        self.search_coordinates(at).await
    }

    /// Unit toggle. Persists the choice and rebuilds the last display from
    /// fresh provider data; `None` when there is nothing to rebuild.
    pub async fn change_unit(&mut self, unit: Unit) -> Result<Option<Lookup>, WeatherError> {
        self.session_unit = Some(unit);
        if let Err(err) = self.store.set_active_unit(unit) {
            warn!(error = %format!("{err:#}"), "could not persist temperature unit");
        }

        if let Some(last) = self.store.recent_searches().into_iter().next() {
            info!(city = %last.city, %unit, "refreshing last search");
            return self.search_recent(&last).await.map(Some);
        }

        if let Some(at) = self.last_position {
            return self.search_coordinates(at).await.map(Some);
        }

        Ok(None)
    }

    async fn detect_city(&self, at: Coordinates) -> Option<String> {
        let places = match self.provider.reverse_geocode(at).await {
            Ok(places) => places,
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed");
                return None;
            }
        };
        if let Some(place) = best_place(&places) {
            debug!(name = %place.name, state = ?place.state, "detected city");
            return Some(place.name.clone());
        }

        // No candidates: use the name the current report gives these coordinates.
        match self.provider.fetch_current(&LocationQuery::Coordinates(at)).await {
            Ok(report) => {
                let name = report.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
                debug!(name = ?name, "city name from coordinate report");
                name
            }
            Err(err) => {
                debug!(error = %err, "no city name for coordinates");
                None
            }
        }
    }

    async fn lookup_city(&self, query: &LocationQuery) -> Result<Lookup, WeatherError> {
        let report = self.provider.fetch_current(query).await?;
        check_city_name(&report)?;

        let forecast = self.provider.fetch_forecast(query).await?;
        self.finish(query, &report, &forecast)
    }

    async fn lookup(&self, query: &LocationQuery) -> Result<Lookup, WeatherError> {
        let report = self.provider.fetch_current(query).await?;
        let forecast = self.provider.fetch_forecast(query).await?;
        self.finish(query, &report, &forecast)
    }

    fn finish(
        &self,
        query: &LocationQuery,
        report: &RawConditionReport,
        forecast: &RawForecast,
    ) -> Result<Lookup, WeatherError> {
        let lookup = build_lookup(&self.normalizer(), report, forecast)?;

        info!(
            %query,
            city = %lookup.current.city,
            days = lookup.forecast.len(),
            alerts = lookup.alerts.len(),
            "weather lookup complete"
        );
        Ok(lookup)
    }

    fn remember(&mut self, lookup: &Lookup) {
        let current = &lookup.current;
        if let Err(err) = self.store.add_recent_search(&current.city, &current.country) {
            warn!(error = %format!("{err:#}"), "could not save recent search");
        }
    }
}
