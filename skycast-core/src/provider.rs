use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, GeoPlace, RawConditionReport, RawForecast},
    provider::openweather::OpenWeatherProvider,
    query::LocationQuery,
};

pub mod openweather;

/// Network collaborator: one request per call, no retries or caching.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<RawConditionReport, WeatherError>;

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<RawForecast, WeatherError>;

    /// Candidate place names near `at`, best first as the provider ranks them.
    async fn reverse_geocode(&self, at: Coordinates) -> Result<Vec<GeoPlace>, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.endpoints.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        assert!(err.to_string().contains("No OpenWeatherMap API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("0123456789abcdef".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
