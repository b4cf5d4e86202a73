use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::Endpoints,
    error::{ProviderError, WeatherError},
    model::{Coordinates, GeoPlace, RawConditionReport, RawForecast},
    query::LocationQuery,
};

use super::WeatherProvider;

const REVERSE_GEOCODE_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoints: Endpoints, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self { api_key, endpoints, http })
    }

    fn location_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        match query {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(at) => {
                vec![("lat", at.lat.to_string()), ("lon", at.lon.to_string())]
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        mut params: Vec<(&'static str, String)>,
        what: &str,
    ) -> Result<T, WeatherError> {
        // Logged before the key is appended.
        debug!(%url, ?params, "requesting OpenWeather {what}");
        params.push(("appid", self.api_key.clone()));

        let res = self.http.get(&url).query(&params).send().await.map_err(|e| {
            warn!(error = %e, "OpenWeather {what} request failed to send");
            ProviderError::Network(e.to_string())
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(error = %e, "failed to read OpenWeather {what} response body");
            ProviderError::Network(e.to_string())
        })?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                "OpenWeather {what} request was rejected"
            );
            return Err(ProviderError::from_status(status.as_u16()).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("OpenWeather {what} JSON: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<RawConditionReport, WeatherError> {
        let mut params = Self::location_params(query);
        params.push(("units", "metric".to_string()));

        self.get_json(join(&self.endpoints.base_url, "weather"), params, "current weather")
            .await
    }

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<RawForecast, WeatherError> {
        let mut params = Self::location_params(query);
        params.push(("units", "metric".to_string()));

        self.get_json(join(&self.endpoints.base_url, "forecast"), params, "5-day forecast")
            .await
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Vec<GeoPlace>, WeatherError> {
        let mut params = Self::location_params(&LocationQuery::Coordinates(at));
        params.push(("limit", REVERSE_GEOCODE_LIMIT.to_string()));

        self.get_json(join(&self.endpoints.geo_url, "reverse"), params, "reverse geocoding")
            .await
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
