//! Core library for the `skycast` weather CLI.
//!
//! This crate defines:
//! - Rule tables that classify raw provider conditions (dominant condition,
//!   icon, comfort level, background mood)
//! - Normalization of current and 5-day forecast payloads into view models
//! - Weather alert evaluation
//! - Collaborators: the OpenWeatherMap client, the local preference store
//!   and the geolocation source
//! - Configuration & credentials handling
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod alerts;
pub mod classify;
pub mod config;
pub mod error;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod service;
pub mod storage;
pub mod units;

pub use alerts::{AlertKind, Severity, WeatherAlert};
pub use classify::{ComfortLevel, MoodTag};
pub use config::Config;
pub use error::{GeolocationError, InvalidInput, ProviderError, WeatherError};
pub use locate::{FixedLocator, Locator};
pub use model::{Coordinates, NormalizedCurrentView, NormalizedDayForecast, Unit};
pub use normalize::Normalizer;
pub use provider::{WeatherProvider, provider_from_config};
pub use query::LocationQuery;
pub use service::{Lookup, WeatherService, build_lookup};
pub use storage::{FileStore, MemoryStore, PreferenceStore, RecentSearchEntry};
