use thiserror::Error;

/// Example queries offered alongside "not a valid city" failures.
pub const CITY_SUGGESTIONS: &[&str] = &[
    "London, UK",
    "New York, USA",
    "Tokyo, Japan",
    "Paris, France",
    "Sydney, Australia",
];

/// A location query that fails basic shape validation, or a city the
/// provider answered for with an implausible name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Please enter a city name")]
    Empty,
    #[error("City name is too short. Please enter at least 2 characters.")]
    TooShort,
    #[error("City name is too long. Please use at most 50 characters.")]
    TooLong,
    #[error(
        "\"{0}\" is not a valid city name. Please enter a real city name like \"London\" or \"New York\"."
    )]
    NumericOnly(String),
    #[error(
        "Please enter a valid city name (letters, spaces, hyphens, and apostrophes only)"
    )]
    InvalidCharacters,
    #[error("City name has too many consecutive spaces or punctuation marks")]
    RepeatedSeparators,
    #[error("\"{0}\" is not a valid city name. Please try a different city name.")]
    UnrecognizedCity(String),
}

/// Provider-side failure, already classified for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Invalid API key. Please check your OpenWeatherMap API key.")]
    Unauthorized,
    #[error("City not found. Please check the city name and try again.")]
    NotFound,
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,
    #[error("Invalid request. Please enter a valid city name.")]
    BadRequest,
    #[error("Network error. Please check your internet connection.")]
    Network(String),
    #[error("Something went wrong. Please try again later.")]
    Generic { status: u16 },
}

impl ProviderError {
    /// Maps a non-success HTTP status to its error class.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ProviderError::BadRequest,
            401 => ProviderError::Unauthorized,
            404 => ProviderError::NotFound,
            429 => ProviderError::RateLimited,
            other => ProviderError::Generic { status: other },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access denied. Please enable location services and try again.")]
    PermissionDenied,
    #[error("Location unavailable. Please try searching for your city instead.")]
    Unavailable,
    #[error("Location request timeout. Please try again.")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Invalid weather data received from provider: {0}")]
    MalformedReport(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl WeatherError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        WeatherError::MalformedReport(detail.into())
    }

    /// Example queries to show next to the message, if any apply.
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            WeatherError::InvalidInput(_) => CITY_SUGGESTIONS,
            _ => &[],
        }
    }
}
