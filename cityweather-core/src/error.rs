use thiserror::Error;

/// Cities suggested to the user when a lookup does not resolve.
pub const EXAMPLE_CITIES: &[&str] = &["New York", "London", "Tokyo", "Paris", "Sydney"];

/// Classified failure of a weather query. Every variant is recoverable by
/// retrying, possibly with a different city.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The current-conditions lookup returned a non-success status.
    #[error("City not found. Try: {}", EXAMPLE_CITIES.join(", "))]
    CityNotFound { city: String },

    /// No response arrived; carries the transport's own message.
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but its body is not what the upstream documents.
    #[error("Unexpected response from weather service: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn is_city_not_found(&self) -> bool {
        matches!(self, WeatherError::CityNotFound { .. })
    }
}
