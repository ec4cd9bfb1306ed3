use crate::{
    CityQuery, Config, CurrentConditions, ForecastSample, WeatherError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Upstream weather source: one call per endpoint, results already
/// normalized into domain models.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, query: &CityQuery)
    -> Result<CurrentConditions, WeatherError>;

    /// The full 3-hour feed, in upstream order.
    async fn forecast_feed(&self, query: &CityQuery) -> Result<Vec<ForecastSample>, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key);
    if let Some(base_url) = config.base_url.as_deref() {
        provider = provider.with_base_url(base_url);
    }
    if let Some(secs) = config.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs))?;
    }

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No OpenWeatherMap API key configured"));
        assert!(msg.contains("Hint: run `cityweather configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://127.0.0.1:9".into()),
            timeout_secs: Some(5),
        };

        assert!(provider_from_config(&cfg).is_ok());
    }
}
