use crate::{
    error::WeatherError,
    forecast::reduce_to_daily,
    model::{CityQuery, WeatherReport},
    provider::WeatherProvider,
};

/// Orchestrates one lookup: current conditions, then the forecast feed.
///
/// Nothing is cached; every call hits both endpoints.
#[derive(Debug)]
pub struct WeatherQueryService {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherQueryService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Fetches current conditions and the daily forecast for `query`.
    ///
    /// A failed current-conditions lookup returns before the forecast is
    /// requested. A failed forecast fails the whole query.
    pub async fn fetch_weather(&self, query: &CityQuery) -> Result<WeatherReport, WeatherError> {
        let current = self.provider.current_conditions(query).await?;
        let feed = self.provider.forecast_feed(query).await?;
        let forecast = reduce_to_daily(&feed);

        tracing::debug!(
            city = query.name(),
            samples = feed.len(),
            days = forecast.len(),
            "weather query complete"
        );

        Ok(WeatherReport {
            current,
            forecast,
            unit: query.unit,
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use crate::{
        error::WeatherError,
        model::{CityQuery, CurrentConditions, ForecastSample, UnitSystem},
        provider::WeatherProvider,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Current(String, UnitSystem),
        Forecast(String, UnitSystem),
    }

    /// In-memory provider: knows a fixed set of cities and records every call.
    #[derive(Debug, Clone, Default)]
    pub struct FakeProvider {
        pub known_cities: Vec<String>,
        pub fail_forecast: Option<WeatherError>,
        pub calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeProvider {
        pub fn with_cities(cities: &[&str]) -> Self {
            Self {
                known_cities: cities.iter().map(|c| c.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    pub fn conditions(city: &str, unit: UnitSystem) -> CurrentConditions {
        let temperature = match unit {
            UnitSystem::Metric => 21.6,
            UnitSystem::Imperial => 70.9,
        };

        CurrentConditions {
            location_name: city.to_string(),
            country: "XX".into(),
            condition: "Clear".into(),
            description: "clear sky".into(),
            temperature,
            feels_like: temperature - 0.5,
            humidity_pct: 40,
            wind_speed: 2.5,
            pressure_hpa: 1015,
            visibility_m: Some(10_000),
            cloudiness_pct: 0,
            sunrise: None,
            sunset: None,
        }
    }

    /// 40 samples at 3-hour cadence starting at midnight UTC.
    pub fn feed() -> Vec<ForecastSample> {
        let start: DateTime<Utc> = "2024-06-01T00:00:00Z".parse().unwrap();
        (0..40)
            .map(|i| {
                let ts = start + Duration::hours(3 * i);
                ForecastSample {
                    timestamp: ts,
                    timestamp_text: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                    condition: "Clouds".into(),
                    description: "few clouds".into(),
                    temperature: 20.0,
                    temp_min: 18.0,
                    temp_max: 22.0,
                }
            })
            .collect()
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current_conditions(
            &self,
            query: &CityQuery,
        ) -> Result<CurrentConditions, WeatherError> {
            self.record(Call::Current(query.name().to_string(), query.unit));
            if !self.known_cities.iter().any(|c| c == query.name()) {
                return Err(WeatherError::CityNotFound {
                    city: query.name().to_string(),
                });
            }
            Ok(conditions(query.name(), query.unit))
        }

        async fn forecast_feed(
            &self,
            query: &CityQuery,
        ) -> Result<Vec<ForecastSample>, WeatherError> {
            self.record(Call::Forecast(query.name().to_string(), query.unit));
            match &self.fail_forecast {
                Some(err) => Err(err.clone()),
                None => Ok(feed()),
            }
        }
    }
}
