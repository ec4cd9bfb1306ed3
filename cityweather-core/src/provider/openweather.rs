use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::WeatherError,
    model::{CityQuery, CurrentConditions, ForecastSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Provider against the public endpoint, with no request timeout.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    async fn get(&self, endpoint: &str, query: &CityQuery) -> Result<Response, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, city = query.name(), unit = %query.unit, "requesting OpenWeather");

        self.http
            .get(&url)
            .query(&[
                ("q", query.name()),
                ("units", query.unit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        query: &CityQuery,
    ) -> Result<CurrentConditions, WeatherError> {
        let res = self.get("weather", query).await?;
        let status = res.status();
        let body = read_body(res).await?;

        if !status.is_success() {
            tracing::warn!(
                %status,
                city = query.name(),
                body = %truncate_body(&body),
                "OpenWeather current request failed"
            );
            return Err(WeatherError::CityNotFound {
                city: query.name().to_string(),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("current weather JSON: {e}"))
        })?;

        Ok(parsed.into_conditions())
    }

    async fn forecast_feed(&self, query: &CityQuery) -> Result<Vec<ForecastSample>, WeatherError> {
        let res = self.get("forecast", query).await?;
        let status = res.status();
        let body = read_body(res).await?;

        if !status.is_success() {
            tracing::warn!(%status, city = query.name(), "OpenWeather forecast request failed");
            return Err(WeatherError::MalformedResponse(format!(
                "forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("forecast JSON: {e}")))?;

        parsed.list.into_iter().map(OwForecastEntry::into_sample).collect()
    }
}

async fn read_body(res: Response) -> Result<String, WeatherError> {
    res.text().await.map_err(|e| WeatherError::Network(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    visibility: Option<u32>,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        let (condition, description) = primary_weather(self.weather);

        CurrentConditions {
            location_name: self.name,
            country: self.sys.country.unwrap_or_default(),
            condition,
            description,
            temperature: self.main.temp,
            feels_like: self.main.feels_like.unwrap_or(self.main.temp),
            humidity_pct: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility,
            cloudiness_pct: self.clouds.all,
            sunrise: self.sys.sunrise.and_then(unix_to_utc),
            sunset: self.sys.sunset.and_then(unix_to_utc),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample, WeatherError> {
        let timestamp = unix_to_utc(self.dt).ok_or_else(|| {
            WeatherError::MalformedResponse(format!("forecast timestamp out of range: {}", self.dt))
        })?;
        let (condition, description) = primary_weather(self.weather);

        Ok(ForecastSample {
            timestamp,
            timestamp_text: self.dt_txt,
            condition,
            description,
            temperature: self.main.temp,
            temp_min: self.main.temp_min.unwrap_or(self.main.temp),
            temp_max: self.main.temp_max.unwrap_or(self.main.temp),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// First `weather` entry as (keyword, description).
fn primary_weather(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
