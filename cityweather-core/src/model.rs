use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::forecast::DailyForecast;

/// Measurement convention applied to every value the upstream returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Textual form, also used verbatim as the upstream `units` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

/// A single lookup: a trimmed, non-empty city name plus the unit system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    name: String,
    pub unit: UnitSystem,
}

impl CityQuery {
    /// Returns `None` when `name` is empty after trimming.
    pub fn new(name: &str, unit: UnitSystem) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self {
            name: trimmed.to_string(),
            unit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Normalized snapshot of the upstream "current weather" response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    /// ISO country code; empty when the upstream omits it.
    pub country: String,
    pub condition: String,
    pub description: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: u32,
    pub visibility_m: Option<u32>,
    pub cloudiness_pct: u8,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl CurrentConditions {
    pub fn temperature_rounded(&self) -> i64 {
        round_for_display(self.temperature)
    }

    pub fn feels_like_rounded(&self) -> i64 {
        round_for_display(self.feels_like)
    }

    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_m.map(|m| f64::from(m) / 1000.0)
    }

    /// Both sun times, only when the upstream returned both.
    pub fn sun_times(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.sunrise.zip(self.sunset)
    }
}

/// One 3-hour entry of the forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Upstream formatted text, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp_text: String,
    pub condition: String,
    pub description: String,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl ForecastSample {
    pub fn temperature_rounded(&self) -> i64 {
        round_for_display(self.temperature)
    }

    pub fn high_rounded(&self) -> i64 {
        round_for_display(self.temp_max)
    }

    pub fn low_rounded(&self) -> i64 {
        round_for_display(self.temp_min)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: DailyForecast,
    pub unit: UnitSystem,
}

/// Rounds half away from zero. Raw values stay untouched on the models.
fn round_for_display(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_as_str_roundtrip() {
        for unit in UnitSystem::all() {
            let parsed = UnitSystem::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
    }

    #[test]
    fn unit_toggle_twice_is_identity() {
        for unit in UnitSystem::all() {
            assert_ne!(unit.toggled(), *unit);
            assert_eq!(unit.toggled().toggled(), *unit);
        }
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn theme_parse_and_toggle() {
        assert_eq!(Theme::try_from("Dark").unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::try_from("sepia").is_err());
    }

    #[test]
    fn city_query_trims_and_rejects_blank() {
        let q = CityQuery::new("  London \n", UnitSystem::Imperial).expect("non-empty");
        assert_eq!(q.name(), "London");
        assert_eq!(q.unit, UnitSystem::Imperial);

        assert!(CityQuery::new("", UnitSystem::Metric).is_none());
        assert!(CityQuery::new("   \t", UnitSystem::Metric).is_none());
    }

    #[test]
    fn rounding_keeps_raw_values() {
        let current = CurrentConditions {
            location_name: "Oslo".into(),
            country: "NO".into(),
            condition: "Snow".into(),
            description: "light snow".into(),
            temperature: -2.5,
            feels_like: 21.49,
            humidity_pct: 80,
            wind_speed: 3.1,
            pressure_hpa: 1001,
            visibility_m: Some(4500),
            cloudiness_pct: 90,
            sunrise: None,
            sunset: None,
        };

        assert_eq!(current.temperature_rounded(), -3);
        assert_eq!(current.feels_like_rounded(), 21);
        assert_eq!(current.temperature, -2.5);
        assert_eq!(current.visibility_km(), Some(4.5));
        assert!(current.sun_times().is_none());
    }
}
