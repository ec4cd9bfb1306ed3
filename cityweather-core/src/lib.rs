//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - The weather query service and its upstream provider abstraction
//! - Reduction of the 3-hour forecast feed to one entry per day
//! - Preferences (theme, units, last city) behind an injectable store
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod service;
pub mod session;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{DailyForecast, reduce_to_daily};
pub use icon::WeatherIcon;
pub use model::{CityQuery, CurrentConditions, ForecastSample, Theme, UnitSystem, WeatherReport};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceKey, PreferenceStore,
    Preferences,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::WeatherQueryService;
pub use session::{ViewState, WeatherSession};
