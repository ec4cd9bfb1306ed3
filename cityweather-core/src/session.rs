//! Command handlers behind the interactive front end.
//!
//! A session owns the query service, the preference store and whatever the
//! user currently sees. Every handler takes `&mut self`, so handlers run one
//! at a time and the last one issued decides the visible state.

use crate::{
    error::WeatherError,
    model::{CityQuery, Theme, UnitSystem, WeatherReport},
    preferences::{DEFAULT_CITY, PreferenceError, PreferenceKey, PreferenceStore, Preferences},
    service::WeatherQueryService,
};

/// Shortcut cities offered next to free-text search.
pub const QUICK_CITIES: &[&str] = &["London", "Tokyo", "Paris", "Sydney", "Dubai"];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Ready(WeatherReport),
    /// The last query failed; any earlier report has been dropped.
    Failed(String),
}

impl ViewState {
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            ViewState::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WeatherSession<S: PreferenceStore> {
    service: WeatherQueryService,
    store: S,
    preferences: Preferences,
    view: ViewState,
}

impl<S: PreferenceStore> WeatherSession<S> {
    /// Reads preferences from `store`, writing defaults on first run.
    pub fn new(service: WeatherQueryService, mut store: S) -> Result<Self, PreferenceError> {
        let preferences = Preferences::load_or_init(&mut store)?;

        Ok(Self {
            service,
            store,
            preferences,
            view: ViewState::Empty,
        })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Fetches the stored city under the stored unit.
    pub async fn initial_load(&mut self) -> Result<&ViewState, PreferenceError> {
        let city = self.preferences.last_city.clone();
        self.load(&city).await
    }

    /// Looks up `input` after trimming. Blank input is ignored and returns
    /// `None` without issuing a request.
    pub async fn search(&mut self, input: &str) -> Result<Option<&ViewState>, PreferenceError> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        self.load(input).await.map(Some)
    }

    pub async fn quick_city(&mut self, city: &str) -> Result<&ViewState, PreferenceError> {
        self.load(city).await
    }

    /// Flips the unit system, persists it and re-fetches the current city.
    pub async fn toggle_unit(&mut self) -> Result<&ViewState, PreferenceError> {
        self.set_unit(self.preferences.unit.toggled())?;

        let city = self.preferences.last_city.clone();
        self.load(&city).await
    }

    /// Persists `unit` without fetching.
    pub fn set_unit(&mut self, unit: UnitSystem) -> Result<(), PreferenceError> {
        if unit != self.preferences.unit {
            self.store.set(PreferenceKey::Unit, unit.as_str())?;
            self.preferences.unit = unit;
        }
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, PreferenceError> {
        let theme = self.preferences.theme.toggled();
        self.store.set(PreferenceKey::Theme, theme.as_str())?;
        self.preferences.theme = theme;
        Ok(theme)
    }

    /// Clears stored preferences back to defaults and shows [`DEFAULT_CITY`].
    pub async fn reset_preferences(&mut self) -> Result<&ViewState, PreferenceError> {
        self.preferences = Preferences::reset(&mut self.store)?;
        tracing::info!("preferences reset to defaults");
        self.load(DEFAULT_CITY).await
    }

    async fn load(&mut self, city: &str) -> Result<&ViewState, PreferenceError> {
        let Some(query) = CityQuery::new(city, self.preferences.unit) else {
            return Ok(&self.view);
        };

        match self.service.fetch_weather(&query).await {
            Ok(report) => {
                if self.preferences.last_city != query.name() {
                    self.store.set(PreferenceKey::LastCity, query.name())?;
                    self.preferences.last_city = query.name().to_string();
                }
                self.view = ViewState::Ready(report);
            }
            Err(err) => self.fail(&query, err),
        }

        Ok(&self.view)
    }

    fn fail(&mut self, query: &CityQuery, err: WeatherError) {
        tracing::warn!(city = query.name(), error = %err, "weather query failed");
        self.view = ViewState::Failed(err.to_string());
    }
}
