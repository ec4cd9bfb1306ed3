//! User preferences and the key-value stores that persist them.

use directories::ProjectDirs;
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::model::{Theme, UnitSystem};

/// City fetched on first run and after a reset.
pub const DEFAULT_CITY: &str = "New York";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceKey {
    Theme,
    Unit,
    LastCity,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Theme => "theme",
            PreferenceKey::Unit => "unit",
            PreferenceKey::LastCity => "last_city",
        }
    }

    pub const fn all() -> &'static [PreferenceKey] {
        &[PreferenceKey::Theme, PreferenceKey::Unit, PreferenceKey::LastCity]
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to read preferences file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write preferences file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine platform config directory")]
    NoConfigDir,
}

/// String-valued key-value store behind [`Preferences`].
pub trait PreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError>;
    /// Removes every key.
    fn clear(&mut self) -> Result<(), PreferenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<PreferenceKey, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PreferenceError> {
        self.values.clear();
        Ok(())
    }
}

/// TOML file of string keys. The whole file is rewritten on every change.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferenceError::Read {
            path: path.clone(),
            source,
        })?;

        // Every write rewrites the whole file, so an unreadable one is
        // replaced on the next change.
        let values = match contents.parse::<toml::Table>() {
            Ok(table) => known_string_entries(table),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unparseable preferences file"
                );
                BTreeMap::new()
            }
        };

        Ok(Self { path, values })
    }

    /// Opens the store in the platform config directory.
    pub fn open_default() -> Result<Self, PreferenceError> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf, PreferenceError> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or(PreferenceError::NoConfigDir)?;

        Ok(dirs.config_dir().join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml = toml::to_string_pretty(&self.values)?;
        fs::write(&self.path, toml).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps string values of known keys; anything else is dropped.
fn known_string_entries(table: toml::Table) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for (key, value) in table {
        let known = PreferenceKey::all().iter().any(|k| k.as_str() == key);
        match value {
            toml::Value::String(s) if known => {
                values.insert(key, s);
            }
            other => tracing::warn!(%key, value = %other, "ignoring stored preference"),
        }
    }

    values
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: PreferenceKey, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.as_str().to_string(), value.to_string());
        self.persist()
    }

    fn clear(&mut self) -> Result<(), PreferenceError> {
        self.values.clear();
        self.persist()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub unit: UnitSystem,
    pub last_city: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            unit: UnitSystem::Metric,
            last_city: DEFAULT_CITY.to_string(),
        }
    }
}

impl Preferences {
    /// Reads every key, falling back to the default for missing or
    /// unparseable values, and writes back any key that was missing so the
    /// store holds a full set after first run.
    pub fn load_or_init<S: PreferenceStore>(store: &mut S) -> Result<Self, PreferenceError> {
        let defaults = Self::default();
        let mut prefs = defaults.clone();
        let mut missing = Vec::new();

        for key in PreferenceKey::all() {
            let Some(raw) = store.get(*key)? else {
                missing.push(*key);
                continue;
            };

            match key {
                PreferenceKey::Theme => match Theme::try_from(raw.as_str()) {
                    Ok(theme) => prefs.theme = theme,
                    Err(e) => tracing::warn!(error = %e, "ignoring stored theme"),
                },
                PreferenceKey::Unit => match UnitSystem::try_from(raw.as_str()) {
                    Ok(unit) => prefs.unit = unit,
                    Err(e) => tracing::warn!(error = %e, "ignoring stored unit"),
                },
                PreferenceKey::LastCity => {
                    let city = raw.trim();
                    if city.is_empty() {
                        tracing::warn!("ignoring blank stored city");
                    } else {
                        prefs.last_city = city.to_string();
                    }
                }
            }
        }

        for key in missing {
            store.set(key, &prefs.value_of(key))?;
        }

        Ok(prefs)
    }

    /// Writes all three keys.
    pub fn save<S: PreferenceStore>(&self, store: &mut S) -> Result<(), PreferenceError> {
        for key in PreferenceKey::all() {
            store.set(*key, &self.value_of(*key))?;
        }
        Ok(())
    }

    /// Clears the store and writes the defaults back.
    pub fn reset<S: PreferenceStore>(store: &mut S) -> Result<Self, PreferenceError> {
        store.clear()?;
        let defaults = Self::default();
        defaults.save(store)?;
        Ok(defaults)
    }

    pub fn value_of(&self, key: PreferenceKey) -> String {
        match key {
            PreferenceKey::Theme => self.theme.as_str().to_string(),
            PreferenceKey::Unit => self.unit.as_str().to_string(),
            PreferenceKey::LastCity => self.last_city.clone(),
        }
    }
}
