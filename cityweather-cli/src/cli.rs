use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, FilePreferenceStore, Preferences, UnitSystem, ViewState, WeatherQueryService,
    WeatherSession, provider_from_config, session::QUICK_CITIES,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and 5-day forecast by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; defaults to the last city looked up.
        city: Option<String>,

        /// Unit system to use and remember ("metric" or "imperial").
        #[arg(long, value_parser = parse_unit)]
        units: Option<UnitSystem>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Switch between metric and imperial, then show the current city.
    ToggleUnit,

    /// Switch between light and dark theme.
    ToggleTheme,

    /// Reset preferences to defaults and show New York.
    Reset,

    /// Print stored preferences.
    Prefs,

    /// Interactive menu: search, quick cities, toggles.
    Interactive,
}

fn parse_unit(value: &str) -> Result<UnitSystem, String> {
    UnitSystem::try_from(value).map_err(|e| e.to_string())
}

type Session = WeatherSession<FilePreferenceStore>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(command = ?self.command, "dispatching command");

        match self.command {
            Command::Configure => configure(),
            Command::Prefs => {
                let mut store = FilePreferenceStore::open_default()?;
                let prefs = Preferences::load_or_init(&mut store)?;
                print!("{}", render::preferences_text(&prefs));
                Ok(())
            }
            Command::Show { city, units, json } => {
                let mut session = open_session()?;
                if let Some(unit) = units {
                    session.set_unit(unit)?;
                }

                let view = match city {
                    Some(city) => session.search(&city).await?.cloned().unwrap_or_default(),
                    None => session.initial_load().await?.clone(),
                };
                finish(&view, json)
            }
            Command::ToggleUnit => {
                let mut session = open_session()?;
                let view = session.toggle_unit().await?.clone();
                println!("Units: {}", session.preferences().unit);
                finish(&view, false)
            }
            Command::ToggleTheme => {
                let mut store = FilePreferenceStore::open_default()?;
                let mut prefs = Preferences::load_or_init(&mut store)?;
                prefs.theme = prefs.theme.toggled();
                prefs.save(&mut store)?;
                println!("Theme: {}", prefs.theme);
                Ok(())
            }
            Command::Reset => {
                let mut session = open_session()?;
                let view = session.reset_preferences().await?.clone();
                println!("Preferences reset.");
                finish(&view, false)
            }
            Command::Interactive => interactive(open_session()?).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn open_session() -> anyhow::Result<Session> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let store = FilePreferenceStore::open_default()?;

    Ok(WeatherSession::new(WeatherQueryService::new(provider), store)?)
}

fn view_output(view: &ViewState, json: bool, today: NaiveDate) -> anyhow::Result<String> {
    if !json {
        return Ok(render::view(view, today));
    }

    let value = match view {
        ViewState::Ready(report) => serde_json::to_value(report)?,
        ViewState::Failed(msg) => serde_json::json!({ "error": msg }),
        ViewState::Empty => serde_json::Value::Null,
    };

    Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
}

fn print_view(view: &ViewState, json: bool) -> anyhow::Result<()> {
    print!("{}", view_output(view, json, Local::now().date_naive())?);
    Ok(())
}

/// Exit status of a one-shot command: a failed lookup is an error.
fn view_status(view: &ViewState) -> anyhow::Result<()> {
    match view.error() {
        Some(msg) => Err(anyhow::anyhow!("{msg}")),
        None => Ok(()),
    }
}

/// Prints the view of a one-shot command. In text mode a failure is left to
/// the error exit so the message is not printed twice.
fn finish(view: &ViewState, json: bool) -> anyhow::Result<()> {
    if json || view.error().is_none() {
        print_view(view, json)?;
    }
    view_status(view)
}

/// `None` when the user dismissed the prompt (Esc or Ctrl-C).
fn unless_cancelled<T>(answer: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const SEARCH: &str = "Search for a city";
const TOGGLE_UNIT: &str = "Switch units";
const TOGGLE_THEME: &str = "Switch theme";
const RESET: &str = "Reset preferences";
const QUIT: &str = "Quit";

async fn interactive(mut session: Session) -> anyhow::Result<()> {
    println!("Loading weather data...");
    let view = session.initial_load().await?.clone();
    print_view(&view, false)?;

    loop {
        let prefs = session.preferences();
        let unit_label = format!("{TOGGLE_UNIT} (now {})", prefs.unit);
        let theme_label = format!("{TOGGLE_THEME} (now {})", prefs.theme);

        let mut options: Vec<String> = vec![SEARCH.to_string()];
        options.extend(QUICK_CITIES.iter().map(|c| c.to_string()));
        options.extend([unit_label.clone(), theme_label.clone(), RESET.into(), QUIT.into()]);

        let Some(choice) = unless_cancelled(Select::new("What next?", options).prompt())? else {
            return Ok(());
        };

        let view = if choice == SEARCH {
            let Some(input) = unless_cancelled(Text::new("City:").prompt())? else {
                continue;
            };
            match session.search(&input).await? {
                Some(view) => view.clone(),
                None => continue,
            }
        } else if choice == unit_label {
            println!("Loading weather data...");
            session.toggle_unit().await?.clone()
        } else if choice == theme_label {
            let theme = session.toggle_theme()?;
            println!("Theme: {theme}");
            continue;
        } else if choice == RESET {
            session.reset_preferences().await?.clone()
        } else if choice == QUIT {
            return Ok(());
        } else {
            println!("Loading weather data...");
            session.quick_city(&choice).await?.clone()
        };

        print_view(&view, false)?;
    }
}
