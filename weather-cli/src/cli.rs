use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use weather_core::{
    Config, LocationError, LocationProvider, WeatherQuery, WeatherReading, provider_from_config,
    screen::ScreenState,
};

use crate::{app, logging, prompt, ui::capitalize_words};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-finder",
    version,
    about = "Current weather for your location or any city"
)]
pub struct Cli {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, env = "WEATHER_FINDER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Path to the config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive weather screen (default).
    Run,

    /// Configure the API key and location settings.
    Configure,

    /// Print the current weather once and exit.
    Show {
        /// City name; if absent, the current location is used.
        #[arg(long)]
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Run);

        match &command {
            Command::Run => {
                let log_path = logging::init_file()?;
                tracing::info!(log = %log_path.display(), "starting weather screen");
            }
            Command::Configure | Command::Show { .. } => logging::init_stderr(),
        }

        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match command {
            Command::Run => run_screen(&config, self.api_key.as_deref()).await,
            Command::Configure => {
                let mut config = config;
                prompt::configure(&config)?.apply(&mut config);

                let path = match &self.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Configuration saved to {}", path.display());
                Ok(())
            }
            Command::Show { city } => show(&config, self.api_key.as_deref(), city).await,
        }
    }
}

async fn run_screen(config: &Config, api_key: Option<&str>) -> anyhow::Result<()> {
    let weather = provider_from_config(config, api_key)?;
    let permission = prompt::resolve_permission(config.location.permission)?;
    let location = LocationProvider::from_config(config, permission)?;

    let services = app::Services {
        location,
        weather: Arc::from(weather),
    };

    app::run(services, ScreenState::new(config.screen.overlap)).await
}

async fn show(config: &Config, api_key: Option<&str>, city: Option<String>) -> anyhow::Result<()> {
    let weather = provider_from_config(config, api_key)?;

    let query = match city {
        Some(name) => WeatherQuery::city(&name)?,
        None => {
            let permission = prompt::resolve_permission(config.location.permission)?;
            let location = LocationProvider::from_config(config, permission)?;
            match location.current_position().await {
                Ok(coords) => WeatherQuery::Coordinates(coords),
                Err(LocationError::PermissionDenied) => bail!(
                    "Location permission is required to fetch weather data.\n\
                     Hint: pass --city <NAME> instead."
                ),
                Err(err) => return Err(err).context("Could not determine your location"),
            }
        }
    };

    let reading = weather
        .fetch(&query)
        .await
        .with_context(|| format!("Failed to fetch weather for {query}"))?;

    println!("{}", format_reading(&reading));
    Ok(())
}

/// Plain-text rendition of a reading for `show`.
pub fn format_reading(reading: &WeatherReading) -> String {
    let mut out = format!(
        "{}\n  {}°C  {}",
        reading.place,
        reading.temperature_c,
        capitalize_words(&reading.condition)
    );
    if let Some(observed) = reading.observed_at {
        out.push_str(&format!(
            "\n  updated {}",
            observed.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ));
    }
    out
}
