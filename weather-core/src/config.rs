use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Coordinates;

pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json/";

/// OpenWeather credentials and endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,

    /// Override for tests or proxies. Defaults to [`DEFAULT_OPENWEATHER_URL`].
    pub base_url: Option<String>,
}

/// Whether the app may read the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    /// Prompt once per run.
    #[default]
    Ask,
    Granted,
    Denied,
}

/// Where the current position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Ip,
    Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub permission: PermissionPolicy,
    #[serde(default)]
    pub source: SourceKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ip_lookup_url: Option<String>,
}

/// How results of overlapping weather requests are applied to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Only the most recently issued request may update the screen.
    #[default]
    LatestIssued,
    /// Every result is applied as it arrives; the last to arrive wins.
    LastResolved,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
///
/// [location]
/// permission = "ask"
/// source = "fixed"
/// latitude = 40.0
/// longitude = -75.0
///
/// [screen]
/// overlap = "latest-issued"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub openweather: OpenWeatherConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
}

impl Config {
    /// Pick the API key: an explicit override wins over the stored one.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Result<String> {
        override_key
            .or(self.openweather.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather-finder configure` or set WEATHER_FINDER_API_KEY."
                )
            })
    }

    pub fn openweather_url(&self) -> &str {
        self.openweather
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENWEATHER_URL)
    }

    pub fn ip_lookup_url(&self) -> &str {
        self.location
            .ip_lookup_url
            .as_deref()
            .unwrap_or(DEFAULT_IP_LOOKUP_URL)
    }

    /// Coordinates for the `fixed` source.
    pub fn fixed_coordinates(&self) -> Result<Coordinates> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .context("Invalid fixed coordinates in [location] section"),
            _ => Err(anyhow!(
                "Location source is 'fixed' but latitude/longitude are not set.\n\
                 Hint: run `weather-finder configure` to set them."
            )),
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    pub fn set_fixed_location(&mut self, coords: Coordinates) {
        self.location.source = SourceKind::Fixed;
        self.location.latitude = Some(coords.latitude());
        self.location.longitude = Some(coords.longitude());
    }

    /// Load config from the default path, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where the screen writes its log while it owns the terminal.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.cache_dir().join("weather-finder.log"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-finder", "weather-finder")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
