use crate::{Config, WeatherError, WeatherQuery, WeatherReading};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A remote weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeather provider from config.
///
/// `override_key` (CLI flag or environment) takes precedence over the stored key.
pub fn provider_from_config(
    config: &Config,
    override_key: Option<&str>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key(override_key)?;
    let provider = OpenWeatherProvider::new(api_key).with_base_url(config.openweather_url());

    Ok(Box::new(provider))
}
