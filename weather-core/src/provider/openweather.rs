use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::DEFAULT_OPENWEATHER_URL,
    error::WeatherError,
    model::{WeatherQuery, WeatherReading},
};

use super::WeatherProvider;

/// Client for the OpenWeather "current weather" endpoint, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_OPENWEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::Coordinates(c) => vec![
                ("lat", c.latitude().to_string()),
                ("lon", c.longitude().to_string()),
            ],
            WeatherQuery::City(name) => vec![("q", name.clone())],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(%query, "requesting current weather");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherReading {
            place: parsed.name,
            temperature_c: parsed.main.temp,
            condition,
            observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        if matches!(query, WeatherQuery::City(name) if name.trim().is_empty()) {
            return Err(WeatherError::InvalidQuery("city name is empty".into()));
        }

        match self.fetch_current(query).await {
            Ok(reading) => {
                tracing::info!(
                    %query,
                    place = %reading.place,
                    temperature_c = reading.temperature_c,
                    "weather loaded"
                );
                Ok(reading)
            }
            Err(err) => {
                tracing::warn!(%query, error = %err, "weather request failed");
                Err(err)
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
