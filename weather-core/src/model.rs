use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

/// Unchecked wire shape of [`Coordinates`]; deserializing goes through
/// [`Coordinates::new`].
#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = WeatherError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(WeatherError::InvalidQuery(format!(
                "coordinates must be finite, got ({latitude}, {longitude})"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidQuery(format!(
                "latitude {latitude} is outside -90..=90"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidQuery(format!(
                "longitude {longitude} is outside -180..=180"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What to ask the weather service for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates(Coordinates),
    City(String),
}

impl WeatherQuery {
    /// Build a city query from free text. Surrounding whitespace is dropped;
    /// blank input is rejected.
    pub fn city(text: &str) -> Result<Self, WeatherError> {
        let name = text.trim();
        if name.is_empty() {
            return Err(WeatherError::InvalidQuery("city name is empty".into()));
        }
        Ok(WeatherQuery::City(name.to_string()))
    }
}

impl From<Coordinates> for WeatherQuery {
    fn from(coords: Coordinates) -> Self {
        WeatherQuery::Coordinates(coords)
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::Coordinates(c) => write!(f, "({c})"),
            WeatherQuery::City(name) => write!(f, "'{name}'"),
        }
    }
}

/// The part of the weather service response shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub place: String,
    pub temperature_c: f64,
    pub condition: String,
    pub observed_at: Option<DateTime<Utc>>,
}
