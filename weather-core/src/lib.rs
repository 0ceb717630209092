//! Core library for `weather-finder`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The location provider (permission + position source)
//! - The weather client abstraction and its OpenWeather implementation
//! - The weather screen as a reducer-driven state machine
//!
//! It is used by the `weather-finder` binary, but has no terminal dependencies.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod screen;

pub use config::{Config, OverlapPolicy, PermissionPolicy, SourceKind};
pub use error::{LocationError, WeatherError};
pub use location::{LocationProvider, Permission, PositionSource};
pub use model::{Coordinates, WeatherQuery, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
