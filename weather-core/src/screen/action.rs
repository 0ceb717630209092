//! Actions dispatched to the screen reducer
//!
//! Naming follows intent vs. result: `Search*`/`Refresh` are user intents,
//! `*Did*` actions carry the outcome of an effect.

use crate::{
    error::LocationError,
    model::{Coordinates, WeatherReading},
};

use super::state::{FetchOrigin, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The screen appeared; resets state and asks for the location.
    Mount,

    LocationDidResolve(Coordinates),
    LocationDidFail(LocationError),

    /// Search field edited.
    SearchChange(String),
    SearchSubmit,

    /// Re-fetch for the last known coordinates.
    Refresh,

    WeatherDidLoad {
        request: RequestId,
        origin: FetchOrigin,
        reading: WeatherReading,
    },
    WeatherDidFail {
        request: RequestId,
        origin: FetchOrigin,
        /// Underlying error text, for logs only.
        detail: String,
    },

    /// Spinner frame.
    Tick,

    Quit,
}

impl Action {
    /// Short form for log lines.
    pub fn summary(&self) -> String {
        match self {
            Action::WeatherDidLoad {
                request, reading, ..
            } => format!(
                "WeatherDidLoad {{ request: {}, place: {:?}, temp: {}°C }}",
                request.0, reading.place, reading.temperature_c
            ),
            Action::WeatherDidFail {
                request, detail, ..
            } => {
                let msg = if detail.chars().count() > 40 {
                    format!("{}...", detail.chars().take(37).collect::<String>())
                } else {
                    detail.clone()
                };
                format!("WeatherDidFail {{ request: {}, {:?} }}", request.0, msg)
            }
            _ => format!("{self:?}"),
        }
    }
}
