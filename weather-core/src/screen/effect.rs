//! Effects - side effects declared by the reducer
//!
//! The reducer stays pure; the runtime executes effects with [`perform`] and
//! feeds the resulting action back in.

use crate::{location::LocationProvider, model::WeatherQuery, provider::WeatherProvider};

use super::{
    action::Action,
    state::{FetchOrigin, RequestId},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestLocation,
    FetchWeather {
        request: RequestId,
        origin: FetchOrigin,
        query: WeatherQuery,
    },
}

/// Run one effect to completion and return the action that reports its outcome.
pub async fn perform(
    effect: Effect,
    location: &LocationProvider,
    weather: &dyn WeatherProvider,
) -> Action {
    match effect {
        Effect::RequestLocation => match location.current_position().await {
            Ok(coords) => Action::LocationDidResolve(coords),
            Err(err) => Action::LocationDidFail(err),
        },
        Effect::FetchWeather {
            request,
            origin,
            query,
        } => match weather.fetch(&query).await {
            Ok(reading) => Action::WeatherDidLoad {
                request,
                origin,
                reading,
            },
            Err(err) => Action::WeatherDidFail {
                request,
                origin,
                detail: err.to_string(),
            },
        },
    }
}
