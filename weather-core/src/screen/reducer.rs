//! Reducer - (state, action) -> changed flag + effects
//!
//! All state mutations happen here. No I/O: requests are returned as effects.

use crate::{error::LocationError, model::WeatherQuery};

use super::{
    DispatchResult,
    action::Action,
    effect::Effect,
    state::{FetchOrigin, Phase, ScreenState},
};

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Location permission is required to fetch weather data.";
pub const LOCATION_UNAVAILABLE_MESSAGE: &str = "Unable to determine your location.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data.";
pub const CITY_FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather for the city.";

pub fn reducer(state: &mut ScreenState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Mount => {
            state.remount();
            state.phase = Phase::Locating;
            DispatchResult::changed_with(Effect::RequestLocation)
        }

        Action::LocationDidResolve(coords) => {
            state.coordinates = Some(coords);
            // A search submitted while locating keeps the screen.
            if searching(state) {
                return DispatchResult::changed();
            }
            start_fetch(state, FetchOrigin::Location, coords.into())
        }

        Action::LocationDidFail(err) => {
            if searching(state) {
                return DispatchResult::unchanged();
            }
            let message = match err {
                LocationError::PermissionDenied => PERMISSION_DENIED_MESSAGE,
                LocationError::Unavailable(_) => LOCATION_UNAVAILABLE_MESSAGE,
            };
            state.phase = Phase::Failed(message.to_string());
            DispatchResult::changed()
        }

        Action::SearchChange(text) => {
            if state.search == text {
                return DispatchResult::unchanged();
            }
            state.search = text;
            DispatchResult::changed()
        }

        Action::SearchSubmit => match WeatherQuery::city(&state.search) {
            Ok(query) => start_fetch(state, FetchOrigin::Search, query),
            Err(_) => DispatchResult::unchanged(),
        },

        Action::Refresh => match state.coordinates {
            Some(coords) => start_fetch(state, FetchOrigin::Refresh, coords.into()),
            None => DispatchResult::unchanged(),
        },

        Action::WeatherDidLoad {
            request,
            origin,
            reading,
        } => {
            if !state.accepts(request) {
                return DispatchResult::unchanged();
            }
            state.reading = Some(reading);
            state.phase = Phase::Idle;
            if origin == FetchOrigin::Search {
                state.search.clear();
            }
            DispatchResult::changed()
        }

        Action::WeatherDidFail {
            request, origin, ..
        } => {
            if !state.accepts(request) {
                return DispatchResult::unchanged();
            }
            let message = match origin {
                FetchOrigin::Search => CITY_FETCH_FAILED_MESSAGE,
                FetchOrigin::Location | FetchOrigin::Refresh => FETCH_FAILED_MESSAGE,
            };
            state.phase = Phase::Failed(message.to_string());
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            if state.is_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // Handled by the runtime loop.
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn searching(state: &ScreenState) -> bool {
    matches!(
        state.phase,
        Phase::Loading {
            origin: FetchOrigin::Search,
            ..
        }
    )
}

fn start_fetch(
    state: &mut ScreenState,
    origin: FetchOrigin,
    query: WeatherQuery,
) -> DispatchResult<Effect> {
    let request = state.issue_request();
    state.phase = Phase::Loading { request, origin };
    DispatchResult::changed_with(Effect::FetchWeather {
        request,
        origin,
        query,
    })
}
