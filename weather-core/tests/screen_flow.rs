//! End-to-end screen flows with in-memory location and weather providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use weather_core::{
    Coordinates, LocationProvider, OverlapPolicy, Permission, WeatherError, WeatherProvider,
    WeatherQuery, WeatherReading,
    location::FixedPosition,
    screen::{Action, Effect, ScreenState, ScreenStore, View, perform},
};

/// Answers from a queue and records every query it receives.
#[derive(Debug, Default)]
struct ScriptedWeather {
    calls: Mutex<Vec<WeatherQuery>>,
    answers: Mutex<Vec<Result<WeatherReading, String>>>,
}

impl ScriptedWeather {
    fn answering(answers: Vec<Result<WeatherReading, String>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answers: Mutex::new(answers),
        }
    }

    fn calls(&self) -> Vec<WeatherQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedWeather {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        self.calls.lock().unwrap().push(query.clone());
        let mut answers = self.answers.lock().unwrap();
        assert!(!answers.is_empty(), "unexpected weather call for {query}");
        answers
            .remove(0)
            .map_err(|msg| WeatherError::InvalidQuery(format!("simulated network error: {msg}")))
    }
}

fn reading(place: &str, temp: f64, condition: &str) -> WeatherReading {
    WeatherReading {
        place: place.into(),
        temperature_c: temp,
        condition: condition.into(),
        observed_at: None,
    }
}

fn location(permission: Permission) -> LocationProvider {
    LocationProvider::new(
        permission,
        Arc::new(FixedPosition(Coordinates::new(40.0, -75.0).unwrap())),
    )
}

/// Dispatch an action and run every resulting effect to completion, in order.
async fn settle(
    store: &mut ScreenStore,
    action: Action,
    location: &LocationProvider,
    weather: &dyn WeatherProvider,
) {
    let mut pending = vec![action];
    while let Some(action) = pending.pop() {
        let result = store.dispatch(action);
        for effect in result.effects {
            pending.push(perform(effect, location, weather).await);
        }
    }
}

/// Dispatch an action and hand back its effects without running them.
fn effects_of(store: &mut ScreenStore, action: Action) -> Vec<Effect> {
    store.dispatch(action).effects
}

#[tokio::test]
async fn permission_denied_stops_loading_and_skips_weather() {
    let weather = ScriptedWeather::default();
    let location = location(Permission::Denied);
    let mut store = ScreenStore::new(ScreenState::default());

    settle(&mut store, Action::Mount, &location, &weather).await;

    assert!(!store.state().is_loading());
    assert!(store.state().error().is_some());
    assert!(weather.calls().is_empty());
}

#[tokio::test]
async fn granted_location_shows_response_fields_exactly() {
    let weather =
        ScriptedWeather::answering(vec![Ok(reading("Ambler", 21.37, "scattered clouds"))]);
    let location = location(Permission::Granted);
    let mut store = ScreenStore::new(ScreenState::default());

    settle(&mut store, Action::Mount, &location, &weather).await;

    assert_eq!(
        weather.calls(),
        vec![WeatherQuery::Coordinates(Coordinates::new(40.0, -75.0).unwrap())]
    );
    match store.state().view() {
        View::Ready(r) => {
            assert_eq!(r.place, "Ambler");
            assert_eq!(r.temperature_c, 21.37);
            assert_eq!(r.condition, "scattered clouds");
        }
        other => panic!("expected ready view, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_refresh_sets_error_and_keeps_reading() {
    let weather = ScriptedWeather::answering(vec![
        Ok(reading("Ambler", 21.0, "clear sky")),
        Err("connection reset".into()),
    ]);
    let location = location(Permission::Granted);
    let mut store = ScreenStore::new(ScreenState::default());

    settle(&mut store, Action::Mount, &location, &weather).await;
    settle(&mut store, Action::Refresh, &location, &weather).await;

    let state = store.state();
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("Failed to fetch weather data."));
    assert_eq!(state.reading, Some(reading("Ambler", 21.0, "clear sky")));
    assert_eq!(weather.calls().len(), 2);
}

#[tokio::test]
async fn search_success_resets_text_and_updates_reading() {
    let weather = ScriptedWeather::answering(vec![Ok(reading("Paris", 14.2, "light rain"))]);
    let location = location(Permission::Denied);
    let mut store = ScreenStore::new(ScreenState::default());

    settle(&mut store, Action::Mount, &location, &weather).await;
    settle(
        &mut store,
        Action::SearchChange("Paris".into()),
        &location,
        &weather,
    )
    .await;
    settle(&mut store, Action::SearchSubmit, &location, &weather).await;

    let state = store.state();
    assert!(state.search.is_empty());
    assert_eq!(state.view(), View::Ready(&reading("Paris", 14.2, "light rain")));
    assert_eq!(weather.calls(), vec![WeatherQuery::City("Paris".into())]);
}

#[tokio::test]
async fn empty_search_performs_no_call() {
    let weather = ScriptedWeather::default();
    let location = location(Permission::Denied);
    let mut store = ScreenStore::new(ScreenState::default());

    settle(&mut store, Action::Mount, &location, &weather).await;
    let before = store.state().clone();

    settle(&mut store, Action::SearchSubmit, &location, &weather).await;

    assert_eq!(store.state(), &before);
    assert!(weather.calls().is_empty());
}

/// Two refreshes in flight, answered in reverse dispatch order.
async fn reversed_refreshes(policy: OverlapPolicy) -> WeatherReading {
    let weather = ScriptedWeather::answering(vec![
        Ok(reading("Initial", 10.0, "clear sky")),
        Ok(reading("Second", 12.0, "mist")),
        Ok(reading("First", 11.0, "haze")),
    ]);
    let location = location(Permission::Granted);
    let mut store = ScreenStore::new(ScreenState::new(policy));

    settle(&mut store, Action::Mount, &location, &weather).await;

    let first = effects_of(&mut store, Action::Refresh);
    let second = effects_of(&mut store, Action::Refresh);

    for effect in second.into_iter().chain(first) {
        let outcome = perform(effect, &location, &weather).await;
        store.dispatch(outcome);
    }

    assert!(!store.state().is_loading());
    store.state().reading.clone().expect("a reading")
}

#[tokio::test]
async fn rapid_refresh_last_resolved_wins() {
    let shown = reversed_refreshes(OverlapPolicy::LastResolved).await;
    assert_eq!(shown.place, "First");
}

#[tokio::test]
async fn rapid_refresh_latest_issued_wins() {
    let shown = reversed_refreshes(OverlapPolicy::LatestIssued).await;
    assert_eq!(shown.place, "Second");
}
