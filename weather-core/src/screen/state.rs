//! Screen state - single source of truth for the weather screen
//!
//! Only the reducer mutates it. Renderers read it through [`ScreenState::view`],
//! which always yields exactly one of loading, error, ready or empty.

use crate::{
    config::OverlapPolicy,
    model::{Coordinates, WeatherReading},
};

/// Identifies one issued weather request. Increases monotonically per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// What triggered a weather request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Follow-up to the location lookup on mount.
    Location,
    Search,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the location provider.
    Locating,
    Loading {
        request: RequestId,
        origin: FetchOrigin,
    },
    Failed(String),
}

/// The single thing the screen shows in its main area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Ready(&'a WeatherReading),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    pub phase: Phase,

    /// Last successful reading. Kept while an error is shown.
    pub reading: Option<WeatherReading>,

    pub search: String,

    /// Known once the location lookup succeeded. Used by refresh.
    pub coordinates: Option<Coordinates>,

    pub overlap: OverlapPolicy,

    /// Spinner frame counter.
    pub tick_count: u32,

    next_request: u64,
    latest_request: Option<RequestId>,
}

impl ScreenState {
    pub fn new(overlap: OverlapPolicy) -> Self {
        Self {
            phase: Phase::Idle,
            reading: None,
            search: String::new(),
            coordinates: None,
            overlap,
            tick_count: 0,
            next_request: 1,
            latest_request: None,
        }
    }

    pub fn view(&self) -> View<'_> {
        match &self.phase {
            Phase::Locating | Phase::Loading { .. } => View::Loading,
            Phase::Failed(message) => View::Error(message.as_str()),
            Phase::Idle => match &self.reading {
                Some(reading) => View::Ready(reading),
                None => View::Empty,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Locating | Phase::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// Reset for a fresh mount. The overlap policy and the request counter
    /// survive, so ids issued before the reset never match later ones.
    pub(crate) fn remount(&mut self) {
        let next_request = self.next_request;
        *self = Self::new(self.overlap);
        self.next_request = next_request;
    }

    /// Allocate the next request id and remember it as the latest issued.
    pub(crate) fn issue_request(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        self.latest_request = Some(id);
        id
    }

    /// Whether a result for `request` may update the screen.
    pub(crate) fn accepts(&self, request: RequestId) -> bool {
        match self.overlap {
            OverlapPolicy::LatestIssued => self.latest_request == Some(request),
            OverlapPolicy::LastResolved => true,
        }
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(OverlapPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> WeatherReading {
        WeatherReading {
            place: "Paris".into(),
            temperature_c: 14.0,
            condition: "broken clouds".into(),
            observed_at: None,
        }
    }

    #[test]
    fn view_is_exclusive() {
        let mut state = ScreenState::default();
        assert_eq!(state.view(), View::Empty);

        state.reading = Some(reading());
        assert_eq!(state.view(), View::Ready(&reading()));

        state.phase = Phase::Failed("boom".into());
        assert_eq!(state.view(), View::Error("boom"));
        assert!(state.reading.is_some());

        state.phase = Phase::Locating;
        assert_eq!(state.view(), View::Loading);
        assert!(state.error().is_none());
    }

    #[test]
    fn request_ids_increase() {
        let mut state = ScreenState::default();
        let first = state.issue_request();
        let second = state.issue_request();

        assert!(second > first);
        assert_eq!(state.latest_request(), Some(second));
    }

    #[test]
    fn remount_keeps_request_counter() {
        let mut state = ScreenState::new(OverlapPolicy::LastResolved);
        let before = state.issue_request();
        state.search = "Paris".into();

        state.remount();

        assert_eq!(state.search, "");
        assert_eq!(state.latest_request(), None);
        assert_eq!(state.overlap, OverlapPolicy::LastResolved);
        assert!(state.issue_request() > before);
    }

    #[test]
    fn accepts_depends_on_overlap_policy() {
        let mut latest = ScreenState::new(OverlapPolicy::LatestIssued);
        let old = latest.issue_request();
        let new = latest.issue_request();
        assert!(!latest.accepts(old));
        assert!(latest.accepts(new));

        let mut last = ScreenState::new(OverlapPolicy::LastResolved);
        let old = last.issue_request();
        let _new = last.issue_request();
        assert!(last.accepts(old));
    }
}
