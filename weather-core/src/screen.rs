//! The weather screen as a state machine.
//!
//! ```text
//! Mount -> Locating -> (LocationDidResolve -> Loading -> Idle | Failed)
//!                   -> (LocationDidFail -> Failed)
//! SearchSubmit / Refresh -> Loading -> Idle | Failed
//! ```
//!
//! [`reducer`] owns every state transition and returns [`Effect`]s; the caller
//! runs them with [`perform`] and dispatches the returned action.

pub mod action;
pub mod effect;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use effect::{Effect, perform};
pub use reducer::reducer;
pub use state::{FetchOrigin, Phase, RequestId, ScreenState, View};

/// Result of dispatching an action: whether state changed, plus effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    pub changed: bool,
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }
}

/// Owns the screen state and applies actions through the reducer.
#[derive(Debug, Clone)]
pub struct ScreenStore {
    state: ScreenState,
}

impl ScreenStore {
    pub fn new(state: ScreenState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult<Effect> {
        tracing::debug!(action = %action.summary(), "dispatch");
        reducer(&mut self.state, action)
    }
}
