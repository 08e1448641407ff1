use std::ops::Deref;

use serde::Serialize;

use super::GameState;

/// Read-only copy of a [`GameState`], taken at one instant.
///
/// Derefs to the state for reads; there is no way back to a mutable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    state: GameState,
}

impl StateSnapshot {
    pub(crate) fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

impl Deref for StateSnapshot {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        &self.state
    }
}
