//! Player-facing entity definitions: archetypes, the player profile, and the
//! components that make up a player's progress.

mod components;
mod nakshatra;
mod profile;
mod quest;

pub use components::*;
pub use nakshatra::*;
pub use profile::*;
pub use quest::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a session ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
