//! Condition Evaluator - gating predicates over a state snapshot.
//!
//! Predicates are plain data: a small tagged expression language authored in
//! story files and progression content. They are evaluated against a
//! [`StateSnapshot`](saga_rules::StateSnapshot), never a live state, so they
//! cannot mutate anything.

mod evaluator;

pub use evaluator::*;

use saga_rules::FlagValue;
use serde::{Deserialize, Serialize};

/// A gating predicate.
///
/// Authored as JSON or TOML objects tagged by `type`, for example
/// `{ "type": "archetype_is", "archetype": "Ashwini" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// The player's Nakshatra, by display name.
    ArchetypeIs { archetype: String },

    /// The player's Gana group.
    GanaIs { gana: String },

    /// A world flag loosely equals a value. Unset flags never match.
    FlagEquals { flag: String, value: FlagValue },

    /// A world flag is present and truthy.
    FlagSet { flag: String },

    /// Every listed world flag is present and truthy.
    AllFlags { flags: Vec<String> },

    /// The inventory holds an item.
    HasItem { item: String },

    KarmaAtLeast { value: i64 },

    /// A dharmic axis is at or above a value.
    AxisAtLeast { axis: String, value: i64 },

    /// Any state key, addressed the way `GameState::get` addresses it.
    StateEquals { key: String, value: FlagValue },

    ActAtLeast { act: u32 },

    InventoryAtLeast { count: usize },

    PuzzlesSolvedAtLeast { count: u32 },

    All { conditions: Vec<Condition> },

    Any { conditions: Vec<Condition> },

    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn archetype(name: impl Into<String>) -> Self {
        Condition::ArchetypeIs {
            archetype: name.into(),
        }
    }

    pub fn gana(name: impl Into<String>) -> Self {
        Condition::GanaIs { gana: name.into() }
    }

    pub fn flag_set(flag: impl Into<String>) -> Self {
        Condition::FlagSet { flag: flag.into() }
    }

    pub fn flag_equals(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Condition::FlagEquals {
            flag: flag.into(),
            value: value.into(),
        }
    }

    pub fn all_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::AllFlags {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_item(item: impl Into<String>) -> Self {
        Condition::HasItem { item: item.into() }
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All { conditions }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Any { conditions }
    }

    pub fn negated(self) -> Self {
        Condition::Not {
            condition: Box::new(self),
        }
    }
}
