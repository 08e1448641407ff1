use saga_rules::{DharmicAxis, Gana, Nakshatra, StateSnapshot};
use tracing::debug;

use super::Condition;

/// Why a predicate could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("unknown gana: {0}")]
    UnknownGana(String),

    #[error("unknown dharmic axis: {0}")]
    UnknownAxis(String),

    #[error("'{0}' needs at least one entry")]
    EmptyList(&'static str),
}

impl Condition {
    /// Evaluate, failing closed: a malformed predicate is simply not met.
    pub fn evaluate(&self, snapshot: &StateSnapshot) -> bool {
        match self.try_evaluate(snapshot) {
            Ok(result) => result,
            Err(err) => {
                debug!(error = %err, "condition failed closed");
                false
            }
        }
    }

    /// Evaluate, reporting malformed predicates as errors.
    pub fn try_evaluate(&self, snapshot: &StateSnapshot) -> Result<bool, ConditionError> {
        let result = match self {
            Condition::ArchetypeIs { archetype } => {
                let wanted = Nakshatra::from_name(archetype)
                    .ok_or_else(|| ConditionError::UnknownArchetype(archetype.clone()))?;
                snapshot.profile.nakshatra == wanted
            }
            Condition::GanaIs { gana } => {
                let wanted = parse_gana(gana)?;
                snapshot.profile.gana == wanted
            }
            Condition::FlagEquals { flag, value } => snapshot
                .world
                .get(flag)
                .is_some_and(|current| current.loosely_equals(value)),
            Condition::FlagSet { flag } => snapshot.world.is_set(flag),
            Condition::AllFlags { flags } => {
                if flags.is_empty() {
                    return Err(ConditionError::EmptyList("all_flags"));
                }
                flags.iter().all(|flag| snapshot.world.is_set(flag))
            }
            Condition::HasItem { item } => snapshot.has_item(item),
            Condition::KarmaAtLeast { value } => snapshot.progress.karma >= *value,
            Condition::AxisAtLeast { axis, value } => {
                let axis = DharmicAxis::from_name(axis)
                    .ok_or_else(|| ConditionError::UnknownAxis(axis.clone()))?;
                snapshot.progress.dharmic_profile.get(axis) >= *value
            }
            Condition::StateEquals { key, value } => snapshot
                .get(key)
                .is_some_and(|current| current.loosely_equals(value)),
            Condition::ActAtLeast { act } => snapshot.progress.current_act >= *act,
            Condition::InventoryAtLeast { count } => snapshot.progress.inventory.len() >= *count,
            Condition::PuzzlesSolvedAtLeast { count } => {
                snapshot.progress.progression.puzzles_solved >= *count
            }
            Condition::All { conditions } => {
                if conditions.is_empty() {
                    return Err(ConditionError::EmptyList("all"));
                }
                // Every branch is checked so a malformed one is never masked.
                let mut met = true;
                for condition in conditions {
                    met &= condition.try_evaluate(snapshot)?;
                }
                met
            }
            Condition::Any { conditions } => {
                if conditions.is_empty() {
                    return Err(ConditionError::EmptyList("any"));
                }
                let mut met = false;
                for condition in conditions {
                    met |= condition.try_evaluate(snapshot)?;
                }
                met
            }
            Condition::Not { condition } => !condition.try_evaluate(snapshot)?,
        };
        Ok(result)
    }
}

/// Evaluate an optional gate. No condition means the gate is open.
pub fn passes(condition: Option<&Condition>, snapshot: &StateSnapshot) -> bool {
    condition.map_or(true, |condition| condition.evaluate(snapshot))
}

fn parse_gana(name: &str) -> Result<Gana, ConditionError> {
    [Gana::Deva, Gana::Manushya, Gana::Rakshasa]
        .into_iter()
        .find(|gana| gana.as_str().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConditionError::UnknownGana(name.to_string()))
}
