//! Puzzle records attached to scenes.

use saga_rules::{Effects, StateSnapshot, TriggerMap};
use serde::{Deserialize, Serialize};

use crate::condition::{passes, Condition};

/// One way of solving a puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSolution {
    /// Authored ID, or `solution-<n>` assigned at load time.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub text: String,

    /// Item that must be in the inventory.
    #[serde(default, alias = "requiresItem", skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_scene: Option<String>,

    #[serde(default, skip_serializing_if = "Effects::is_empty")]
    pub effects: Effects,

    #[serde(default, skip_serializing_if = "TriggerMap::is_empty")]
    pub world_state_triggers: TriggerMap,
}

impl PuzzleSolution {
    /// Both the condition and the item gate pass.
    pub fn is_met(&self, snapshot: &StateSnapshot) -> bool {
        passes(self.condition.as_ref(), snapshot)
            && self
                .item
                .as_deref()
                .map_or(true, |item| snapshot.has_item(item))
    }
}

/// What happens when an attempt does not succeed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFailure {
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Effects::is_empty")]
    pub effects: Effects,

    /// Scene to move to. Without one the player stays and may retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scene: Option<String>,
}

/// A puzzle attached to a single scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub puzzle_id: String,

    #[serde(default)]
    pub description: String,

    /// Attempts allowed before every attempt fails. `None` is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Evaluated in authored order.
    #[serde(default)]
    pub solutions: Vec<PuzzleSolution>,

    #[serde(default)]
    pub default_failure: PuzzleFailure,
}

impl Puzzle {
    pub fn solution(&self, id: &str) -> Option<&PuzzleSolution> {
        self.solutions.iter().find(|solution| solution.id == id)
    }

    /// First solution whose gates pass.
    pub fn first_match(&self, snapshot: &StateSnapshot) -> Option<&PuzzleSolution> {
        self.solutions.iter().find(|solution| solution.is_met(snapshot))
    }

    /// True once `attempt` (1-based) is past the bound.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saga_rules::GameState;

    const BARRIER: &str = r#"{
        "puzzleId": "BarrierOfNegativity",
        "description": "The barrier hums with spiritual despair.",
        "maxAttempts": null,
        "solutions": [
            {
                "item": "Lotus Petal",
                "text": "Use the impossibly fragrant Lotus Petal.",
                "successScene": "PURIFY_CRYSTAL_SUCCESS"
            }
        ],
        "defaultFailure": {
            "text": "The barrier repels you with a wave of sorrow.",
            "effects": { "karma": -2 }
        }
    }"#;

    #[test]
    fn test_parse_barrier() {
        let puzzle: Puzzle = serde_json::from_str(BARRIER).unwrap();
        assert_eq!(puzzle.puzzle_id, "BarrierOfNegativity");
        assert_eq!(puzzle.max_attempts, None);
        assert_eq!(puzzle.solutions[0].item.as_deref(), Some("Lotus Petal"));
        assert_eq!(puzzle.default_failure.effects.karma, Some(-2));
        assert!(puzzle.default_failure.next_scene.is_none());
    }

    #[test]
    fn test_requires_item_alias() {
        let solution: PuzzleSolution =
            serde_json::from_str(r#"{ "requiresItem": "Resonance Bell" }"#).unwrap();
        assert_eq!(solution.item.as_deref(), Some("Resonance Bell"));
    }

    #[test]
    fn test_first_match_follows_authored_order() {
        let mut puzzle: Puzzle = serde_json::from_str(BARRIER).unwrap();
        puzzle.solutions.push(PuzzleSolution {
            id: "karma".into(),
            condition: Some(Condition::KarmaAtLeast { value: 0 }),
            ..serde_json::from_str("{}").unwrap()
        });
        puzzle.solutions[0].id = "lotus".into();

        let mut state = GameState::new_game("Ashwini").unwrap();
        assert_eq!(puzzle.first_match(&state.snapshot()).unwrap().id, "karma");

        state.add_item("Lotus Petal");
        assert_eq!(puzzle.first_match(&state.snapshot()).unwrap().id, "lotus");
    }

    #[test]
    fn test_attempt_bound() {
        let mut puzzle: Puzzle = serde_json::from_str(BARRIER).unwrap();
        assert!(!puzzle.is_exhausted(1000));

        puzzle.max_attempts = Some(3);
        assert!(!puzzle.is_exhausted(3));
        assert!(puzzle.is_exhausted(4));
    }
}
