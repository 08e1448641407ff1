//! The player's mutable progress record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{DharmicProfile, Inventory, ProgressionRecord, PuzzleRecord, QuestLog};

/// Scene every new game starts on unless configured otherwise.
pub const DEFAULT_START_SCENE: &str = "JOURNEY_START";

/// Everything about the player that changes during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub current_act: u32,
    pub current_scene_id: String,
    /// Unbounded signed accumulator.
    pub karma: i64,
    pub dharmic_profile: DharmicProfile,
    pub inventory: Inventory,
    #[serde(default)]
    pub progression: ProgressionRecord,
    #[serde(default)]
    pub quests: QuestLog,
    /// Attempt records keyed by puzzle ID.
    #[serde(default)]
    pub puzzles: BTreeMap<String, PuzzleRecord>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::starting_at(1, DEFAULT_START_SCENE)
    }
}

impl PlayerProgress {
    /// Fresh progress positioned on the given act and scene.
    pub fn starting_at(act: u32, scene_id: impl Into<String>) -> Self {
        Self {
            current_act: act,
            current_scene_id: scene_id.into(),
            karma: 0,
            dharmic_profile: DharmicProfile::default(),
            inventory: Inventory::new(),
            progression: ProgressionRecord::default(),
            quests: QuestLog::new(),
            puzzles: BTreeMap::new(),
        }
    }

    /// Attempt record for a puzzle, zeroed if it was never tried.
    pub fn puzzle(&self, puzzle_id: &str) -> PuzzleRecord {
        self.puzzles.get(puzzle_id).copied().unwrap_or_default()
    }

    pub fn puzzle_mut(&mut self, puzzle_id: &str) -> &mut PuzzleRecord {
        self.puzzles.entry(puzzle_id.to_string()).or_default()
    }
}
