//! XP thresholds and level lookup.

use serde::{Deserialize, Serialize};

/// A level change observed during an overlay refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub from: u32,
    pub to: u32,
}

/// Ascending XP thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: Vec<u32>,
}

impl LevelTable {
    pub fn new(thresholds: Vec<u32>) -> Self {
        Self { thresholds }
    }

    /// Number of thresholds at or below `xp`, never less than 1.
    pub fn level_for(&self, xp: u32) -> u32 {
        let reached = self.thresholds.iter().take_while(|&&t| t <= xp).count();
        u32::try_from(reached).unwrap_or(u32::MAX).max(1)
    }

    /// XP still needed for the next level, or `None` at the top of the table.
    pub fn xp_to_next_level(&self, xp: u32) -> Option<u32> {
        self.thresholds
            .iter()
            .find(|&&t| t > xp)
            .map(|&next| next - xp)
    }

    pub fn max_level(&self) -> u32 {
        u32::try_from(self.thresholds.len()).unwrap_or(u32::MAX).max(1)
    }
}
