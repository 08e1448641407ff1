//! Component records that make up a player's mutable progress.

use serde::{Deserialize, Serialize};

use crate::mechanics::DharmicAxis;

/// The four dharmic accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DharmicProfile {
    pub dharma: i64,
    pub artha: i64,
    pub kama: i64,
    pub moksha: i64,
}

impl DharmicProfile {
    /// Read a single axis.
    pub fn get(&self, axis: DharmicAxis) -> i64 {
        match axis {
            DharmicAxis::Dharma => self.dharma,
            DharmicAxis::Artha => self.artha,
            DharmicAxis::Kama => self.kama,
            DharmicAxis::Moksha => self.moksha,
        }
    }

    /// Overwrite a single axis.
    pub fn set(&mut self, axis: DharmicAxis, value: i64) {
        *self.axis_mut(axis) = value;
    }

    /// Add a signed delta to a single axis.
    pub fn adjust(&mut self, axis: DharmicAxis, delta: i64) {
        *self.axis_mut(axis) += delta;
    }

    /// Smallest value across all four axes.
    pub fn minimum(&self) -> i64 {
        DharmicAxis::ALL
            .iter()
            .map(|axis| self.get(*axis))
            .min()
            .unwrap_or_default()
    }

    fn axis_mut(&mut self, axis: DharmicAxis) -> &mut i64 {
        match axis {
            DharmicAxis::Dharma => &mut self.dharma,
            DharmicAxis::Artha => &mut self.artha,
            DharmicAxis::Kama => &mut self.kama,
            DharmicAxis::Moksha => &mut self.moksha,
        }
    }
}

/// Ordered item names with set semantics: adding a held item is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Returns false if it was already held.
    pub fn add(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item. Returns false if it was not held.
    pub fn remove(&mut self, item: &str) -> bool {
        match self.items.iter().position(|held| held == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|held| held == item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Replace the contents, dropping duplicates while keeping first-seen order.
    pub fn replace<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.clear();
        for item in items {
            self.add(item);
        }
    }
}

/// Experience, level, and lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRecord {
    pub xp: u32,
    pub level: u32,
    pub abilities: Vec<String>,
    pub achievements: Vec<String>,
    pub quests_completed: u32,
    pub puzzles_solved: u32,
    pub choices_made: u32,
    pub karma_gained: i64,
    pub karma_lost: i64,
}

impl Default for ProgressionRecord {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            abilities: Vec::new(),
            achievements: Vec::new(),
            quests_completed: 0,
            puzzles_solved: 0,
            choices_made: 0,
            karma_gained: 0,
            karma_lost: 0,
        }
    }
}

impl ProgressionRecord {
    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }

    /// Grant an ability. Returns false if it was already held.
    pub fn grant_ability(&mut self, ability: impl Into<String>) -> bool {
        let ability = ability.into();
        if self.has_ability(&ability) {
            return false;
        }
        self.abilities.push(ability);
        true
    }

    pub fn has_achievement(&self, achievement: &str) -> bool {
        self.achievements.iter().any(|a| a == achievement)
    }
}

/// Attempt bookkeeping for a single puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub attempts: u32,
    pub solved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dharmic_axis_access() {
        let mut profile = DharmicProfile::default();
        profile.adjust(DharmicAxis::Dharma, 3);
        profile.adjust(DharmicAxis::Dharma, -1);
        profile.set(DharmicAxis::Moksha, 7);

        assert_eq!(profile.get(DharmicAxis::Dharma), 2);
        assert_eq!(profile.moksha, 7);
        assert_eq!(profile.minimum(), 0);
    }

    #[test]
    fn test_inventory_set_semantics() {
        let mut inventory = Inventory::new();
        assert!(inventory.add("Lotus Petal"));
        assert!(!inventory.add("Lotus Petal"));
        assert_eq!(inventory.len(), 1);

        assert!(!inventory.remove("Conch Shell"));
        assert_eq!(inventory.len(), 1);

        assert!(inventory.remove("Lotus Petal"));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_inventory_keeps_insertion_order() {
        let mut inventory = Inventory::new();
        inventory.replace(["Conch", "Lotus", "Conch", "Bell"]);
        let items: Vec<_> = inventory.iter().collect();
        assert_eq!(items, vec!["Conch", "Lotus", "Bell"]);
    }

    #[test]
    fn test_inventory_serializes_as_list() {
        let mut inventory = Inventory::new();
        inventory.add("Lotus Petal");
        assert_eq!(
            serde_json::to_string(&inventory).unwrap(),
            "[\"Lotus Petal\"]"
        );
    }

    #[test]
    fn test_grant_ability_once() {
        let mut record = ProgressionRecord::default();
        assert_eq!(record.level, 1);
        assert!(record.grant_ability("meditation"));
        assert!(!record.grant_ability("meditation"));
        assert_eq!(record.abilities.len(), 1);
    }
}
