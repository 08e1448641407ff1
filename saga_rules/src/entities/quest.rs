//! Quest instances and the player's quest log.

use serde::{Deserialize, Serialize};

use crate::mechanics::Effects;

/// A single objective, completed once its flag is observed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    pub completion_flag: String,
    #[serde(default)]
    pub completed: bool,
}

/// What a quest pays out when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestRewards {
    #[serde(default)]
    pub xp: u32,
    /// Karma, items, and dharmic deltas.
    #[serde(flatten)]
    pub effects: Effects,
}

/// Which signal moved a quest to the completed list.
///
/// The two signals are independent and never reconciled with each other, so
/// the one that fired is kept for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCompletion {
    /// Every objective flag was observed.
    Objectives,
    /// The quest-level completion flag was set.
    Flag,
    /// Both were true on the same scan.
    Both,
}

/// A quest the player has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestInstance {
    pub id: String,
    pub title: String,
    pub description: String,
    pub act: u32,
    pub objectives: Vec<QuestObjective>,
    pub rewards: QuestRewards,
    pub completion_flag: Option<String>,
    /// Percentage of objectives completed, 0-100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub completed_by: Option<QuestCompletion>,
}

impl QuestInstance {
    pub fn objectives_completed(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    pub fn all_objectives_completed(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }

    /// Recompute the progress percentage. Returns true if it changed.
    pub fn refresh_progress(&mut self) -> bool {
        let total = self.objectives.len();
        let progress = if total == 0 {
            100
        } else {
            (self.objectives_completed() * 100 / total) as u8
        };
        let changed = progress != self.progress;
        self.progress = progress;
        changed
    }
}

/// Where a quest currently sits in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

/// Active, completed, and failed quests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestLog {
    pub active: Vec<QuestInstance>,
    pub completed: Vec<QuestInstance>,
    pub failed: Vec<QuestInstance>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a quest in any list.
    pub fn find(&self, id: &str) -> Option<(QuestStatus, &QuestInstance)> {
        let lists = [
            (QuestStatus::Active, &self.active),
            (QuestStatus::Completed, &self.completed),
            (QuestStatus::Failed, &self.failed),
        ];
        lists.into_iter().find_map(|(status, quests)| {
            quests.iter().find(|q| q.id == id).map(|q| (status, q))
        })
    }

    pub fn status(&self, id: &str) -> Option<QuestStatus> {
        self.find(id).map(|(status, _)| status)
    }

    /// True if the quest has ever been started.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Add a quest to the active list unless it was started before.
    pub fn start(&mut self, quest: QuestInstance) -> bool {
        if self.contains(&quest.id) {
            return false;
        }
        self.active.push(quest);
        true
    }

    /// Move an active quest to the completed list.
    pub fn complete(&mut self, id: &str, completed_by: QuestCompletion) -> Option<&QuestInstance> {
        let index = self.active.iter().position(|q| q.id == id)?;
        let mut quest = self.active.remove(index);
        quest.completed_by = Some(completed_by);
        self.completed.push(quest);
        self.completed.last()
    }

    /// Move an active quest to the failed list.
    pub fn fail(&mut self, id: &str) -> Option<&QuestInstance> {
        let index = self.active.iter().position(|q| q.id == id)?;
        let quest = self.active.remove(index);
        self.failed.push(quest);
        self.failed.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str) -> QuestInstance {
        QuestInstance {
            id: id.to_string(),
            title: "Purify the Sacred River".to_string(),
            description: String::new(),
            act: 1,
            objectives: vec![
                QuestObjective {
                    id: "find_source".to_string(),
                    description: String::new(),
                    completion_flag: "pollution_source_found".to_string(),
                    completed: false,
                },
                QuestObjective {
                    id: "gather_herbs".to_string(),
                    description: String::new(),
                    completion_flag: "purification_herbs_collected".to_string(),
                    completed: false,
                },
            ],
            rewards: QuestRewards::default(),
            completion_flag: Some("river_purified".to_string()),
            progress: 0,
            completed_by: None,
        }
    }

    #[test]
    fn test_start_only_once() {
        let mut log = QuestLog::new();
        assert!(log.start(quest("purify_river")));
        assert!(!log.start(quest("purify_river")));

        log.fail("purify_river");
        assert!(!log.start(quest("purify_river")));
        assert_eq!(log.status("purify_river"), Some(QuestStatus::Failed));
    }

    #[test]
    fn test_complete_moves_quest() {
        let mut log = QuestLog::new();
        log.start(quest("purify_river"));

        let done = log.complete("purify_river", QuestCompletion::Flag).unwrap();
        assert_eq!(done.completed_by, Some(QuestCompletion::Flag));
        assert!(log.active.is_empty());
        assert_eq!(log.status("purify_river"), Some(QuestStatus::Completed));
        assert!(log.complete("purify_river", QuestCompletion::Flag).is_none());
    }

    #[test]
    fn test_progress_percentage() {
        let mut q = quest("purify_river");
        assert!(!q.refresh_progress());
        q.objectives[0].completed = true;
        assert!(q.refresh_progress());
        assert_eq!(q.progress, 50);
        assert!(!q.all_objectives_completed());
    }
}
