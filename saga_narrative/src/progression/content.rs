//! Quest templates and achievement definitions, loaded from TOML.

use saga_rules::{QuestInstance, QuestObjective, QuestRewards};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::NarrativeError;

const BUILTIN_CONTENT: &str = include_str!("../../content/progression.toml");

/// An objective as authored, before the quest is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    pub id: String,
    pub description: String,
    /// World flag that completes the objective.
    pub flag: String,
}

/// A quest as authored. Instantiated into the player's log when started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub act: u32,
    #[serde(default)]
    pub completion_flag: Option<String>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveTemplate>,
    #[serde(default)]
    pub rewards: QuestRewards,
}

impl QuestTemplate {
    /// A fresh quest instance with no objective completed.
    pub fn instantiate(&self) -> QuestInstance {
        QuestInstance {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            act: self.act,
            objectives: self
                .objectives
                .iter()
                .map(|objective| QuestObjective {
                    id: objective.id.clone(),
                    description: objective.description.clone(),
                    completion_flag: objective.flag.clone(),
                    completed: false,
                })
                .collect(),
            rewards: self.rewards.clone(),
            completion_flag: self.completion_flag.clone(),
            progress: 0,
            completed_by: None,
        }
    }
}

/// A permanent accomplishment, earned once when its condition first holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub condition: Condition,
    #[serde(default)]
    pub xp: u32,
    /// Ability granted alongside the achievement.
    #[serde(default)]
    pub ability: Option<String>,
}

/// Everything the progression overlay tracks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressionContent {
    #[serde(default)]
    pub quests: Vec<QuestTemplate>,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

impl ProgressionContent {
    pub fn from_toml_str(text: &str) -> Result<Self, NarrativeError> {
        toml::from_str(text).map_err(|e| NarrativeError::Config(e.to_string()))
    }

    /// The quests and achievements that ship with the game.
    pub fn builtin() -> Result<Self, NarrativeError> {
        Self::from_toml_str(BUILTIN_CONTENT)
    }

    pub fn quest(&self, id: &str) -> Option<&QuestTemplate> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    pub fn quests_for_act(&self, act: u32) -> impl Iterator<Item = &QuestTemplate> {
        self.quests.iter().filter(move |quest| quest.act == act)
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.iter().find(|achievement| achievement.id == id)
    }
}
