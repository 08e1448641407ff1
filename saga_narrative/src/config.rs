//! Engine configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use saga_rules::DEFAULT_START_SCENE;

use crate::error::NarrativeError;

/// XP and level tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Ascending XP thresholds. The player's level is the number of
    /// thresholds at or below their XP.
    pub level_thresholds: Vec<u32>,

    /// XP awarded for each puzzle solved.
    pub xp_per_puzzle: u32,

    /// XP awarded for a choice whose effects change karma.
    pub xp_per_karmic_choice: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_thresholds: vec![0, 100, 250, 450, 700, 1000, 1400, 1900, 2500, 3200],
            xp_per_puzzle: 10,
            xp_per_karmic_choice: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// Start every quest of the current act on session start and act change.
    pub auto_start: bool,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub start_act: u32,
    pub start_scene: String,
    pub progression: ProgressionConfig,
    pub quests: QuestConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_act: 1,
            start_scene: DEFAULT_START_SCENE.to_string(),
            progression: ProgressionConfig::default(),
            quests: QuestConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, NarrativeError> {
        let config: Self = toml::from_str(text).map_err(|e| NarrativeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NarrativeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| NarrativeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), NarrativeError> {
        if self.start_act == 0 {
            return Err(NarrativeError::Config("start_act must be at least 1".into()));
        }
        if self.start_scene.is_empty() {
            return Err(NarrativeError::Config("start_scene must not be empty".into()));
        }
        let thresholds = &self.progression.level_thresholds;
        if thresholds.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(NarrativeError::Config(
                "progression.level_thresholds must be ascending".into(),
            ));
        }
        Ok(())
    }
}
