//! Progression/Quest Overlay - XP and levels, achievements, and quest
//! objective tracking layered over the state container.
//!
//! The overlay only reads the world and records status. It grants rewards
//! through the same mutation primitives choices use, and it never moves the
//! scene pointer.

mod content;
mod levels;

pub use content::*;
pub use levels::*;

use saga_rules::{GameState, QuestCompletion, QuestStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProgressionConfig;
use crate::error::NarrativeError;

/// An objective observed complete during a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub quest: String,
    pub objective: String,
}

/// Everything one refresh changed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlayReport {
    pub objectives_completed: Vec<ObjectiveProgress>,
    pub quests_completed: Vec<String>,
    pub achievements_earned: Vec<String>,
    pub level_change: Option<LevelChange>,
}

impl OverlayReport {
    pub fn is_empty(&self) -> bool {
        self.objectives_completed.is_empty()
            && self.quests_completed.is_empty()
            && self.achievements_earned.is_empty()
            && self.level_change.is_none()
    }
}

/// Re-evaluates progression after each state mutation.
pub struct ProgressionOverlay {
    content: ProgressionContent,
    levels: LevelTable,
    xp_per_karmic_choice: u32,
}

impl ProgressionOverlay {
    pub fn new(content: ProgressionContent, config: &ProgressionConfig) -> Self {
        Self {
            content,
            levels: LevelTable::new(config.level_thresholds.clone()),
            xp_per_karmic_choice: config.xp_per_karmic_choice,
        }
    }

    /// Overlay over the built-in quests and achievements.
    pub fn with_defaults() -> Result<Self, NarrativeError> {
        Ok(Self::new(ProgressionContent::builtin()?, &ProgressionConfig::default()))
    }

    pub fn content(&self) -> &ProgressionContent {
        &self.content
    }

    /// Scan quests, then achievements, then sync the level.
    ///
    /// Achievements are re-checked until none is newly earned, since XP and
    /// rewards from one pass can satisfy another achievement.
    pub fn refresh(&self, state: &mut GameState) -> OverlayReport {
        let mut report = OverlayReport::default();
        let level_before = state.progress.progression.level;

        self.scan_quests(state, &mut report);
        self.scan_achievements(state, &mut report);
        self.sync_level(state);

        let level_after = state.progress.progression.level;
        if level_after != level_before {
            report.level_change = Some(LevelChange {
                from: level_before,
                to: level_after,
            });
        }
        report
    }

    /// Count a resolved choice and reward it if it moved karma.
    pub fn track_choice(&self, state: &mut GameState, karma_delta: i64) {
        let progression = &mut state.progress.progression;
        progression.choices_made += 1;
        if karma_delta > 0 {
            progression.karma_gained += karma_delta;
        } else if karma_delta < 0 {
            progression.karma_lost += karma_delta.saturating_neg();
        }
        if karma_delta != 0 {
            progression.xp = progression.xp.saturating_add(self.xp_per_karmic_choice);
        }
    }

    /// Add XP and bring the level up to date.
    pub fn award_xp(&self, state: &mut GameState, amount: u32) -> Option<LevelChange> {
        let progression = &mut state.progress.progression;
        progression.xp = progression.xp.saturating_add(amount);
        self.sync_level(state)
    }

    pub fn level_for(&self, xp: u32) -> u32 {
        self.levels.level_for(xp)
    }

    pub fn xp_to_next_level(&self, state: &GameState) -> Option<u32> {
        self.levels.xp_to_next_level(state.progress.progression.xp)
    }

    /// Start a quest from its template. Returns false if it was started before.
    pub fn start_quest(&self, state: &mut GameState, quest_id: &str) -> Result<bool, NarrativeError> {
        let template = self
            .content
            .quest(quest_id)
            .ok_or_else(|| NarrativeError::UnknownQuest(quest_id.to_string()))?;

        let started = state.progress.quests.start(template.instantiate());
        if started {
            info!(quest = quest_id, "quest started");
        }
        Ok(started)
    }

    /// Move an active quest to the failed list. Failed quests are never
    /// scanned again.
    pub fn fail_quest(&self, state: &mut GameState, quest_id: &str) -> bool {
        let failed = state.progress.quests.fail(quest_id).is_some();
        if failed {
            info!(quest = quest_id, "quest failed");
        }
        failed
    }

    /// Start every quest of an act that was never started. Returns the IDs
    /// started.
    pub fn auto_start_for_act(&self, state: &mut GameState, act: u32) -> Vec<String> {
        let mut started = Vec::new();
        for template in self.content.quests_for_act(act) {
            if state.progress.quests.start(template.instantiate()) {
                info!(quest = %template.id, act, "quest started");
                started.push(template.id.clone());
            }
        }
        started
    }

    /// Grant the archetype's signature ability.
    pub fn grant_signature_ability(&self, state: &mut GameState) -> bool {
        let ability = state.profile.signature_ability();
        state.progress.progression.grant_ability(ability)
    }

    pub fn abilities<'s>(&self, state: &'s GameState) -> &'s [String] {
        &state.progress.progression.abilities
    }

    pub fn achievements<'s>(&self, state: &'s GameState) -> &'s [String] {
        &state.progress.progression.achievements
    }

    pub fn quest_status(&self, state: &GameState, quest_id: &str) -> Option<QuestStatus> {
        state.progress.quests.status(quest_id)
    }

    fn scan_quests(&self, state: &mut GameState, report: &mut OverlayReport) {
        let mut finished = Vec::new();

        for quest in &mut state.progress.quests.active {
            for objective in quest.objectives.iter_mut().filter(|o| !o.completed) {
                if state.world.is_set(&objective.completion_flag) {
                    objective.completed = true;
                    debug!(quest = %quest.id, objective = %objective.id, "objective completed");
                    report.objectives_completed.push(ObjectiveProgress {
                        quest: quest.id.clone(),
                        objective: objective.id.clone(),
                    });
                }
            }
            quest.refresh_progress();

            // An empty objective list never completes a quest on its own.
            let by_objectives = !quest.objectives.is_empty() && quest.all_objectives_completed();
            let by_flag = quest
                .completion_flag
                .as_deref()
                .is_some_and(|flag| state.world.is_set(flag));

            let completion = match (by_objectives, by_flag) {
                (true, true) => QuestCompletion::Both,
                (true, false) => QuestCompletion::Objectives,
                (false, true) => QuestCompletion::Flag,
                (false, false) => continue,
            };
            finished.push((quest.id.clone(), completion));
        }

        for (quest_id, completion) in finished {
            let Some(quest) = state.progress.quests.complete(&quest_id, completion) else {
                continue;
            };
            let rewards = quest.rewards.clone();

            state.apply_effects(&rewards.effects);
            let progression = &mut state.progress.progression;
            progression.xp = progression.xp.saturating_add(rewards.xp);
            progression.quests_completed += 1;

            info!(quest = %quest_id, completed_by = ?completion, "quest completed");
            report.quests_completed.push(quest_id);
        }
    }

    fn scan_achievements(&self, state: &mut GameState, report: &mut OverlayReport) {
        loop {
            let snapshot = state.snapshot();
            let earned: Vec<&AchievementDef> = self
                .content
                .achievements
                .iter()
                .filter(|a| !state.progress.progression.has_achievement(&a.id))
                .filter(|a| a.condition.evaluate(&snapshot))
                .collect();

            if earned.is_empty() {
                break;
            }

            for achievement in earned {
                let progression = &mut state.progress.progression;
                progression.achievements.push(achievement.id.clone());
                progression.xp = progression.xp.saturating_add(achievement.xp);
                if let Some(ability) = &achievement.ability {
                    progression.grant_ability(ability.as_str());
                }
                info!(achievement = %achievement.id, "achievement earned");
                report.achievements_earned.push(achievement.id.clone());
            }
        }
    }

    fn sync_level(&self, state: &mut GameState) -> Option<LevelChange> {
        let progression = &mut state.progress.progression;
        let level = self.levels.level_for(progression.xp);
        if level == progression.level {
            return None;
        }

        let change = LevelChange {
            from: progression.level,
            to: level,
        };
        progression.level = level;
        info!(from = change.from, to = change.to, xp = progression.xp, "level changed");
        Some(change)
    }
}
