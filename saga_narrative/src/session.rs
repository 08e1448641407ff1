//! The game session: one player's state driven through the story graph.
//!
//! A session owns its state container outright. Several sessions can share a
//! story graph through an [`Arc`] and run side by side without touching each
//! other.

use saga_rules::{GameState, PlayerProfile, PlayerProgress, SessionId, StateError, StateSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::NarrativeError;
use crate::progression::{OverlayReport, ProgressionContent, ProgressionOverlay};
use crate::puzzle::{PuzzleEngine, PuzzleResult};
use crate::resolver::{AvailableOption, Resolution, SceneResolver};
use crate::story::{OptionKind, Puzzle, StoryGraph};

/// A puzzle as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleView {
    pub puzzle_id: String,
    pub description: String,
    /// `(id, text)` of each solution, in authored order.
    pub solutions: Vec<(String, String)>,
    pub attempts: u32,
    pub max_attempts: Option<u32>,
    pub solved: bool,
}

impl PuzzleView {
    fn new(puzzle: &Puzzle, state: &GameState) -> Self {
        let record = state.progress.puzzle(&puzzle.puzzle_id);
        Self {
            puzzle_id: puzzle.puzzle_id.clone(),
            description: puzzle.description.clone(),
            solutions: puzzle
                .solutions
                .iter()
                .map(|s| (s.id.clone(), s.text.clone()))
                .collect(),
            attempts: record.attempts,
            max_attempts: puzzle.max_attempts,
            solved: record.solved,
        }
    }
}

/// Read-only view of the current scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneView {
    pub id: String,
    pub act: u32,
    pub title: String,
    pub text: String,
    pub quest_status: Option<String>,
    pub options: Vec<AvailableOption>,
    pub puzzle: Option<PuzzleView>,
}

/// Outcome of selecting an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub resolution: Resolution,
    /// Quests started because the act changed.
    pub quests_started: Vec<String>,
    pub report: OverlayReport,
}

/// Outcome of a puzzle attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleTurn {
    pub result: PuzzleResult,
    pub report: OverlayReport,
}

/// Everything persisted for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub session_id: SessionId,
    pub state: GameState,
}

/// A single play session.
pub struct GameSession {
    id: SessionId,
    story: Arc<StoryGraph>,
    config: EngineConfig,
    overlay: ProgressionOverlay,
    state: GameState,
}

impl GameSession {
    /// Start a new game with the built-in quests and achievements.
    pub fn new(story: Arc<StoryGraph>, config: EngineConfig, nakshatra: &str) -> Result<Self, NarrativeError> {
        Self::with_content(story, config, ProgressionContent::builtin()?, nakshatra)
    }

    /// Start a new game with custom progression content.
    pub fn with_content(
        story: Arc<StoryGraph>,
        config: EngineConfig,
        content: ProgressionContent,
        nakshatra: &str,
    ) -> Result<Self, NarrativeError> {
        config.validate()?;
        story.scene(config.start_act, &config.start_scene)?;

        let mut state = GameState::new(PlayerProfile::from_name(nakshatra)?);
        state.progress = PlayerProgress::starting_at(config.start_act, config.start_scene.clone());

        let overlay = ProgressionOverlay::new(content, &config.progression);
        overlay.grant_signature_ability(&mut state);
        if config.quests.auto_start {
            overlay.auto_start_for_act(&mut state, config.start_act);
        }
        overlay.refresh(&mut state);

        let id = SessionId::new();
        info!(session = %id, nakshatra, scene = %config.start_scene, "session started");

        Ok(Self {
            id,
            story,
            config,
            overlay,
            state,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn story(&self) -> &StoryGraph {
        &self.story
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overlay(&self) -> &ProgressionOverlay {
        &self.overlay
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// The current scene with the options this player can pick.
    pub fn current_scene(&self) -> Result<SceneView, NarrativeError> {
        let resolver = SceneResolver::new(&self.story);
        let scene = resolver.current_scene(&self.state)?;

        Ok(SceneView {
            id: scene.id.clone(),
            act: self.state.progress.current_act,
            title: scene.title.clone(),
            text: scene.text.clone(),
            quest_status: scene.quest_status.clone(),
            options: resolver.available_options(&self.state)?,
            puzzle: scene.puzzle.as_ref().map(|p| PuzzleView::new(p, &self.state)),
        })
    }

    /// Resolve an option on the current scene, then refresh progression.
    pub fn select_option(&mut self, option_id: &str) -> Result<TurnResult, NarrativeError> {
        let resolution = SceneResolver::new(&self.story).resolve(&mut self.state, option_id)?;

        if resolution.kind == OptionKind::Choice {
            self.overlay.track_choice(&mut self.state, resolution.karma_delta);
        }
        let quests_started = if resolution.act_changed && self.config.quests.auto_start {
            self.overlay.auto_start_for_act(&mut self.state, resolution.act)
        } else {
            Vec::new()
        };
        let report = self.overlay.refresh(&mut self.state);

        Ok(TurnResult {
            resolution,
            quests_started,
            report,
        })
    }

    /// Attempt a specific solution of the current scene's puzzle.
    pub fn solve_puzzle(&mut self, puzzle_id: &str, solution_id: &str) -> Result<PuzzleTurn, NarrativeError> {
        let result = PuzzleEngine::new(&self.story, &self.config.progression).solve(
            &mut self.state,
            puzzle_id,
            solution_id,
        )?;
        let report = self.overlay.refresh(&mut self.state);
        Ok(PuzzleTurn { result, report })
    }

    /// Attempt the current scene's puzzle with the first solution that fits.
    pub fn solve_puzzle_first_match(&mut self, puzzle_id: &str) -> Result<PuzzleTurn, NarrativeError> {
        let result = PuzzleEngine::new(&self.story, &self.config.progression)
            .solve_first_match(&mut self.state, puzzle_id)?;
        let report = self.overlay.refresh(&mut self.state);
        Ok(PuzzleTurn { result, report })
    }

    /// Save the whole session as JSON.
    pub fn serialize(&self) -> Result<String, NarrativeError> {
        let save = SaveData {
            session_id: self.id,
            state: self.state.clone(),
        };
        serde_json::to_string(&save).map_err(|e| StateError::from(e).into())
    }

    /// Replace the whole session with a saved one.
    ///
    /// The saved scene must exist in this session's story. On any error the
    /// session is left exactly as it was.
    pub fn deserialize(&mut self, blob: &str) -> Result<(), NarrativeError> {
        let save: SaveData = serde_json::from_str(blob).map_err(StateError::from)?;
        let progress = &save.state.progress;
        self.story.scene(progress.current_act, &progress.current_scene_id)?;

        info!(
            session = %save.session_id,
            scene = %progress.current_scene_id,
            "session restored"
        );
        self.id = save.session_id;
        self.state = save.state;
        Ok(())
    }
}
