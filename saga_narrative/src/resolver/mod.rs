//! Scene Graph Resolver - current scene lookup, option filtering, and
//! resolution of a chosen option into state changes.
//!
//! Resolution works on a staged copy of the game state. The live state is
//! replaced only once every step has succeeded, so a rejected option or a
//! broken reference never leaves a half-applied choice behind.

pub(crate) mod transition;

use saga_rules::GameState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::NarrativeError;
use crate::story::{OptionKind, Scene, SceneOption, StoryGraph};
use transition::Transition;

/// An option the player may pick right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableOption {
    pub id: String,
    pub text: String,
    pub kind: OptionKind,
    pub next_scene: Option<String>,
}

impl From<SceneOption<'_>> for AvailableOption {
    fn from(option: SceneOption<'_>) -> Self {
        Self {
            id: option.id().to_string(),
            text: option.label(),
            kind: option.kind(),
            next_scene: option.next_scene().map(str::to_string),
        }
    }
}

/// The result of resolving an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub option_id: String,
    pub kind: OptionKind,
    pub from_scene: String,
    /// Scene the player is on afterwards.
    pub scene_id: String,
    pub act: u32,
    pub act_changed: bool,
    /// Net karma change, including entry effects of the new scene.
    pub karma_delta: i64,
}

/// Resolves player options against a story graph.
pub struct SceneResolver<'g> {
    graph: &'g StoryGraph,
}

impl<'g> SceneResolver<'g> {
    pub fn new(graph: &'g StoryGraph) -> Self {
        Self { graph }
    }

    /// The scene the player is on.
    ///
    /// A missing act or scene is a data integrity error, not a condition the
    /// player can recover from by choosing again.
    pub fn current_scene(&self, state: &GameState) -> Result<&'g Scene, NarrativeError> {
        let act = state.progress.current_act;
        let scene_id = &state.progress.current_scene_id;
        self.graph.scene(act, scene_id).map_err(|err| {
            warn!(act, scene = %scene_id, error = %err, "current scene lookup failed");
            err
        })
    }

    /// Choices then interactions, in authored order, that pass their gates.
    pub fn available_options(&self, state: &GameState) -> Result<Vec<AvailableOption>, NarrativeError> {
        let scene = self.current_scene(state)?;
        let snapshot = state.snapshot();
        let options = scene
            .options()
            .filter(|option| {
                let available = option.is_available(&snapshot);
                if !available {
                    debug!(scene = %scene.id, option = option.id(), "option hidden");
                }
                available
            })
            .map(AvailableOption::from)
            .collect();
        Ok(options)
    }

    /// Resolve an option by ID.
    ///
    /// Applies, in order: act transition, world-state triggers, effects, and
    /// the scene transition. The option must be available against the state
    /// as it was before any of these steps; hidden or unknown options are
    /// rejected without touching the state.
    pub fn resolve(&self, state: &mut GameState, option_id: &str) -> Result<Resolution, NarrativeError> {
        let scene = self.current_scene(state)?;
        let snapshot = state.snapshot();

        let option = scene
            .option(option_id)
            .filter(|option| option.is_available(&snapshot))
            .ok_or_else(|| {
                warn!(scene = %scene.id, option = option_id, "rejected unavailable option");
                NarrativeError::OptionUnavailable {
                    scene: scene.id.clone(),
                    option: option_id.to_string(),
                }
            })?;

        let step = match option {
            SceneOption::Choice(choice) => Transition {
                act: choice.transition_to_act,
                triggers: Some(&choice.world_state_triggers),
                effects: Some(&choice.effects),
                next_scene: choice.next_scene.as_deref(),
            },
            SceneOption::Interaction(interaction) => Transition::navigate(&interaction.scene),
        };

        let mut staged = state.clone();
        let applied = transition::apply(self.graph, &mut staged, step).map_err(|err| {
            warn!(scene = %scene.id, option = option_id, error = %err, "option could not be applied");
            err
        })?;
        *state = staged;

        info!(
            from = %scene.id,
            to = %state.progress.current_scene_id,
            option = option_id,
            "scene transition"
        );

        Ok(Resolution {
            option_id: option_id.to_string(),
            kind: option.kind(),
            from_scene: scene.id.clone(),
            scene_id: state.progress.current_scene_id.clone(),
            act: state.progress.current_act,
            act_changed: applied.act_changed,
            karma_delta: applied.karma_delta,
        })
    }
}
