//! Applying a resolved option or puzzle outcome to a game state.

use saga_rules::{Effects, GameState, TriggerMap};
use tracing::info;

use crate::error::NarrativeError;
use crate::story::StoryGraph;

/// Everything a single transition may change.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Transition<'a> {
    pub act: Option<u32>,
    pub triggers: Option<&'a TriggerMap>,
    pub effects: Option<&'a Effects>,
    pub next_scene: Option<&'a str>,
}

impl<'a> Transition<'a> {
    /// Plain navigation with no state changes besides the scene pointer.
    pub fn navigate(scene: &'a str) -> Self {
        Self {
            next_scene: Some(scene),
            ..Self::default()
        }
    }
}

/// What a transition actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Applied {
    pub act_changed: bool,
    pub scene_entered: bool,
    pub karma_delta: i64,
}

/// Apply a transition in order: act, world flags, effects, scene.
///
/// Entering a scene also applies that scene's own triggers and effects.
/// Whatever the triggers wrote, the final act and scene pointer must resolve
/// in the graph. The state is left half-written on error, so callers run this on a staged copy
/// and commit only on success.
pub(crate) fn apply(
    graph: &StoryGraph,
    state: &mut GameState,
    transition: Transition<'_>,
) -> Result<Applied, NarrativeError> {
    let karma_before = state.progress.karma;
    let previous_act = state.progress.current_act;

    if let Some(act) = transition.act {
        if graph.act(act).is_none() {
            return Err(NarrativeError::ActNotFound(act));
        }
        state.progress.current_act = act;
    }

    if let Some(triggers) = transition.triggers {
        state.set_many(triggers)?;
    }
    if let Some(effects) = transition.effects {
        state.apply_effects(effects);
    }

    // Triggers may have moved the act, so the next scene is looked up in
    // whatever act the state now points at.
    let scene_entered = match transition.next_scene {
        Some(next) => {
            let scene = graph.scene(state.progress.current_act, next)?;
            state.progress.current_scene_id = scene.id.clone();
            if scene.has_entry_effects() {
                state.set_many(&scene.world_state_triggers)?;
                state.apply_effects(&scene.effects);
            }
            true
        }
        None => false,
    };

    // The pointer a transition leaves behind must name a loaded scene.
    let act = state.progress.current_act;
    graph.scene(act, &state.progress.current_scene_id)?;

    let act_changed = act != previous_act;
    if act_changed {
        info!(from = previous_act, to = act, "act transition");
    }

    Ok(Applied {
        act_changed,
        scene_entered,
        karma_delta: state.progress.karma - karma_before,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::fixtures;

    #[test]
    fn test_scene_entry_effects() {
        let graph = fixtures::story();
        let mut state = GameState::new_game("Ashwini").unwrap();

        let applied = apply(&graph, &mut state, Transition::navigate("PURIFY_CRYSTAL_SUCCESS")).unwrap();

        assert!(applied.scene_entered);
        assert_eq!(applied.karma_delta, 20);
        assert!(state.world.river_purified());
        assert_eq!(state.progress.current_scene_id, "PURIFY_CRYSTAL_SUCCESS");
    }

    #[test]
    fn test_act_transition_validates_target() {
        let graph = fixtures::story();
        let mut state = GameState::new_game("Ashwini").unwrap();

        let err = apply(
            &graph,
            &mut state,
            Transition {
                act: Some(7),
                next_scene: Some("JOURNEY_TO_SVARGA"),
                ..Transition::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, NarrativeError::ActNotFound(7)));

        let mut state = GameState::new_game("Ashwini").unwrap();
        let err = apply(
            &graph,
            &mut state,
            Transition {
                act: Some(2),
                ..Transition::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, NarrativeError::SceneNotFound { act: 2, .. }));
    }

    #[test]
    fn test_no_next_scene_stays_put() {
        let graph = fixtures::story();
        let mut state = GameState::new_game("Ashwini").unwrap();
        let effects = Effects::new().with_karma(-2);

        let applied = apply(
            &graph,
            &mut state,
            Transition {
                effects: Some(&effects),
                ..Transition::default()
            },
        )
        .unwrap();

        assert!(!applied.scene_entered);
        assert_eq!(applied.karma_delta, -2);
        assert_eq!(state.progress.current_scene_id, "JOURNEY_START");
    }
}
