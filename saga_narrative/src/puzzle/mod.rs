//! Puzzle Resolution Engine - evaluates solutions for the puzzle on the
//! current scene and branches to success or failure.
//!
//! Every call to [`PuzzleEngine::solve`] or [`PuzzleEngine::solve_first_match`]
//! counts as one attempt. When a puzzle declares `maxAttempts`, any attempt
//! beyond the bound takes the failure branch no matter which solution was
//! picked.

use saga_rules::GameState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ProgressionConfig;
use crate::error::NarrativeError;
use crate::resolver::transition::{self, Transition};
use crate::resolver::SceneResolver;
use crate::story::{Puzzle, PuzzleSolution, StoryGraph};

/// Which branch an attempt took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleOutcome {
    Solved,
    /// `exhausted` is set when the attempt bound forced the failure.
    Failed { exhausted: bool },
}

impl PuzzleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PuzzleOutcome::Solved)
    }
}

/// The result of one puzzle attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleResult {
    pub puzzle_id: String,
    /// The solution that was tried, if any.
    pub solution_id: Option<String>,
    pub outcome: PuzzleOutcome,
    /// Solution text on success, failure text otherwise.
    pub message: String,
    /// Scene the player is on afterwards.
    pub scene_id: String,
    /// Attempts made so far, including this one.
    pub attempts: u32,
    pub karma_delta: i64,
}

/// Solves puzzles attached to scenes of a story graph.
pub struct PuzzleEngine<'g> {
    graph: &'g StoryGraph,
    xp_per_puzzle: u32,
}

impl<'g> PuzzleEngine<'g> {
    pub fn new(graph: &'g StoryGraph, config: &ProgressionConfig) -> Self {
        Self {
            graph,
            xp_per_puzzle: config.xp_per_puzzle,
        }
    }

    pub fn with_defaults(graph: &'g StoryGraph) -> Self {
        Self::new(graph, &ProgressionConfig::default())
    }

    /// The puzzle on the current scene, if it has one.
    pub fn current_puzzle(&self, state: &GameState) -> Result<Option<&'g Puzzle>, NarrativeError> {
        let scene = SceneResolver::new(self.graph).current_scene(state)?;
        Ok(scene.puzzle.as_ref())
    }

    /// Attempt a specific solution.
    pub fn solve(
        &self,
        state: &mut GameState,
        puzzle_id: &str,
        solution_id: &str,
    ) -> Result<PuzzleResult, NarrativeError> {
        let puzzle = self.locate(state, puzzle_id)?;
        let solution = puzzle.solution(solution_id).ok_or_else(|| {
            warn!(puzzle = puzzle_id, solution = solution_id, "unknown solution");
            NarrativeError::UnknownSolution {
                puzzle: puzzle_id.to_string(),
                solution: solution_id.to_string(),
            }
        })?;
        self.attempt(state, puzzle, Some(solution))
    }

    /// Attempt with the first solution, in authored order, whose gates pass.
    /// If none passes, the failure branch is taken.
    pub fn solve_first_match(
        &self,
        state: &mut GameState,
        puzzle_id: &str,
    ) -> Result<PuzzleResult, NarrativeError> {
        let puzzle = self.locate(state, puzzle_id)?;
        let matched = puzzle.first_match(&state.snapshot());
        self.attempt(state, puzzle, matched)
    }

    pub fn is_solved(&self, state: &GameState, puzzle_id: &str) -> bool {
        state.progress.puzzle(puzzle_id).solved
    }

    pub fn attempts(&self, state: &GameState, puzzle_id: &str) -> u32 {
        state.progress.puzzle(puzzle_id).attempts
    }

    /// The current scene's puzzle, checked against the requested ID.
    fn locate(&self, state: &GameState, puzzle_id: &str) -> Result<&'g Puzzle, NarrativeError> {
        let scene = SceneResolver::new(self.graph).current_scene(state)?;
        let puzzle = scene
            .puzzle
            .as_ref()
            .ok_or_else(|| NarrativeError::NoPuzzle(scene.id.clone()))?;

        if puzzle.puzzle_id != puzzle_id {
            warn!(
                expected = %puzzle.puzzle_id,
                found = puzzle_id,
                "puzzle mismatch"
            );
            return Err(NarrativeError::PuzzleMismatch {
                expected: puzzle.puzzle_id.clone(),
                found: puzzle_id.to_string(),
            });
        }
        Ok(puzzle)
    }

    fn attempt(
        &self,
        state: &mut GameState,
        puzzle: &'g Puzzle,
        tried: Option<&'g PuzzleSolution>,
    ) -> Result<PuzzleResult, NarrativeError> {
        let snapshot = state.snapshot();
        let mut staged = state.clone();

        let record = staged.progress.puzzle_mut(&puzzle.puzzle_id);
        record.attempts += 1;
        let attempts = record.attempts;
        let exhausted = puzzle.is_exhausted(attempts);
        debug!(puzzle = %puzzle.puzzle_id, attempts, exhausted, "puzzle attempt");

        let winner = tried.filter(|solution| !exhausted && solution.is_met(&snapshot));

        let (outcome, message, applied) = match winner {
            Some(solution) => {
                let first_solve = !std::mem::replace(&mut record.solved, true);
                if first_solve {
                    let progression = &mut staged.progress.progression;
                    progression.puzzles_solved += 1;
                    progression.xp = progression.xp.saturating_add(self.xp_per_puzzle);
                }
                let applied = transition::apply(
                    self.graph,
                    &mut staged,
                    Transition {
                        act: None,
                        triggers: Some(&solution.world_state_triggers),
                        effects: Some(&solution.effects),
                        next_scene: solution.success_scene.as_deref(),
                    },
                )?;
                (PuzzleOutcome::Solved, solution.text.clone(), applied)
            }
            None => {
                let failure = &puzzle.default_failure;
                let applied = transition::apply(
                    self.graph,
                    &mut staged,
                    Transition {
                        act: None,
                        triggers: None,
                        effects: Some(&failure.effects),
                        next_scene: failure.next_scene.as_deref(),
                    },
                )?;
                (PuzzleOutcome::Failed { exhausted }, failure.text.clone(), applied)
            }
        };

        *state = staged;
        info!(
            puzzle = %puzzle.puzzle_id,
            solved = outcome.is_success(),
            scene = %state.progress.current_scene_id,
            "puzzle outcome"
        );

        Ok(PuzzleResult {
            puzzle_id: puzzle.puzzle_id.clone(),
            solution_id: tried.map(|solution| solution.id.clone()),
            outcome,
            message,
            scene_id: state.progress.current_scene_id.clone(),
            attempts,
            karma_delta: applied.karma_delta,
        })
    }
}
