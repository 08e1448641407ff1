//! Story data - per-act scene tables and the graph that holds them.
//!
//! Acts are authored as JSON objects keyed by scene ID. Loading fills in scene
//! IDs, assigns positional IDs to options and solutions that lack one, and
//! rejects scenes that declare the same ID twice.

mod puzzle;
mod scene;

pub use puzzle::*;
pub use scene::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::error::NarrativeError;

/// The scene table of one act.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActData {
    scenes: HashMap<String, Scene>,
}

impl ActData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an act from its JSON scene table.
    pub fn from_json_str(act: u32, json: &str) -> Result<Self, NarrativeError> {
        let mut data: ActData = serde_json::from_str(json)
            .map_err(|source| NarrativeError::StoryFormat { act, source })?;
        data.normalize()?;
        Ok(data)
    }

    /// Add a scene, normalizing its IDs.
    pub fn insert_scene(&mut self, mut scene: Scene) -> Result<(), NarrativeError> {
        assign_ids(&mut scene)?;
        self.scenes.insert(scene.id.clone(), scene);
        Ok(())
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    fn normalize(&mut self) -> Result<(), NarrativeError> {
        for (id, scene) in self.scenes.iter_mut() {
            scene.id = id.clone();
            assign_ids(scene)?;
        }
        Ok(())
    }
}

fn assign_ids(scene: &mut Scene) -> Result<(), NarrativeError> {
    for (index, choice) in scene.choices.iter_mut().enumerate() {
        if choice.id.is_empty() {
            choice.id = format!("choice-{index}");
        }
    }
    for (index, interaction) in scene.interactions.iter_mut().enumerate() {
        if interaction.id.is_empty() {
            interaction.id = format!("interaction-{index}");
        }
    }

    let mut seen = HashSet::new();
    for option in scene.options() {
        if !seen.insert(option.id()) {
            return Err(NarrativeError::DuplicateOption {
                scene: scene.id.clone(),
                option: option.id().to_string(),
            });
        }
    }

    if let Some(puzzle) = scene.puzzle.as_mut() {
        for (index, solution) in puzzle.solutions.iter_mut().enumerate() {
            if solution.id.is_empty() {
                solution.id = format!("solution-{index}");
            }
        }
        let mut seen = HashSet::new();
        for solution in &puzzle.solutions {
            if !seen.insert(solution.id.as_str()) {
                return Err(NarrativeError::DuplicateOption {
                    scene: scene.id.clone(),
                    option: solution.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// A problem found by [`StoryGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationIssue {
    pub act: u32,
    pub scene: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueKind {
    /// A reference to a scene that does not exist in the target act.
    DanglingScene { target_act: u32, target: String },
    /// A transition into an act that is not loaded.
    UnknownAct(u32),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::DanglingScene { target_act, target } => write!(
                f,
                "act {} scene '{}' points at missing scene '{}' in act {}",
                self.act, self.scene, target, target_act
            ),
            IssueKind::UnknownAct(target_act) => write!(
                f,
                "act {} scene '{}' transitions to unloaded act {}",
                self.act, self.scene, target_act
            ),
        }
    }
}

/// All loaded acts. Read-only once play starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryGraph {
    acts: BTreeMap<u32, ActData>,
}

impl StoryGraph {
    /// Create an empty story graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph holding a single act.
    pub fn from_json_str(act: u32, json: &str) -> Result<Self, NarrativeError> {
        let mut graph = Self::new();
        graph.insert_act(act, json)?;
        Ok(graph)
    }

    /// Parse and add an act, replacing any act with the same number.
    pub fn insert_act(&mut self, act: u32, json: &str) -> Result<(), NarrativeError> {
        let data = ActData::from_json_str(act, json)?;
        self.insert_act_data(act, data);
        Ok(())
    }

    pub fn insert_act_data(&mut self, act: u32, data: ActData) {
        debug!(act, scenes = data.len(), "act loaded");
        self.acts.insert(act, data);
    }

    pub fn act(&self, act: u32) -> Option<&ActData> {
        self.acts.get(&act)
    }

    /// Act numbers in ascending order.
    pub fn acts(&self) -> impl Iterator<Item = u32> + '_ {
        self.acts.keys().copied()
    }

    /// Look up a scene, distinguishing a missing act from a missing scene.
    pub fn scene(&self, act: u32, id: &str) -> Result<&Scene, NarrativeError> {
        let data = self.act(act).ok_or(NarrativeError::ActNotFound(act))?;
        data.scene(id).ok_or_else(|| NarrativeError::SceneNotFound {
            act,
            scene: id.to_string(),
        })
    }

    /// Report dangling scene references and transitions into unloaded acts.
    ///
    /// This is an authoring lint; loading never fails because of it.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (&act, data) in &self.acts {
            for scene in data.scenes() {
                let mut check = |target_act: u32, target: &str| {
                    let kind = match self.act(target_act) {
                        None => IssueKind::UnknownAct(target_act),
                        Some(target_data) if !target_data.contains(target) => {
                            IssueKind::DanglingScene {
                                target_act,
                                target: target.to_string(),
                            }
                        }
                        Some(_) => return,
                    };
                    issues.push(ValidationIssue {
                        act,
                        scene: scene.id.clone(),
                        kind,
                    });
                };

                for choice in &scene.choices {
                    let target_act = choice.transition_to_act.unwrap_or(act);
                    match &choice.next_scene {
                        Some(next) => check(target_act, next),
                        // An act change without a scene keeps the scene ID.
                        None if target_act != act => check(target_act, &scene.id),
                        None => {}
                    }
                }
                for interaction in &scene.interactions {
                    check(act, &interaction.scene);
                }
                if let Some(puzzle) = &scene.puzzle {
                    for solution in &puzzle.solutions {
                        if let Some(next) = &solution.success_scene {
                            check(act, next);
                        }
                    }
                    if let Some(next) = &puzzle.default_failure.next_scene {
                        check(act, next);
                    }
                }
            }
        }
        issues.sort();
        issues.dedup();
        issues
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_assigns_ids() {
        let graph = fixtures::story();
        let square = graph.scene(1, "DHARMAPURA_SQUARE").unwrap();
        assert_eq!(square.id, "DHARMAPURA_SQUARE");
        assert_eq!(square.interactions[0].id, "interaction-0");
        assert_eq!(square.interactions[4].id, "interaction-4");

        let banyan = graph.scene(1, "EXAMINE_BANYAN").unwrap();
        assert_eq!(banyan.choices[0].id, "choice-0");

        let cave = graph.scene(1, "CORRUPTED_CAVE").unwrap();
        let puzzle = cave.puzzle.as_ref().unwrap();
        assert_eq!(puzzle.solutions[0].id, "solution-0");
    }

    #[test]
    fn test_missing_act_and_scene_are_distinct() {
        let graph = fixtures::story();
        assert!(matches!(graph.scene(9, "JOURNEY_START"), Err(NarrativeError::ActNotFound(9))));
        assert!(matches!(
            graph.scene(1, "NOWHERE"),
            Err(NarrativeError::SceneNotFound { act: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_option_ids_are_rejected() {
        let json = r#"{
            "HUB": {
                "title": "Hub",
                "choices": [
                    { "id": "go", "text": "Go.", "nextScene": "HUB" },
                    { "id": "go", "text": "Go again.", "nextScene": "HUB" }
                ]
            }
        }"#;
        let err = StoryGraph::from_json_str(1, json).unwrap_err();
        assert!(matches!(err, NarrativeError::DuplicateOption { option, .. } if option == "go"));
    }

    #[test]
    fn test_authored_id_can_collide_with_positional_id() {
        let json = r#"{
            "HUB": {
                "title": "Hub",
                "choices": [
                    { "text": "First.", "nextScene": "HUB" },
                    { "id": "choice-0", "text": "Second.", "nextScene": "HUB" }
                ]
            }
        }"#;
        assert!(StoryGraph::from_json_str(1, json).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = StoryGraph::from_json_str(3, "{ \"HUB\": 7 }").unwrap_err();
        assert!(matches!(err, NarrativeError::StoryFormat { act: 3, .. }));
    }

    #[test]
    fn test_fixture_story_is_consistent() {
        let issues = fixtures::story().validate();
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let json = r#"{
            "START": {
                "title": "Start",
                "interactions": [ { "verb": "Open", "noun": "Door", "scene": "ROOM" } ],
                "choices": [
                    { "text": "Ascend.", "nextScene": "SVARGA", "transitionToAct": 2 }
                ]
            }
        }"#;
        let graph = StoryGraph::from_json_str(1, json).unwrap();
        let issues = graph.validate();

        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&ValidationIssue {
            act: 1,
            scene: "START".into(),
            kind: IssueKind::DanglingScene {
                target_act: 1,
                target: "ROOM".into()
            },
        }));
        assert!(issues
            .iter()
            .any(|issue| issue.kind == IssueKind::UnknownAct(2)));
        assert!(issues[0].to_string().contains("START"));
    }
}
