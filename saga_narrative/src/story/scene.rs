//! Scene records and the options they offer.

use saga_rules::{Effects, FlagValue, StateSnapshot, TriggerMap};
use serde::{Deserialize, Serialize};

use super::Puzzle;
use crate::condition::{passes, Condition};

/// A choice attached to a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Authored ID, or `choice-<n>` assigned at load time.
    #[serde(default)]
    pub id: String,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Inventory gate, checked after `condition`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_item: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scene: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_to_act: Option<u32>,

    #[serde(default, skip_serializing_if = "TriggerMap::is_empty")]
    pub world_state_triggers: TriggerMap,

    #[serde(default, skip_serializing_if = "Effects::is_empty")]
    pub effects: Effects,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            text: text.into(),
            condition: None,
            requires_item: None,
            next_scene: None,
            transition_to_act: None,
            world_state_triggers: TriggerMap::new(),
            effects: Effects::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_next_scene(mut self, scene: impl Into<String>) -> Self {
        self.next_scene = Some(scene.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_trigger(mut self, flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.world_state_triggers.insert(flag.into(), value.into());
        self
    }

    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    pub fn is_available(&self, snapshot: &StateSnapshot) -> bool {
        passes(self.condition.as_ref(), snapshot)
            && self
                .requires_item
                .as_deref()
                .map_or(true, |item| snapshot.has_item(item))
    }
}

/// An explorable sub-topic. Navigation only, no effects of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Authored ID, or `interaction-<n>` assigned at load time.
    #[serde(default)]
    pub id: String,
    pub verb: String,
    pub noun: String,
    /// Scene this interaction leads to.
    pub scene: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Interaction {
    /// Display text, e.g. "Examine Banyan Tree".
    pub fn label(&self) -> String {
        format!("{} {}", self.verb, self.noun)
    }

    pub fn is_available(&self, snapshot: &StateSnapshot) -> bool {
        passes(self.condition.as_ref(), snapshot)
    }
}

/// Whether an option came from the choice list or the interaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Choice,
    Interaction,
}

/// A borrowed view over either kind of option.
#[derive(Debug, Clone, Copy)]
pub enum SceneOption<'a> {
    Choice(&'a Choice),
    Interaction(&'a Interaction),
}

impl<'a> SceneOption<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            SceneOption::Choice(choice) => &choice.id,
            SceneOption::Interaction(interaction) => &interaction.id,
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            SceneOption::Choice(_) => OptionKind::Choice,
            SceneOption::Interaction(_) => OptionKind::Interaction,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SceneOption::Choice(choice) => choice.text.clone(),
            SceneOption::Interaction(interaction) => interaction.label(),
        }
    }

    pub fn next_scene(&self) -> Option<&'a str> {
        match self {
            SceneOption::Choice(choice) => choice.next_scene.as_deref(),
            SceneOption::Interaction(interaction) => Some(&interaction.scene),
        }
    }

    pub fn is_available(&self, snapshot: &StateSnapshot) -> bool {
        match self {
            SceneOption::Choice(choice) => choice.is_available(snapshot),
            SceneOption::Interaction(interaction) => interaction.is_available(snapshot),
        }
    }
}

/// A node in an act's story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Key of this scene in its act table, filled in at load time.
    #[serde(default, skip_serializing)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<Interaction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<Puzzle>,

    /// Flags written whenever the scene is entered.
    #[serde(default, skip_serializing_if = "TriggerMap::is_empty")]
    pub world_state_triggers: TriggerMap,

    /// Effects applied whenever the scene is entered.
    #[serde(default, skip_serializing_if = "Effects::is_empty")]
    pub effects: Effects,
}

impl Scene {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: String::new(),
            quest_status: None,
            interactions: Vec::new(),
            choices: Vec::new(),
            puzzle: None,
            world_state_triggers: TriggerMap::new(),
            effects: Effects::default(),
        }
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_puzzle(mut self, puzzle: Puzzle) -> Self {
        self.puzzle = Some(puzzle);
        self
    }

    /// Every option in display order: choices first, then interactions.
    pub fn options(&self) -> impl Iterator<Item = SceneOption<'_>> {
        self.choices
            .iter()
            .map(SceneOption::Choice)
            .chain(self.interactions.iter().map(SceneOption::Interaction))
    }

    /// Find an option by ID, regardless of whether it is available.
    pub fn option(&self, id: &str) -> Option<SceneOption<'_>> {
        self.options().find(|option| option.id() == id)
    }

    /// True if entering the scene changes state.
    pub fn has_entry_effects(&self) -> bool {
        !self.world_state_triggers.is_empty() || !self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saga_rules::GameState;

    #[test]
    fn test_choice_parsing_ignores_unknown_effects() {
        let choice: Choice = serde_json::from_str(
            r#"{
                "text": "Return to Dharmapura a hero.",
                "nextScene": "QUEST_3_START",
                "effects": { "karma": 20, "gunas": { "sattva": 10 } }
            }"#,
        )
        .unwrap();

        assert!(choice.id.is_empty());
        assert_eq!(choice.next_scene.as_deref(), Some("QUEST_3_START"));
        assert_eq!(choice.effects.karma, Some(20));
        assert!(choice.world_state_triggers.is_empty());
    }

    #[test]
    fn test_choice_gates() {
        let mut state = GameState::new_game("Ashwini").unwrap();
        let choice = Choice {
            requires_item: Some("Lotus Petal".into()),
            ..Choice::new("Offer the petal.").with_condition(Condition::archetype("Ashwini"))
        };

        assert!(!choice.is_available(&state.snapshot()));
        state.add_item("Lotus Petal");
        assert!(choice.is_available(&state.snapshot()));
    }

    #[test]
    fn test_options_keep_authored_order() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "title": "Blighted Riverbank",
                "interactions": [
                    { "id": "water", "verb": "Examine", "noun": "Water", "scene": "EXAMINE_WATER" },
                    { "id": "upstream", "verb": "Follow", "noun": "River Upstream", "scene": "FOLLOW_UPSTREAM" }
                ],
                "choices": [
                    { "id": "leave", "text": "Leave.", "nextScene": "DHARMAPURA_SQUARE" }
                ]
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = scene.options().map(|o| o.id().to_string()).collect();
        assert_eq!(ids, ["leave", "water", "upstream"]);

        let upstream = scene.option("upstream").unwrap();
        assert_eq!(upstream.kind(), OptionKind::Interaction);
        assert_eq!(upstream.label(), "Follow River Upstream");
        assert_eq!(upstream.next_scene(), Some("FOLLOW_UPSTREAM"));
    }
}
