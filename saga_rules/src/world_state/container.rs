//! The state container: profile, progress, and world flags behind one set of
//! mutation primitives.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FlagValue, PlayerProgress, StateSnapshot, TriggerMap, WorldState};
use crate::entities::PlayerProfile;
use crate::error::StateError;
use crate::mechanics::{DharmicAxis, Effects};

/// Progress fields addressable by a plain key.
const SCALAR_FIELDS: [&str; 4] = ["currentAct", "currentSceneId", "karma", "inventory"];

/// Progress fields addressable only through a dotted child key.
const RECORD_FIELDS: [&str; 2] = ["dharmicProfile", "progression"];

/// Counters of the progression record, by their dotted child name.
const PROGRESSION_FIELDS: [&str; 7] = [
    "xp",
    "level",
    "questsCompleted",
    "puzzlesSolved",
    "choicesMade",
    "karmaGained",
    "karmaLost",
];

/// How a state key resolves against the progress record.
enum KeyTarget<'a> {
    Scalar(&'a str),
    Axis(DharmicAxis),
    Counter(&'a str),
    Record,
    World,
}

fn classify(key: &str) -> KeyTarget<'_> {
    if SCALAR_FIELDS.contains(&key) {
        return KeyTarget::Scalar(key);
    }
    if RECORD_FIELDS.contains(&key) {
        return KeyTarget::Record;
    }
    match key.split_once('.') {
        Some(("dharmicProfile", child)) => match DharmicAxis::from_name(child) {
            Some(axis) => KeyTarget::Axis(axis),
            None => KeyTarget::World,
        },
        Some(("progression", child)) if PROGRESSION_FIELDS.contains(&child) => {
            KeyTarget::Counter(child)
        }
        // Unknown parents, unknown children of a record, and dotted keys under
        // scalar fields are literal world flags named by the full dotted string.
        _ => KeyTarget::World,
    }
}

/// The complete state of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub profile: PlayerProfile,
    #[serde(rename = "playerState")]
    pub progress: PlayerProgress,
    pub world: WorldState,
}

impl GameState {
    /// Create a new game state for the given profile.
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            profile,
            progress: PlayerProgress::default(),
            world: WorldState::new(),
        }
    }

    /// Create a new game state from a Nakshatra name.
    pub fn new_game(nakshatra: &str) -> Result<Self, StateError> {
        Ok(Self::new(PlayerProfile::from_name(nakshatra)?))
    }

    /// Read a value by key.
    ///
    /// Progress fields are addressed by name (`"karma"`) or dotted path
    /// (`"dharmicProfile.dharma"`). Anything else is looked up in the world
    /// flags under the full key.
    pub fn get(&self, key: &str) -> Option<FlagValue> {
        match classify(key) {
            KeyTarget::Scalar(field) => Some(self.read_scalar(field)),
            KeyTarget::Axis(axis) => Some(FlagValue::Int(self.progress.dharmic_profile.get(axis))),
            KeyTarget::Counter(field) => Some(FlagValue::Int(self.read_counter(field))),
            KeyTarget::Record => None,
            KeyTarget::World => self.world.get(key).cloned(),
        }
    }

    /// Write a value by key, with the same addressing rules as [`GameState::get`].
    ///
    /// `"foo.bar"` lands as the literal world flag `"foo.bar"` because `foo`
    /// is not a progress field. Floats must be finite, since save data has no
    /// way to represent NaN or infinity.
    pub fn set(&mut self, key: &str, value: FlagValue) -> Result<(), StateError> {
        if !value.is_finite() {
            return Err(StateError::TypeMismatch {
                key: key.to_string(),
                expected: "a finite number",
            });
        }
        match classify(key) {
            KeyTarget::Scalar(field) => self.write_scalar(field, value),
            KeyTarget::Axis(axis) => {
                let number = int_for(key, &value)?;
                self.progress.dharmic_profile.set(axis, number);
                Ok(())
            }
            KeyTarget::Counter(field) => self.write_counter(key, field, &value),
            KeyTarget::Record => Err(StateError::TypeMismatch {
                key: key.to_string(),
                expected: "a dotted child key",
            }),
            KeyTarget::World => {
                debug!(key, "world flag set");
                self.world.set(key, value);
                Ok(())
            }
        }
    }

    /// Write a trigger map in authored order, stopping at the first error.
    pub fn set_many(&mut self, triggers: &TriggerMap) -> Result<(), StateError> {
        for (key, value) in triggers.iter() {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    /// Add an item to the inventory. Adding a held item is a no-op.
    pub fn add_item(&mut self, item: &str) -> bool {
        self.progress.inventory.add(item)
    }

    /// Remove an item from the inventory. Removing a missing item is a no-op.
    pub fn remove_item(&mut self, item: &str) -> bool {
        self.progress.inventory.remove(item)
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.progress.inventory.contains(item)
    }

    /// Add to karma. Never clamped.
    pub fn adjust_karma(&mut self, delta: i64) {
        self.progress.karma += delta;
    }

    /// Add to a dharmic axis by name. Unknown axis names are ignored.
    pub fn adjust_dharmic_axis(&mut self, axis: &str, delta: i64) -> bool {
        match DharmicAxis::from_name(axis) {
            Some(axis) => {
                self.progress.dharmic_profile.adjust(axis, delta);
                true
            }
            None => {
                debug!(axis, "ignoring unknown dharmic axis");
                false
            }
        }
    }

    /// Apply karma, inventory, and dharmic effects, in that order.
    pub fn apply_effects(&mut self, effects: &Effects) {
        if let Some(karma) = effects.karma {
            self.adjust_karma(karma);
        }
        for item in &effects.inventory.add {
            self.add_item(item);
        }
        for item in &effects.inventory.remove {
            self.remove_item(item);
        }
        for (axis, delta) in &effects.dharmic_profile {
            self.adjust_dharmic_axis(axis, *delta);
        }
    }

    /// Detached copy for predicate evaluation.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(self.clone())
    }

    /// Serialize the whole state as JSON.
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a whole state from JSON.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }

    fn read_scalar(&self, field: &str) -> FlagValue {
        match field {
            "currentAct" => FlagValue::Int(self.progress.current_act.into()),
            "currentSceneId" => FlagValue::String(self.progress.current_scene_id.clone()),
            "karma" => FlagValue::Int(self.progress.karma),
            _ => FlagValue::List(
                self.progress
                    .inventory
                    .iter()
                    .map(FlagValue::from)
                    .collect(),
            ),
        }
    }

    fn write_scalar(&mut self, field: &str, value: FlagValue) -> Result<(), StateError> {
        let mismatch = |expected| StateError::TypeMismatch {
            key: field.to_string(),
            expected,
        };
        match field {
            "currentAct" => {
                let act = value
                    .as_i64()
                    .and_then(|act| u32::try_from(act).ok())
                    .filter(|act| *act >= 1)
                    .ok_or_else(|| mismatch("a positive integer"))?;
                self.progress.current_act = act;
            }
            "currentSceneId" => {
                let scene = value.as_str().ok_or_else(|| mismatch("a string"))?;
                self.progress.current_scene_id = scene.to_string();
            }
            "karma" => {
                self.progress.karma = value.as_i64().ok_or_else(|| mismatch("an integer"))?;
            }
            _ => {
                let FlagValue::List(items) = value else {
                    return Err(mismatch("a list of item names"));
                };
                let names = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| mismatch("a list of item names"))?;
                self.progress.inventory.replace(names);
            }
        }
        Ok(())
    }

    fn read_counter(&self, field: &str) -> i64 {
        let record = &self.progress.progression;
        match field {
            "xp" => record.xp.into(),
            "level" => record.level.into(),
            "questsCompleted" => record.quests_completed.into(),
            "puzzlesSolved" => record.puzzles_solved.into(),
            "choicesMade" => record.choices_made.into(),
            "karmaGained" => record.karma_gained,
            _ => record.karma_lost,
        }
    }

    fn write_counter(&mut self, key: &str, field: &str, value: &FlagValue) -> Result<(), StateError> {
        let number = int_for(key, value)?;
        let counter = || {
            u32::try_from(number).map_err(|_| StateError::TypeMismatch {
                key: key.to_string(),
                expected: "a non-negative integer",
            })
        };
        let record = &mut self.progress.progression;
        match field {
            "xp" => record.xp = counter()?,
            "level" => record.level = counter()?,
            "questsCompleted" => record.quests_completed = counter()?,
            "puzzlesSolved" => record.puzzles_solved = counter()?,
            "choicesMade" => record.choices_made = counter()?,
            "karmaGained" => record.karma_gained = number,
            _ => record.karma_lost = number,
        }
        Ok(())
    }
}

fn int_for(key: &str, value: &FlagValue) -> Result<i64, StateError> {
    value.as_i64().ok_or_else(|| StateError::TypeMismatch {
        key: key.to_string(),
        expected: "an integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Nakshatra;

    fn state() -> GameState {
        GameState::new_game("Ashwini").unwrap()
    }

    #[test]
    fn test_new_game() {
        let state = state();
        assert_eq!(state.profile.nakshatra, Nakshatra::Ashwini);
        assert_eq!(state.progress.current_scene_id, "JOURNEY_START");
        assert!(state.world.is_empty());
        assert!(GameState::new_game("Nobody").is_err());
    }

    #[test]
    fn test_set_progress_fields() {
        let mut state = state();
        state.set("currentSceneId", "DHARMAPURA_SQUARE".into()).unwrap();
        state.set("currentAct", 2.into()).unwrap();
        state.set("karma", (-4).into()).unwrap();

        assert_eq!(state.progress.current_scene_id, "DHARMAPURA_SQUARE");
        assert_eq!(state.progress.current_act, 2);
        assert_eq!(state.progress.karma, -4);
        assert!(state.world.is_empty());
    }

    #[test]
    fn test_dotted_known_parent_updates_typed_field() {
        let mut state = state();
        state.set("dharmicProfile.dharma", 5.into()).unwrap();

        assert_eq!(state.progress.dharmic_profile.dharma, 5);
        assert_eq!(state.get("dharmicProfile.dharma"), Some(FlagValue::Int(5)));
        assert!(state.world.get("dharmicProfile.dharma").is_none());
    }

    #[test]
    fn test_dotted_unknown_parent_is_literal_world_key() {
        let mut state = state();
        state.set("foo.bar", true.into()).unwrap();

        assert_eq!(state.world.get("foo.bar"), Some(&FlagValue::Bool(true)));
        assert!(state.world.get("foo").is_none());
        assert_eq!(state.get("foo.bar"), Some(FlagValue::Bool(true)));
    }

    #[test]
    fn test_dotted_key_under_scalar_field_goes_to_world() {
        let mut state = state();
        state.set("karma.bonus", 3.into()).unwrap();

        assert_eq!(state.progress.karma, 0);
        assert_eq!(state.world.get("karma.bonus"), Some(&FlagValue::Int(3)));
    }

    #[test]
    fn test_unknown_child_of_record_is_literal_world_key() {
        let mut state = state();
        state.set("dharmicProfile.wisdom", 1.into()).unwrap();
        state.set("progression.prestige", "high".into()).unwrap();

        assert_eq!(state.world.get("dharmicProfile.wisdom"), Some(&FlagValue::Int(1)));
        assert_eq!(state.get("dharmicProfile.wisdom"), Some(FlagValue::Int(1)));
        assert_eq!(state.get("progression.prestige"), Some(FlagValue::from("high")));
        assert_eq!(state.progress.dharmic_profile, crate::entities::DharmicProfile::default());
        assert_eq!(state.progress.progression.xp, 0);
    }

    #[test]
    fn test_set_many_applies_authored_order() {
        let mut state = state();
        let triggers: TriggerMap = serde_json::from_str(
            r#"{ "zeal": 1, "karma": "plenty", "currentAct": "soon" }"#,
        )
        .unwrap();

        let err = state.set_many(&triggers).unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { ref key, .. } if key == "karma"));
        assert_eq!(state.world.get("zeal"), Some(&FlagValue::Int(1)));
        assert_eq!(state.progress.current_act, 1);
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        let mut state = state();
        for value in [
            FlagValue::Float(f64::INFINITY),
            FlagValue::Float(f64::NAN),
            FlagValue::List(vec![FlagValue::Float(1.5), FlagValue::Float(f64::NEG_INFINITY)]),
        ] {
            let err = state.set("omen", value).unwrap_err();
            assert!(matches!(err, StateError::TypeMismatch { ref key, expected: "a finite number" } if key == "omen"));
        }
        assert!(state.world.is_empty());

        state.set("omen", 1.5.into()).unwrap();
        let restored = GameState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_type_mismatch() {
        let mut state = state();
        assert!(matches!(
            state.set("karma", "lots".into()),
            Err(StateError::TypeMismatch { .. })
        ));
        assert!(matches!(
            state.set("currentAct", 0.into()),
            Err(StateError::TypeMismatch { .. })
        ));
        assert!(matches!(
            state.set("dharmicProfile", 1.into()),
            Err(StateError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_plain_unknown_key_is_world_flag() {
        let mut state = state();
        state.set("quest1_solution", "Heal the Tree".into()).unwrap();
        assert_eq!(
            state.get("quest1_solution"),
            Some(FlagValue::from("Heal the Tree"))
        );
        assert_eq!(state.get("missing"), None);
    }

    #[test]
    fn test_inventory_via_keys() {
        let mut state = state();
        state.add_item("Lotus Petal");
        assert_eq!(
            state.get("inventory"),
            Some(FlagValue::List(vec!["Lotus Petal".into()]))
        );

        state
            .set("inventory", FlagValue::List(vec!["Bell".into(), "Bell".into()]))
            .unwrap();
        assert_eq!(state.progress.inventory.len(), 1);
        assert!(state.has_item("Bell"));
    }

    #[test]
    fn test_inventory_set_semantics() {
        let mut state = state();
        assert!(state.add_item("Conch"));
        assert!(!state.add_item("Conch"));
        assert_eq!(state.progress.inventory.len(), 1);
        assert!(!state.remove_item("Lotus"));
        assert_eq!(state.progress.inventory.len(), 1);
    }

    #[test]
    fn test_karma_is_unbounded() {
        let mut state = state();
        for _ in 0..10 {
            state.adjust_karma(-5);
        }
        assert_eq!(state.progress.karma, -50);
    }

    #[test]
    fn test_unknown_axis_is_ignored() {
        let mut state = state();
        assert!(!state.adjust_dharmic_axis("wisdom", 3));
        assert!(state.adjust_dharmic_axis("artha", 3));
        assert_eq!(state.progress.dharmic_profile.artha, 3);
    }

    #[test]
    fn test_apply_effects() {
        let mut state = state();
        state.add_item("Old Coin");
        let effects = Effects::new()
            .with_karma(10)
            .with_item("Lotus Petal")
            .without_item("Old Coin")
            .with_axis("moksha", 2)
            .with_axis("unknown", 9);

        state.apply_effects(&effects);

        assert_eq!(state.progress.karma, 10);
        assert!(state.has_item("Lotus Petal"));
        assert!(!state.has_item("Old Coin"));
        assert_eq!(state.progress.dharmic_profile.moksha, 2);
    }

    #[test]
    fn test_progression_counters_by_key() {
        let mut state = state();
        state.set("progression.xp", 120.into()).unwrap();
        assert_eq!(state.progress.progression.xp, 120);
        assert_eq!(state.get("progression.xp"), Some(FlagValue::Int(120)));
        assert!(state.set("progression.xp", (-1).into()).is_err());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = state();
        let snapshot = state.snapshot();
        state.adjust_karma(7);
        assert_eq!(snapshot.progress.karma, 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = state();
        state.adjust_karma(-3);
        state.add_item("Lotus Petal");
        state.set("has_lotus_petal", true.into()).unwrap();
        state.set("ratio", 0.5.into()).unwrap();
        state.progress.puzzle_mut("BarrierOfNegativity").attempts = 2;

        let json = state.to_json().unwrap();
        let restored = GameState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameState::from_json("{ not json"),
            Err(StateError::Serialization(_))
        ));
    }
}
