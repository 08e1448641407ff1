//! World state management - the central container holding all game data.

mod container;
mod progress;
mod snapshot;
mod triggers;

pub use container::*;
pub use progress::*;
pub use snapshot::*;
pub use triggers::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flag value types for global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FlagValue>),
}

impl FlagValue {
    /// Truthiness as story authors expect it: `false`, `0`, `""` and `[]` are unset.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::Float(f) => *f != 0.0 && !f.is_nan(),
            FlagValue::String(s) => !s.is_empty(),
            FlagValue::List(items) => !items.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view. Whole-number floats are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            FlagValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric view for comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlagValue::Int(i) => Some(*i as f64),
            FlagValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Loose equality: numbers compare by value regardless of representation.
    pub fn loosely_equals(&self, other: &FlagValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// False for NaN or infinite floats, including inside lists.
    pub fn is_finite(&self) -> bool {
        match self {
            FlagValue::Float(f) => f.is_finite(),
            FlagValue::List(items) => items.iter().all(FlagValue::is_finite),
            _ => true,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        FlagValue::Int(value.into())
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        FlagValue::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::String(value)
    }
}

/// Flags the engine itself reads. Every other flag is opaque story data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownFlag {
    /// Unlocks the celestial melody choices in Act II.
    KnowsFullMelody,
    /// Set when the lotus petal is picked up by the river.
    HasLotusPetal,
    /// Set on entering the crystal purification scene.
    RiverPurified,
    /// The resolution the player picked for the Banyan dilemma.
    Quest1Solution,
}

impl KnownFlag {
    pub fn key(&self) -> &'static str {
        match self {
            KnownFlag::KnowsFullMelody => "knows_full_melody",
            KnownFlag::HasLotusPetal => "has_lotus_petal",
            KnownFlag::RiverPurified => "river_purified",
            KnownFlag::Quest1Solution => "quest1_solution",
        }
    }
}

/// Open-ended map from flag names to values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldState {
    flags: BTreeMap<String, FlagValue>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: FlagValue) {
        self.flags.insert(key.into(), value);
    }

    /// True if the flag exists and is truthy.
    pub fn is_set(&self, key: &str) -> bool {
        self.flags.get(key).is_some_and(FlagValue::is_truthy)
    }

    /// Typed access to a flag the engine depends on.
    pub fn known(&self, flag: KnownFlag) -> Option<&FlagValue> {
        self.get(flag.key())
    }

    pub fn knows_full_melody(&self) -> bool {
        self.is_set(KnownFlag::KnowsFullMelody.key())
    }

    pub fn has_lotus_petal(&self) -> bool {
        self.is_set(KnownFlag::HasLotusPetal.key())
    }

    pub fn river_purified(&self) -> bool {
        self.is_set(KnownFlag::RiverPurified.key())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_truthiness() {
        assert!(FlagValue::Bool(true).is_truthy());
        assert!(!FlagValue::Bool(false).is_truthy());
        assert!(!FlagValue::Int(0).is_truthy());
        assert!(FlagValue::Int(-3).is_truthy());
        assert!(!FlagValue::String(String::new()).is_truthy());
        assert!(FlagValue::from("Heal the Tree").is_truthy());
        assert!(!FlagValue::List(vec![]).is_truthy());
    }

    #[test]
    fn test_untagged_flag_parsing() {
        let parsed: BTreeMap<String, FlagValue> =
            serde_json::from_str(r#"{ "a": true, "b": 3, "c": 2.5, "d": "x", "e": [1] }"#).unwrap();

        assert_eq!(parsed["a"], FlagValue::Bool(true));
        assert_eq!(parsed["b"], FlagValue::Int(3));
        assert_eq!(parsed["c"], FlagValue::Float(2.5));
        assert_eq!(parsed["d"], FlagValue::from("x"));
        assert_eq!(parsed["e"], FlagValue::List(vec![FlagValue::Int(1)]));
    }

    #[test]
    fn test_loose_numeric_equality() {
        assert!(FlagValue::Int(2).loosely_equals(&FlagValue::Float(2.0)));
        assert!(!FlagValue::Int(2).loosely_equals(&FlagValue::from("2")));
        assert_eq!(FlagValue::Float(4.0).as_i64(), Some(4));
        assert_eq!(FlagValue::Float(4.5).as_i64(), None);
    }

    #[test]
    fn test_known_flag_accessors() {
        let mut world = WorldState::new();
        assert!(!world.has_lotus_petal());

        world.set(KnownFlag::HasLotusPetal.key(), FlagValue::Bool(true));
        world.set("quest1_solution", FlagValue::from("Heal the Tree"));

        assert!(world.has_lotus_petal());
        assert!(!world.river_purified());
        assert_eq!(
            world.known(KnownFlag::Quest1Solution).and_then(FlagValue::as_str),
            Some("Heal the Tree")
        );
    }
}
