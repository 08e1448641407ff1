//! Authored world-state triggers, kept in the order they were written.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::FlagValue;

/// A key-value trigger map that applies entries in authored order.
///
/// Entries are written one at a time and the first failing key aborts the
/// action, so the authored order is part of the meaning. A repeated key
/// replaces the earlier value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriggerMap {
    entries: Vec<(String, FlagValue)>,
}

impl TriggerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TriggerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TriggerMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TriggerMapVisitor;

        impl<'de> Visitor<'de> for TriggerMapVisitor {
            type Value = TriggerMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of state keys to values")
            }

            fn visit_map<M>(self, mut access: M) -> Result<TriggerMap, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map = TriggerMap::new();
                while let Some((key, value)) = access.next_entry::<String, FlagValue>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(TriggerMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_document_order() {
        let map: TriggerMap =
            serde_json::from_str(r#"{ "zeal": 1, "currentAct": 2, "awakened": true }"#).unwrap();

        let keys: Vec<&str> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["zeal", "currentAct", "awakened"]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"zeal":1,"currentAct":2,"awakened":true}"#
        );
    }

    #[test]
    fn test_repeated_key_replaces_in_place() {
        let map: TriggerMap = serde_json::from_str(r#"{ "a": 1, "b": 2, "a": 3 }"#).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&FlagValue::Int(3)));
        let keys: Vec<&str> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_rejects_non_map() {
        assert!(serde_json::from_str::<TriggerMap>("[1, 2]").is_err());
        assert!(serde_json::from_str::<TriggerMap>("{}").unwrap().is_empty());
    }
}
