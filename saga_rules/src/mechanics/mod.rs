//! Game mechanics: the dharmic axes and the effect records applied by choices,
//! puzzle outcomes, and quest rewards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four dharmic axes tracked per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DharmicAxis {
    /// Duty and righteousness.
    Dharma,
    /// Prosperity and means.
    Artha,
    /// Desire and pleasure.
    Kama,
    /// Liberation.
    Moksha,
}

impl DharmicAxis {
    pub const ALL: [DharmicAxis; 4] = [
        DharmicAxis::Dharma,
        DharmicAxis::Artha,
        DharmicAxis::Kama,
        DharmicAxis::Moksha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DharmicAxis::Dharma => "dharma",
            DharmicAxis::Artha => "artha",
            DharmicAxis::Kama => "kama",
            DharmicAxis::Moksha => "moksha",
        }
    }

    /// Parse an axis name as authored in story data. Exact match only.
    pub fn from_name(name: &str) -> Option<DharmicAxis> {
        Self::ALL.into_iter().find(|axis| axis.as_str() == name)
    }
}

/// Items gained and lost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryEffects {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl InventoryEffects {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Numeric and inventory consequences of an action.
///
/// Unknown keys in authored data are ignored, and so are dharmic axes that are
/// not one of the four known ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma: Option<i64>,

    #[serde(default, skip_serializing_if = "InventoryEffects::is_empty")]
    pub inventory: InventoryEffects,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dharmic_profile: BTreeMap<String, i64>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_karma(mut self, delta: i64) -> Self {
        self.karma = Some(delta);
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.inventory.add.push(item.into());
        self
    }

    pub fn without_item(mut self, item: impl Into<String>) -> Self {
        self.inventory.remove.push(item.into());
        self
    }

    pub fn with_axis(mut self, axis: impl Into<String>, delta: i64) -> Self {
        self.dharmic_profile.insert(axis.into(), delta);
        self
    }

    /// Net karma change, zero when absent.
    pub fn karma_delta(&self) -> i64 {
        self.karma.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.karma.is_none() && self.inventory.is_empty() && self.dharmic_profile.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_names() {
        for axis in DharmicAxis::ALL {
            assert_eq!(DharmicAxis::from_name(axis.as_str()), Some(axis));
        }
        assert_eq!(DharmicAxis::from_name("Dharma"), None);
        assert_eq!(DharmicAxis::from_name("wisdom"), None);
    }

    #[test]
    fn test_effects_parse_authored_shape() {
        let effects: Effects = serde_json::from_str(
            r#"{ "karma": 20, "gunas": { "sattva": 10 },
                 "inventory": { "add": ["Lotus Petal"] },
                 "dharmicProfile": { "dharma": 2 } }"#,
        )
        .unwrap();

        assert_eq!(effects.karma_delta(), 20);
        assert_eq!(effects.inventory.add, vec!["Lotus Petal".to_string()]);
        assert!(effects.inventory.remove.is_empty());
        assert_eq!(effects.dharmic_profile.get("dharma"), Some(&2));
    }

    #[test]
    fn test_effects_builder() {
        let effects = Effects::new().with_karma(-2).with_item("Bell").with_axis("kama", 1);
        assert!(!effects.is_empty());
        assert_eq!(effects.karma_delta(), -2);
        assert!(Effects::default().is_empty());
    }
}
