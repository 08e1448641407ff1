//! The immutable player profile.

use serde::{Deserialize, Serialize};

use super::{Gana, Gunas, Nakshatra};
use crate::error::StateError;

/// Who the player is. Built once at game start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub nakshatra: Nakshatra,
    pub gana: Gana,
    pub shakti: String,
    pub gunas: Gunas,
}

impl PlayerProfile {
    /// Create a profile from the archetype table.
    pub fn new(nakshatra: Nakshatra) -> Self {
        let attributes = nakshatra.attributes();
        Self {
            nakshatra,
            gana: attributes.gana,
            shakti: attributes.shakti.to_string(),
            gunas: attributes.gunas,
        }
    }

    /// Create a profile from a Nakshatra name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, StateError> {
        Nakshatra::from_name(name)
            .map(Self::new)
            .ok_or_else(|| StateError::UnknownNakshatra(name.to_string()))
    }

    /// Ability granted to this archetype when a game starts.
    pub fn signature_ability(&self) -> &'static str {
        self.nakshatra.attributes().signature_ability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_table() {
        let profile = PlayerProfile::new(Nakshatra::Krittika);
        assert_eq!(profile.gana, Gana::Rakshasa);
        assert_eq!(profile.shakti, "To burn illusion");
        assert_eq!(profile.gunas, Gunas::new(1, 2, 0));
        assert_eq!(profile.signature_ability(), "inner_fire");
    }

    #[test]
    fn test_profile_from_name() {
        let profile = PlayerProfile::from_name("revati").unwrap();
        assert_eq!(profile.nakshatra, Nakshatra::Revati);
        assert_eq!(profile.gunas.sattva, 3);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = PlayerProfile::from_name("Polaris").unwrap_err();
        assert!(matches!(err, StateError::UnknownNakshatra(name) if name == "Polaris"));
    }
}
