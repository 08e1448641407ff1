//! The 27 Nakshatra archetypes and their fixed attributes.

use serde::{Deserialize, Serialize};

/// Lunar mansion a player is born under. Used as a gating key for story content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    #[serde(rename = "Purva Phalguni")]
    PurvaPhalguni,
    #[serde(rename = "Uttara Phalguni")]
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    #[serde(rename = "Purva Ashadha")]
    PurvaAshadha,
    #[serde(rename = "Uttara Ashadha")]
    UttaraAshadha,
    Shravana,
    Dhanishtha,
    Shatabhisha,
    #[serde(rename = "Purva Bhadrapada")]
    PurvaBhadrapada,
    #[serde(rename = "Uttara Bhadrapada")]
    UttaraBhadrapada,
    Revati,
}

/// Temperament group each Nakshatra belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gana {
    Deva,
    Manushya,
    Rakshasa,
}

impl Gana {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gana::Deva => "Deva",
            Gana::Manushya => "Manushya",
            Gana::Rakshasa => "Rakshasa",
        }
    }
}

impl std::fmt::Display for Gana {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guna weights. Narrative flavor only; nothing constrains their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gunas {
    pub sattva: u32,
    pub rajas: u32,
    pub tamas: u32,
}

impl Gunas {
    pub const fn new(sattva: u32, rajas: u32, tamas: u32) -> Self {
        Self {
            sattva,
            rajas,
            tamas,
        }
    }
}

/// Static attributes of a Nakshatra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NakshatraAttributes {
    pub nakshatra: Nakshatra,
    pub gana: Gana,
    /// The Nakshatra's power ("shakti").
    pub shakti: &'static str,
    pub gunas: Gunas,
    /// Ability granted when a game starts with this Nakshatra.
    pub signature_ability: &'static str,
}

const fn attrs(
    nakshatra: Nakshatra,
    gana: Gana,
    shakti: &'static str,
    gunas: Gunas,
    signature_ability: &'static str,
) -> NakshatraAttributes {
    NakshatraAttributes {
        nakshatra,
        gana,
        shakti,
        gunas,
        signature_ability,
    }
}

/// Lookup table, in traditional order.
pub const NAKSHATRA_TABLE: [NakshatraAttributes; 27] = [
    attrs(Nakshatra::Ashwini, Gana::Deva, "To heal quickly", Gunas::new(0, 3, 0), "quick_healing"),
    attrs(Nakshatra::Bharani, Gana::Manushya, "To renew and purify", Gunas::new(0, 2, 1), "spirit_sight"),
    attrs(Nakshatra::Krittika, Gana::Rakshasa, "To burn illusion", Gunas::new(1, 2, 0), "inner_fire"),
    attrs(Nakshatra::Rohini, Gana::Manushya, "To make things grow", Gunas::new(0, 2, 1), "earth_bond"),
    attrs(Nakshatra::Mrigashira, Gana::Deva, "To find fulfillment", Gunas::new(0, 1, 2), "animal_speech"),
    attrs(Nakshatra::Ardra, Gana::Manushya, "To feel and act", Gunas::new(1, 1, 1), "storm_caller"),
    attrs(Nakshatra::Punarvasu, Gana::Deva, "To regenerate and recover", Gunas::new(1, 2, 0), "second_chance"),
    attrs(Nakshatra::Pushya, Gana::Deva, "To create spiritual energy", Gunas::new(1, 1, 1), "nurturing_touch"),
    attrs(Nakshatra::Ashlesha, Gana::Rakshasa, "To poison and heal", Gunas::new(2, 1, 0), "serpent_wisdom"),
    attrs(Nakshatra::Magha, Gana::Rakshasa, "To leave the body", Gunas::new(0, 2, 1), "royal_presence"),
    attrs(Nakshatra::PurvaPhalguni, Gana::Manushya, "To find love and enjoyment", Gunas::new(0, 1, 2), "artistic_inspiration"),
    attrs(Nakshatra::UttaraPhalguni, Gana::Manushya, "To accumulate security", Gunas::new(1, 1, 1), "truth_vision"),
    attrs(Nakshatra::Hasta, Gana::Deva, "To manifest desires", Gunas::new(0, 1, 2), "skilled_hands"),
    attrs(Nakshatra::Chitra, Gana::Rakshasa, "To accumulate merit", Gunas::new(0, 0, 3), "illusion_weaver"),
    attrs(Nakshatra::Swati, Gana::Deva, "To scatter like the wind", Gunas::new(1, 0, 2), "wind_whisper"),
    attrs(Nakshatra::Vishakha, Gana::Rakshasa, "To achieve many things", Gunas::new(1, 1, 1), "dual_strength"),
    attrs(Nakshatra::Anuradha, Gana::Deva, "To worship (Bhakti)", Gunas::new(1, 0, 2), "friendship_bond"),
    attrs(Nakshatra::Jyeshtha, Gana::Rakshasa, "To rise and conquer", Gunas::new(2, 0, 1), "elder_wisdom"),
    attrs(Nakshatra::Mula, Gana::Rakshasa, "To ruin or destroy", Gunas::new(1, 2, 0), "root_knowledge"),
    attrs(Nakshatra::PurvaAshadha, Gana::Manushya, "To invigorate or strengthen", Gunas::new(1, 1, 1), "water_affinity"),
    attrs(Nakshatra::UttaraAshadha, Gana::Manushya, "To win for the highest good", Gunas::new(2, 1, 0), "victory_blessing"),
    attrs(Nakshatra::Shravana, Gana::Deva, "To connect", Gunas::new(1, 1, 1), "divine_hearing"),
    attrs(Nakshatra::Dhanishtha, Gana::Rakshasa, "To give fame and abundance", Gunas::new(1, 0, 2), "abundance_draw"),
    attrs(Nakshatra::Shatabhisha, Gana::Rakshasa, "To heal and support", Gunas::new(2, 0, 1), "healing_waters"),
    attrs(Nakshatra::PurvaBhadrapada, Gana::Manushya, "To raise a person up", Gunas::new(2, 1, 0), "spiritual_sight"),
    attrs(Nakshatra::UttaraBhadrapada, Gana::Manushya, "To bring rain and stability", Gunas::new(2, 0, 1), "deep_wisdom"),
    attrs(Nakshatra::Revati, Gana::Deva, "To nourish and transcend", Gunas::new(3, 0, 0), "dream_walker"),
];

impl Nakshatra {
    /// All Nakshatras in traditional order.
    pub fn all() -> impl Iterator<Item = Nakshatra> {
        NAKSHATRA_TABLE.iter().map(|a| a.nakshatra)
    }

    /// Display name, as authored in story data (e.g. "Purva Phalguni").
    pub fn name(&self) -> &'static str {
        match self {
            Nakshatra::Ashwini => "Ashwini",
            Nakshatra::Bharani => "Bharani",
            Nakshatra::Krittika => "Krittika",
            Nakshatra::Rohini => "Rohini",
            Nakshatra::Mrigashira => "Mrigashira",
            Nakshatra::Ardra => "Ardra",
            Nakshatra::Punarvasu => "Punarvasu",
            Nakshatra::Pushya => "Pushya",
            Nakshatra::Ashlesha => "Ashlesha",
            Nakshatra::Magha => "Magha",
            Nakshatra::PurvaPhalguni => "Purva Phalguni",
            Nakshatra::UttaraPhalguni => "Uttara Phalguni",
            Nakshatra::Hasta => "Hasta",
            Nakshatra::Chitra => "Chitra",
            Nakshatra::Swati => "Swati",
            Nakshatra::Vishakha => "Vishakha",
            Nakshatra::Anuradha => "Anuradha",
            Nakshatra::Jyeshtha => "Jyeshtha",
            Nakshatra::Mula => "Mula",
            Nakshatra::PurvaAshadha => "Purva Ashadha",
            Nakshatra::UttaraAshadha => "Uttara Ashadha",
            Nakshatra::Shravana => "Shravana",
            Nakshatra::Dhanishtha => "Dhanishtha",
            Nakshatra::Shatabhisha => "Shatabhisha",
            Nakshatra::PurvaBhadrapada => "Purva Bhadrapada",
            Nakshatra::UttaraBhadrapada => "Uttara Bhadrapada",
            Nakshatra::Revati => "Revati",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Nakshatra> {
        let wanted = name.trim();
        Nakshatra::all().find(|n| n.name().eq_ignore_ascii_case(wanted))
    }

    /// Fixed attributes for this Nakshatra.
    pub fn attributes(&self) -> &'static NakshatraAttributes {
        // Table is declared in enum order.
        &NAKSHATRA_TABLE[*self as usize]
    }

    pub fn gana(&self) -> Gana {
        self.attributes().gana
    }
}

impl std::fmt::Display for Nakshatra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_in_enum_order() {
        for (index, attributes) in NAKSHATRA_TABLE.iter().enumerate() {
            assert_eq!(attributes.nakshatra as usize, index);
        }
        assert_eq!(Nakshatra::all().count(), 27);
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Nakshatra::from_name("ashwini"), Some(Nakshatra::Ashwini));
        assert_eq!(
            Nakshatra::from_name("Purva Phalguni"),
            Some(Nakshatra::PurvaPhalguni)
        );
        assert_eq!(Nakshatra::from_name("Orion"), None);
    }

    #[test]
    fn test_gana_groups() {
        let count = |gana| Nakshatra::all().filter(|n| n.gana() == gana).count();
        assert_eq!(count(Gana::Deva), 9);
        assert_eq!(count(Gana::Manushya), 9);
        assert_eq!(count(Gana::Rakshasa), 9);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Nakshatra::UttaraBhadrapada).unwrap();
        assert_eq!(json, "\"Uttara Bhadrapada\"");

        let parsed: Nakshatra = serde_json::from_str("\"Krittika\"").unwrap();
        assert_eq!(parsed, Nakshatra::Krittika);
    }
}
