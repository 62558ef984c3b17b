//! Effect metadata: canonical ids, classification and stack limits

use super::effect::effect_id;

/// How a field-level effect behaves when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectClass {
    /// Mutually exclusive with other terrains
    Terrain,
    /// Rooms, Gravity and similar; any number may coexist
    PseudoWeather,
    /// Belongs to one side (hazards, screens)
    SideCondition,
    None,
}

/// Read-only metadata lookup the interpreter consults for effect names.
///
/// Implementations must be pure: the same input always yields the same
/// answer.
pub trait EffectCatalog {
    fn canonical_id(&self, raw: &str) -> String {
        effect_id(raw)
    }

    fn classify(&self, id: &str) -> EffectClass;

    /// Maximum stack count for a side condition
    fn max_layers(&self, _id: &str) -> u8 {
        1
    }
}

const TERRAINS: &[&str] = &[
    "electricterrain",
    "grassyterrain",
    "mistyterrain",
    "psychicterrain",
];

const PSEUDO_WEATHER: &[&str] = &[
    "trickroom",
    "magicroom",
    "wonderroom",
    "gravity",
    "mudsport",
    "watersport",
    "iondeluge",
    "fairylock",
];

const SIDE_CONDITIONS: &[(&str, u8)] = &[
    ("reflect", 1),
    ("lightscreen", 1),
    ("auroraveil", 1),
    ("spikes", 3),
    ("toxicspikes", 2),
    ("stealthrock", 1),
    ("stickyweb", 1),
    ("tailwind", 1),
    ("safeguard", 1),
    ("mist", 1),
    ("luckychant", 1),
    ("wideguard", 1),
    ("quickguard", 1),
    ("matblock", 1),
];

/// Table-backed catalog covering the conditions of generations 1 through 7
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl EffectCatalog for BuiltinCatalog {
    fn classify(&self, id: &str) -> EffectClass {
        if TERRAINS.contains(&id) {
            EffectClass::Terrain
        } else if PSEUDO_WEATHER.contains(&id) {
            EffectClass::PseudoWeather
        } else if SIDE_CONDITIONS.iter().any(|(c, _)| *c == id) {
            EffectClass::SideCondition
        } else {
            EffectClass::None
        }
    }

    fn max_layers(&self, id: &str) -> u8 {
        SIDE_CONDITIONS
            .iter()
            .find(|(c, _)| *c == id)
            .map(|(_, layers)| *layers)
            .unwrap_or(1)
    }
}
