//! Named, turn-counted effects: statuses, volatiles, side and field conditions

use vantage_protocol::to_id;

/// Strip the "move: " / "ability: " / "item: " prefix the server puts on
/// effect names
pub fn effect_name(raw: &str) -> &str {
    ["move:", "ability:", "item:"]
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw)
        .trim()
}

/// Canonical id for a raw effect name ("move: Stealth Rock" -> "stealthrock")
pub fn effect_id(raw: &str) -> String {
    to_id(effect_name(raw))
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Effect {
    pub name: String,
    pub id: String,
    /// Upkeeps survived since the effect started
    pub turns_active: u32,
    /// Stack count for layered hazards; 1 for everything else
    pub layers: u8,
    /// Dropped at the next upkeep instead of aging
    pub single_turn: bool,
}

impl Effect {
    pub fn new(raw: &str, id: impl Into<String>) -> Self {
        Self {
            name: effect_name(raw).to_string(),
            id: id.into(),
            turns_active: 0,
            layers: 1,
            single_turn: false,
        }
    }

    /// Build an effect with the default canonical id
    pub fn named(raw: &str) -> Self {
        Self::new(raw, effect_id(raw))
    }

    pub fn single_turn(mut self) -> Self {
        self.single_turn = true;
        self
    }

    pub fn age(&mut self) {
        self.turns_active += 1;
    }
}
