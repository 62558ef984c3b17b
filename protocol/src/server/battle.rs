//! Shared types for battle protocol messages

use crate::ParseError;
use serde::Serialize;

/// Player in a battle (p1, p2, p3, p4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
    P3,
    P4,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s.get(..2)? {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            "p3" => Some(Player::P3),
            "p4" => Some(Player::P4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
            Player::P3 => "p3",
            Player::P4 => "p4",
        }
    }
}

/// Pokemon reference in the form "POSITION: NAME" (e.g., "p1a: Pikachu")
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    /// Player who owns this pokemon
    pub player: Player,
    /// Position letter (a, b, c for active slots, or None if inactive)
    pub position: Option<char>,
    /// Pokemon's name/nickname
    pub name: String,
}

impl Pokemon {
    /// Parse a pokemon reference like "p1a: Pikachu" or "p1: Pikachu"
    pub fn parse(s: &str) -> Option<Self> {
        let (pos_part, name) = s.split_once(": ")?;
        let player = Player::parse(pos_part)?;
        let position = pos_part.chars().nth(2);

        Some(Pokemon {
            player,
            position,
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Neutral,
}

impl Gender {
    pub fn as_char(&self) -> char {
        match self {
            Gender::Male => 'm',
            Gender::Female => 'f',
            Gender::Neutral => 'n',
        }
    }
}

/// Pokemon details string (species, level, gender, shiny)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
    pub gender: Option<Gender>,
    pub shiny: bool,
}

impl PokemonDetails {
    /// Parse a details string like "Pikachu, L50, M, shiny" or "Arceus-*"
    pub fn parse(s: &str) -> Self {
        let mut details = PokemonDetails::default();
        let mut parts = s.split(", ");

        if let Some(species) = parts.next() {
            details.species = species.to_string();
        }

        for part in parts {
            if let Some(level_str) = part.strip_prefix('L') {
                details.level = level_str.parse().ok();
            } else if part == "M" {
                details.gender = Some(Gender::Male);
            } else if part == "F" {
                details.gender = Some(Gender::Female);
            } else if part == "shiny" {
                details.shiny = true;
            }
        }

        details
    }
}

/// HP and status condition (e.g., "100/100", "50/100 slp", "0 fnt")
#[derive(Debug, Clone, PartialEq)]
pub struct HpStatus {
    /// Current HP (as raw value or percentage depending on perspective)
    pub current: f32,
    /// Max HP (if given)
    pub max: Option<f32>,
    /// Status condition (slp, par, brn, psn, tox, frz, fnt)
    pub status: Option<String>,
}

impl HpStatus {
    /// Parse an HP status string like "100/100", "50/100 slp", or "0 fnt"
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next()?;
        let status = parts.next().map(|s| s.to_string());

        if let Some((current_str, max_str)) = hp_part.split_once('/') {
            Some(HpStatus {
                current: current_str.parse().ok()?,
                max: Some(max_str.parse().ok()?),
                status,
            })
        } else {
            Some(HpStatus {
                current: hp_part.parse().ok()?,
                max: None,
                status,
            })
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.status.as_deref() == Some("fnt")
    }
}

/// Stat abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }

    /// Accuracy and evasion are tracked apart from the five stage stats
    pub fn is_battle_stat(&self) -> bool {
        matches!(self, Stat::Accuracy | Stat::Evasion)
    }
}

/// Side of the field (for side conditions), e.g. "p1: Red"
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub player: Player,
    pub raw: String,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        Some(Side {
            player: Player::parse(s)?,
            raw: s.to_string(),
        })
    }
}

/// Trailing `[tag] value` annotations that may close any battle line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotations {
    /// `[from] EFFECT`, e.g. "item: Leftovers" or "ability: Intimidate"
    pub from: Option<String>,
    /// `[of] POKEMON`, the combatant the `[from]` effect belongs to
    pub of: Option<Pokemon>,
    pub upkeep: bool,
    pub eat: bool,
    pub silent: bool,
}

impl Annotations {
    pub fn parse(parts: &[&str]) -> Self {
        let mut annotations = Annotations::default();

        for part in parts.iter().filter(|p| p.starts_with('[')) {
            if let Some(from) = part.strip_prefix("[from]") {
                annotations.from = Some(from.trim().to_string());
            } else if let Some(of) = part.strip_prefix("[of]") {
                annotations.of = Pokemon::parse(of.trim());
            } else if *part == "[upkeep]" {
                annotations.upkeep = true;
            } else if *part == "[eat]" {
                annotations.eat = true;
            } else if *part == "[silent]" {
                annotations.silent = true;
            }
        }

        annotations
    }

    /// Ability named by a `[from] ability: X` annotation
    pub fn from_ability(&self) -> Option<&str> {
        self.from
            .as_deref()
            .and_then(|f| f.strip_prefix("ability:"))
            .map(str::trim)
    }

    /// Item named by a `[from] item: X` annotation
    pub fn from_item(&self) -> Option<&str> {
        self.from
            .as_deref()
            .and_then(|f| f.strip_prefix("item:"))
            .map(str::trim)
    }
}

/// Helper to parse Pokemon from message parts
pub fn parse_pokemon(parts: &[&str], index: usize) -> Result<Pokemon, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Pokemon::parse(s))
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()).into())
}

/// Helper to parse Side from message parts
pub fn parse_side(parts: &[&str], index: usize) -> Result<Side, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Side::parse(s))
        .ok_or_else(|| ParseError::MissingField("side".to_string()).into())
}

/// Helper to parse PokemonDetails from message parts
pub fn parse_details(parts: &[&str], index: usize) -> PokemonDetails {
    parts
        .get(index)
        .map(|s| PokemonDetails::parse(s))
        .unwrap_or_default()
}

/// Helper to parse HpStatus from message parts
pub fn parse_hp_status(parts: &[&str], index: usize) -> Option<HpStatus> {
    parts.get(index).and_then(|s| HpStatus::parse(s))
}

/// Helper to read a required plain field, stopping at annotations
pub fn parse_field(parts: &[&str], index: usize, name: &str) -> Result<String, anyhow::Error> {
    parts
        .get(index)
        .filter(|s| !s.starts_with('['))
        .map(|s| s.to_string())
        .ok_or_else(|| ParseError::MissingField(name.to_string()).into())
}

/// Helper to read an optional plain field, ignoring annotations
pub fn optional_field(parts: &[&str], index: usize) -> Option<String> {
    parts
        .get(index)
        .filter(|s| !s.is_empty() && !s.starts_with('['))
        .map(|s| s.to_string())
}
