//! Battle request types
//!
//! These types represent the JSON structure of |request| messages. The wire
//! object is a loose bag of optional keys; it is narrowed into one
//! [`RequestKind`] on deserialization so that consumers never see a shape
//! the server did not mean to send.

use super::battle::{HpStatus, Player, Pokemon, PokemonDetails};
use crate::ParseError;
use serde::Deserialize;

/// A side-private snapshot asking the player to make a decision
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct BattleRequest {
    /// Request ID for synchronization
    pub rqid: Option<u64>,

    /// Information about the player's side/team
    pub side: Option<SideInfo>,

    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    /// Waiting for the opponent; nothing to decide
    Wait,
    /// One flag per active slot that must be replaced
    ForceSwitch(Vec<bool>),
    TeamPreview,
    /// Regular turn decision for the active combatants
    Move { active: Vec<ActivePokemon> },
}

impl BattleRequest {
    /// Get the first active pokemon's options, if this is a move request
    pub fn active(&self) -> Option<&ActivePokemon> {
        match &self.kind {
            RequestKind::Move { active } => active.first(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    rqid: Option<u64>,
    #[serde(default)]
    active: Option<Vec<ActivePokemon>>,
    side: Option<SideInfo>,
    #[serde(default)]
    force_switch: Option<Vec<bool>>,
    #[serde(default)]
    team_preview: bool,
    #[serde(default)]
    wait: bool,
}

impl TryFrom<RawRequest> for BattleRequest {
    type Error = ParseError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let kind = if raw.wait {
            RequestKind::Wait
        } else if let Some(slots) = raw.force_switch.filter(|s| s.iter().any(|&b| b)) {
            RequestKind::ForceSwitch(slots)
        } else if raw.team_preview {
            RequestKind::TeamPreview
        } else if let Some(active) = raw.active.filter(|a| !a.is_empty()) {
            RequestKind::Move { active }
        } else {
            return Err(ParseError::InvalidRequest(
                "expected one of wait, forceSwitch, teamPreview or active".to_string(),
            ));
        };

        Ok(BattleRequest {
            rqid: raw.rqid,
            side: raw.side,
            kind,
        })
    }
}

/// Information about an active pokemon in battle
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePokemon {
    /// Available moves
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    #[serde(default)]
    pub trapped: bool,

    #[serde(default)]
    pub maybe_trapped: bool,

    #[serde(default)]
    pub can_mega_evo: bool,

    /// Z-move per move slot (if any are available)
    #[serde(default)]
    pub can_z_move: Option<Vec<Option<ZMoveInfo>>>,
}

impl ActivePokemon {
    /// Only a confirmed trap blocks switching. `maybeTrapped` is sent
    /// whenever a foe might have a trapping ability, and the switch may
    /// still go through.
    pub fn can_switch(&self) -> bool {
        !self.trapped
    }

    /// Whether the move in the given 0-based slot can be used as a Z-move
    pub fn can_z_move_at(&self, index: usize) -> bool {
        self.can_z_move
            .as_ref()
            .and_then(|slots| slots.get(index))
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}

/// A move slot on an active pokemon
///
/// Locked moves (Outrage mid-rampage, recharge) arrive without pp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    /// Display name of the move
    #[serde(rename = "move")]
    pub name: String,

    /// Move ID (lowercase, no spaces)
    pub id: String,

    #[serde(default)]
    pub pp: Option<u32>,

    #[serde(default, rename = "maxpp")]
    pub max_pp: Option<u32>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default, deserialize_with = "flag")]
    pub disabled: bool,
}

/// `disabled` is usually a bool but older formats send the disabling
/// source as a string
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => !s.is_empty(),
    })
}

/// Z-move information
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZMoveInfo {
    #[serde(rename = "move")]
    pub name: String,

    pub target: String,
}

/// Information about the player's side
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SideInfo {
    /// Player's display name
    pub name: String,

    /// Player ID (p1, p2, etc.)
    pub id: String,

    /// Pokemon on this side, in the server's team order
    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

impl SideInfo {
    pub fn player(&self) -> Option<Player> {
        Player::parse(&self.id)
    }
}

/// A pokemon on the player's side
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// Pokemon identifier (e.g., "p1: Pikachu")
    pub ident: String,

    /// Details string (species, level, gender, shiny)
    pub details: String,

    /// Current condition (HP/MaxHP status)
    pub condition: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub stats: PokemonStats,

    /// Known move ids
    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub base_ability: Option<String>,

    #[serde(default)]
    pub ability: Option<String>,

    #[serde(default)]
    pub item: String,
}

impl SidePokemon {
    /// Nickname from the ident, falling back to the raw ident
    pub fn name(&self) -> String {
        Pokemon::parse(&self.ident)
            .map(|p| p.name)
            .unwrap_or_else(|| self.ident.clone())
    }

    pub fn parsed_details(&self) -> PokemonDetails {
        PokemonDetails::parse(&self.details)
    }

    pub fn hp_status(&self) -> Option<HpStatus> {
        HpStatus::parse(&self.condition)
    }

    pub fn is_fainted(&self) -> bool {
        self.hp_status().map(|hp| hp.is_fainted()).unwrap_or(false)
    }
}

/// Pokemon stats
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PokemonStats {
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}
