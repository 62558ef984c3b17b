//! BattleState - the reconstructed view of one battle

use vantage_protocol::{BattleRequest, Player};

use super::decision::LegalActions;
use crate::types::{Effect, FieldState, Side};

/// Lifecycle of a battle session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Phase {
    #[default]
    Connecting,
    Searching,
    Ongoing,
    Win,
    Loss,
    Tie,
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Win | Phase::Loss | Phase::Tie | Phase::Aborted)
    }
}

/// Which of the two sides, from our perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SideId {
    Player,
    Opponent,
}

/// A battle reconstructed from server messages
///
/// Holds the perspective of one player: our own side is filled from request
/// snapshots, the opponent's is revealed slot by slot as lines mention it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BattleState {
    /// Current turn number (0 = not started), never decreases
    pub turn: u32,
    pub phase: Phase,

    pub player: Side,
    pub opponent: Side,
    pub field: FieldState,

    pub forfeited: bool,

    /// Battle room id, once bound
    pub room: Option<String>,
    /// Winner's username (if ended)
    pub winner: Option<String>,
    pub generation: Option<u8>,
    pub tier: Option<String>,

    /// Latest actionable request snapshot
    #[cfg_attr(feature = "serde", serde(skip))]
    pub request: Option<BattleRequest>,
    /// Legal actions derived from `request`
    pub legal: Option<LegalActions>,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, id: SideId) -> &Side {
        match id {
            SideId::Player => &self.player,
            SideId::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        match id {
            SideId::Player => &mut self.player,
            SideId::Opponent => &mut self.opponent,
        }
    }

    /// Side bound to a protocol player tag
    pub fn side_id(&self, player: Player) -> Option<SideId> {
        if self.player.player == Some(player) {
            Some(SideId::Player)
        } else if self.opponent.player == Some(player) {
            Some(SideId::Opponent)
        } else {
            None
        }
    }

    /// Hazards and screens on one side
    pub fn side_effects(&self, id: SideId) -> &[Effect] {
        &self.side(id).conditions
    }

    /// Bind our own player tag. In a two-player battle the other tag is the
    /// opponent's.
    pub fn bind_player(&mut self, player: Player) {
        self.player.player = Some(player);
        if self.opponent.player.is_none() || self.opponent.player == Some(player) {
            self.opponent.player = match player {
                Player::P1 => Some(Player::P2),
                Player::P2 => Some(Player::P1),
                _ => None,
            };
        }
    }

    pub fn advance_turn(&mut self, turn: u32) {
        self.turn = self.turn.max(turn);
    }

    /// The single aging step run at each upkeep: weather, field effects,
    /// both sides' conditions and each active combatant's statuses age by
    /// one; single-turn volatiles are dropped.
    pub fn age_effects(&mut self) {
        self.field.age_effects();
        self.player.age_effects();
        self.opponent.age_effects();
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battle() {
        let battle = BattleState::new();
        assert_eq!(battle.turn, 0);
        assert_eq!(battle.phase, Phase::Connecting);
        assert!(!battle.is_over());
        assert!(battle.player.player.is_none());
    }

    #[test]
    fn test_turn_never_decreases() {
        let mut battle = BattleState::new();
        battle.advance_turn(5);
        battle.advance_turn(3);
        assert_eq!(battle.turn, 5);
    }

    #[test]
    fn test_bind_player() {
        let mut battle = BattleState::new();
        battle.bind_player(Player::P2);

        assert_eq!(battle.side_id(Player::P2), Some(SideId::Player));
        assert_eq!(battle.side_id(Player::P1), Some(SideId::Opponent));
        assert_eq!(battle.side_id(Player::P3), None);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Win.is_terminal());
        assert!(Phase::Aborted.is_terminal());
        assert!(!Phase::Ongoing.is_terminal());
        assert!(!Phase::Searching.is_terminal());
    }
}
