//! Decision gate: request snapshots to legal actions

use vantage_protocol::{ActivePokemon, BattleRequest, RequestKind, SideInfo};

use super::battle::BattleState;
use crate::BattleError;
use crate::types::{Combatant, Move, ROSTER_SIZE, Side, canonical_move_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecisionKind {
    /// Any usable move or any available switch
    Free,
    /// The active combatant fainted or was forced out; switches only
    ForcedSwitch,
    /// Locked into a single move (rampage, recharge)
    Locked,
    TeamPreview,
}

/// What the agent may do at the current decision point. Move slots are
/// 1-based; switch slots are 1-based roster positions (2..=6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LegalActions {
    pub kind: DecisionKind,
    pub moves: Vec<usize>,
    pub switches: Vec<usize>,
    pub can_mega: bool,
    /// Move slots that may be used as Z-moves
    pub z_moves: Vec<usize>,
    /// A foe may have a trapping ability; a switch can still be chosen
    pub maybe_trapped: bool,
}

impl LegalActions {
    fn team_preview() -> Self {
        Self {
            kind: DecisionKind::TeamPreview,
            moves: Vec::new(),
            switches: Vec::new(),
            can_mega: false,
            z_moves: Vec::new(),
            maybe_trapped: false,
        }
    }

    /// Choice text for a move, after checking it is allowed
    pub fn move_choice(&self, slot: usize, mega: bool, z: bool) -> Result<String, BattleError> {
        if !self.moves.contains(&slot) {
            return Err(BattleError::IllegalAction(format!(
                "move {} is not available (legal: {:?})",
                slot, self.moves
            )));
        }
        if mega && z {
            return Err(BattleError::IllegalAction(
                "cannot mega evolve and use a z-move in the same turn".to_string(),
            ));
        }
        if mega && !self.can_mega {
            return Err(BattleError::IllegalAction("mega evolution is not available".to_string()));
        }
        if z && !self.z_moves.contains(&slot) {
            return Err(BattleError::IllegalAction(format!(
                "move {} cannot be used as a z-move",
                slot
            )));
        }

        let mut choice = format!("move {}", slot);
        if mega {
            choice.push_str(" mega");
        } else if z {
            choice.push_str(" zmove");
        }
        Ok(choice)
    }

    /// Choice text for a switch, after checking it is allowed
    pub fn switch_choice(&self, slot: usize) -> Result<String, BattleError> {
        if !self.switches.contains(&slot) {
            return Err(BattleError::IllegalAction(format!(
                "switch {} is not available (legal: {:?})",
                slot, self.switches
            )));
        }
        Ok(format!("switch {}", slot))
    }
}

impl BattleState {
    /// Take in a request snapshot: refresh our side and compute the legal
    /// actions it allows. Returns whether the request is an immediate
    /// decision point.
    pub fn apply_request(&mut self, request: BattleRequest) -> bool {
        if let Some(side_info) = &request.side {
            if let Some(player) = side_info.player() {
                self.bind_player(player);
            }
            fill_roster(&mut self.player, side_info);
        }

        let (legal, immediate) = match &request.kind {
            RequestKind::Wait => (None, false),
            RequestKind::TeamPreview => (Some(LegalActions::team_preview()), true),
            RequestKind::ForceSwitch(_) => {
                self.player.force_switch_pending = true;
                let legal = LegalActions {
                    kind: DecisionKind::ForcedSwitch,
                    moves: Vec::new(),
                    switches: switch_slots(&self.player),
                    can_mega: false,
                    z_moves: Vec::new(),
                    maybe_trapped: false,
                };
                (Some(legal), true)
            }
            RequestKind::Move { active } => match active.first() {
                Some(active) => (Some(gate_moves(&mut self.player, active)), false),
                None => (None, false),
            },
        };

        tracing::debug!(
            rqid = ?request.rqid,
            kind = ?legal.as_ref().map(|l| l.kind),
            "request applied"
        );

        self.legal = legal;
        self.request = Some(request);
        immediate
    }

    pub fn rqid(&self) -> Option<u64> {
        self.request.as_ref().and_then(|r| r.rqid)
    }
}

/// Fill our roster from the side snapshot, in the server's order (the
/// active combatant first). Records are moved rather than rebuilt so
/// volatiles and boosts survive; everything the snapshot states is taken
/// as authoritative.
fn fill_roster(side: &mut Side, info: &SideInfo) {
    side.name = info.name.clone();

    for (index, pokemon) in info.pokemon.iter().take(ROSTER_SIZE).enumerate() {
        let name = pokemon.name();
        let existing = side.roster[index..]
            .iter()
            .position(|c| c.known && c.name == name)
            .or_else(|| side.roster[index..].iter().position(|c| !c.known));
        if index == 0 && existing != Some(0) {
            // The server already reports the switch; the log line follows
            side.roster[0].on_switch_out();
        }
        match existing {
            Some(offset) => side.roster.swap(index, index + offset),
            None => side.roster[index] = Combatant::default(),
        }

        let slot = &mut side.roster[index];
        let details = pokemon.parsed_details();
        slot.known = true;
        slot.name = name;
        if !slot.transformed {
            slot.apply_details(&details);
        }

        if let Some(hp) = pokemon.hp_status() {
            if !hp.is_fainted() && hp.status.is_none() {
                slot.clear_major_status();
            }
            slot.apply_hp_status(&hp);
        }

        slot.stats = Some(pokemon.stats.into());
        slot.ability = pokemon
            .ability
            .clone()
            .or_else(|| pokemon.base_ability.clone())
            .filter(|a| !a.is_empty());
        if pokemon.item.is_empty() {
            if let Some(lost) = slot.item.take() {
                slot.last_item = Some(lost);
            }
        } else {
            slot.item = Some(pokemon.item.clone());
        }

        let known_moves: Vec<Move> = pokemon
            .moves
            .iter()
            .map(|id| {
                let mut m = Move::new(id);
                if let Some(existing) = slot.find_move(&m.id) {
                    m.clone_from(&slot.moves[existing]);
                }
                m
            })
            .collect();
        slot.moves = known_moves;
    }

    for slot in side.roster.iter_mut().skip(info.pokemon.len().min(ROSTER_SIZE)) {
        *slot = Combatant::default();
    }
}

fn switch_slots(side: &Side) -> Vec<usize> {
    side.switch_candidates().map(|index| index + 1).collect()
}

/// Gate a regular move request for the active combatant
fn gate_moves(side: &mut Side, active: &ActivePokemon) -> LegalActions {
    let combatant = side.active_mut();
    combatant.trapped = !active.can_switch();

    let locked = match active.moves.as_slice() {
        [only] => {
            let id = canonical_move_id(&only.id);
            let placeholder = Move::new(&id).is_placeholder();
            placeholder || (combatant.moves.len() > 1 && combatant.find_move(&id).is_some())
        }
        _ => false,
    };

    if locked {
        let id = canonical_move_id(&active.moves[0].id);
        for m in combatant.moves.iter_mut() {
            m.disabled = m.id != id;
        }
        combatant.recharge = id == "recharge";
        combatant.locked_move_first_index = true;

        return LegalActions {
            kind: DecisionKind::Locked,
            moves: vec![1],
            switches: Vec::new(),
            can_mega: false,
            z_moves: Vec::new(),
            maybe_trapped: active.maybe_trapped,
        };
    }

    combatant.recharge = false;
    combatant.locked_move_first_index = false;
    combatant.moves = active
        .moves
        .iter()
        .map(|slot| Move {
            id: canonical_move_id(&slot.id),
            name: Some(slot.name.clone()),
            pp: slot.pp,
            max_pp: slot.max_pp,
            disabled: slot.disabled,
        })
        .collect();

    let moves = combatant
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_usable())
        .map(|(index, _)| index + 1)
        .collect();

    let z_moves = if side.z_used {
        Vec::new()
    } else {
        (0..active.moves.len())
            .filter(|&index| active.can_z_move_at(index))
            .map(|index| index + 1)
            .collect()
    };

    let switches = if active.can_switch() {
        switch_slots(side)
    } else {
        Vec::new()
    };

    LegalActions {
        kind: DecisionKind::Free,
        moves,
        switches,
        can_mega: active.can_mega_evo && !side.mega_used,
        z_moves,
        maybe_trapped: active.maybe_trapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Effect;
    use vantage_protocol::{ServerMessage, parse_server_message};

    fn request(json: &str) -> BattleRequest {
        match parse_server_message(&format!("|request|{}", json)).unwrap() {
            ServerMessage::Request(Some(request)) => request,
            other => panic!("unexpected {:?}", other),
        }
    }

    const SIDE: &str = r#""side":{"name":"vantagebot","id":"p1","pokemon":[
        {"ident":"p1: Magnezone","details":"Magnezone, L84","condition":"250/250","active":true,"stats":{"atk":140,"def":248,"spa":265,"spd":182,"spe":140},"moves":["thunderbolt","hiddenpowerfire60","flashcannon","voltswitch"],"baseAbility":"magnetpull","item":"choicespecs"},
        {"ident":"p1: Garchomp","details":"Garchomp, L78, F","condition":"270/270","active":false,"stats":{"atk":240,"def":200,"spa":170,"spd":180,"spe":210},"moves":["earthquake","outrage","swordsdance","stoneedge"],"baseAbility":"roughskin","item":"lifeorb"},
        {"ident":"p1: Latias","details":"Latias, L80, F","condition":"0 fnt","active":false,"stats":{"atk":150,"def":190,"spa":230,"spd":250,"spe":230},"moves":["dracometeor","psychic","roost","calmmind"],"baseAbility":"levitate","item":"latiasite"}
    ]}"#;

    const SIDE_GARCHOMP_ACTIVE: &str = r#""side":{"name":"vantagebot","id":"p1","pokemon":[
        {"ident":"p1: Garchomp","details":"Garchomp, L78, F","condition":"270/270","active":true,"stats":{"atk":240,"def":200,"spa":170,"spd":180,"spe":210},"moves":["earthquake","outrage","swordsdance","stoneedge"],"baseAbility":"roughskin","item":"lifeorb"},
        {"ident":"p1: Magnezone","details":"Magnezone, L84","condition":"250/250","active":false,"stats":{"atk":140,"def":248,"spa":265,"spd":182,"spe":140},"moves":["thunderbolt","hiddenpowerfire60","flashcannon","voltswitch"],"baseAbility":"magnetpull","item":"choicespecs"},
        {"ident":"p1: Latias","details":"Latias, L80, F","condition":"0 fnt","active":false,"stats":{"atk":150,"def":190,"spa":230,"spd":250,"spe":230},"moves":["dracometeor","psychic","roost","calmmind"],"baseAbility":"levitate","item":"latiasite"}
    ]}"#;

    fn move_request(active: &str) -> BattleRequest {
        request(&format!(r#"{{"active":[{}],{},"rqid":4}}"#, active, SIDE))
    }

    #[test]
    fn test_roster_filled_in_request_order() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24,"target":"normal","disabled":false}]}"#,
        ));

        assert_eq!(battle.player.name, "vantagebot");
        assert_eq!(battle.player.known_count(), 3);
        assert_eq!(battle.player.roster[0].species, "Magnezone");
        assert_eq!(battle.player.roster[1].level, 78);
        assert_eq!(battle.player.roster[1].item.as_deref(), Some("lifeorb"));
        assert!(battle.player.roster[2].fainted);
        assert_eq!(battle.rqid(), Some(4));
    }

    #[test]
    fn test_free_decision() {
        let mut battle = BattleState::new();
        let immediate = battle.apply_request(move_request(
            r#"{"moves":[
                {"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24,"target":"normal","disabled":false},
                {"move":"Hidden Power Fire 60","id":"hiddenpowerfire60","pp":0,"maxpp":24,"target":"normal","disabled":false},
                {"move":"Flash Cannon","id":"flashcannon","pp":16,"maxpp":16,"target":"normal","disabled":true},
                {"move":"Volt Switch","id":"voltswitch","pp":32,"maxpp":32,"target":"normal","disabled":false}
            ],"canMegaEvo":true}"#,
        ));

        assert!(!immediate);
        let legal = battle.legal.clone().unwrap();
        assert_eq!(legal.kind, DecisionKind::Free);
        assert_eq!(legal.moves, vec![1, 4]);
        assert_eq!(legal.switches, vec![2]);
        assert!(legal.can_mega);

        let active = battle.player.active();
        assert_eq!(active.moves[1].id, "hiddenpowerfire");
        assert!(active.moves[2].disabled);
    }

    #[test]
    fn test_mega_already_used() {
        let mut battle = BattleState::new();
        battle.player.mega_used = true;
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24}],"canMegaEvo":true}"#,
        ));

        assert!(!battle.legal.unwrap().can_mega);
    }

    #[test]
    fn test_trapped_has_no_switches() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24},{"move":"Flash Cannon","id":"flashcannon","pp":16,"maxpp":16}],"trapped":true}"#,
        ));

        let legal = battle.legal.unwrap();
        assert!(legal.switches.is_empty());
        assert_eq!(legal.moves, vec![1, 2]);
        assert!(battle.player.active().trapped);
    }

    #[test]
    fn test_maybe_trapped_keeps_switches() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24}],"maybeTrapped":true}"#,
        ));

        let legal = battle.legal.unwrap();
        assert_eq!(legal.kind, DecisionKind::Free);
        assert_eq!(legal.switches, vec![2]);
        assert!(legal.maybe_trapped);
        assert!(!battle.player.active().trapped);
    }

    #[test]
    fn test_reordered_snapshot_cleans_outgoing_active() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24}]}"#,
        ));
        let magnezone = battle.player.active_mut();
        magnezone.boosts.spa = 2;
        magnezone.add_status(Effect::named("Confusion"));

        battle.apply_request(request(&format!(
            r#"{{"active":[{{"moves":[{{"move":"Earthquake","id":"earthquake","pp":16,"maxpp":16}}]}}],{},"rqid":5}}"#,
            SIDE_GARCHOMP_ACTIVE
        )));

        let side = &battle.player;
        assert_eq!(side.active().name, "Garchomp");
        let benched = &side.roster[side.find_by_name("Magnezone").unwrap()];
        assert!(benched.boosts.is_clear());
        assert!(!benched.has_status("confusion"));
    }

    #[test]
    fn test_locked_move() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Volt Switch","id":"voltswitch"}],"trapped":true}"#,
        ));

        let legal = battle.legal.unwrap();
        assert_eq!(legal.kind, DecisionKind::Locked);
        assert_eq!(legal.moves, vec![1]);
        assert!(legal.switches.is_empty());

        let active = battle.player.active();
        assert!(active.locked_move_first_index);
        assert!(!active.recharge);
        let enabled: Vec<_> = active
            .moves
            .iter()
            .filter(|m| !m.disabled)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(enabled, vec!["voltswitch"]);
    }

    #[test]
    fn test_recharge_placeholder() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Recharge","id":"recharge"}],"trapped":true}"#,
        ));

        assert_eq!(battle.legal.unwrap().kind, DecisionKind::Locked);
        assert!(battle.player.active().recharge);
    }

    #[test]
    fn test_force_switch() {
        let mut battle = BattleState::new();
        let immediate =
            battle.apply_request(request(&format!(r#"{{"forceSwitch":[true],{},"rqid":5}}"#, SIDE)));

        assert!(immediate);
        assert!(battle.player.force_switch_pending);
        let legal = battle.legal.unwrap();
        assert_eq!(legal.kind, DecisionKind::ForcedSwitch);
        assert!(legal.moves.is_empty());
        assert_eq!(legal.switches, vec![2]);
    }

    #[test]
    fn test_wait_clears_legal_actions() {
        let mut battle = BattleState::new();
        battle.apply_request(move_request(
            r#"{"moves":[{"move":"Thunderbolt","id":"thunderbolt","pp":24,"maxpp":24}]}"#,
        ));
        assert!(battle.legal.is_some());

        battle.apply_request(request(&format!(r#"{{"wait":true,{}}}"#, SIDE)));
        assert!(battle.legal.is_none());
    }

    #[test]
    fn test_move_choice_validation() {
        let legal = LegalActions {
            kind: DecisionKind::Free,
            moves: vec![1, 2],
            switches: vec![3],
            can_mega: false,
            z_moves: vec![2],
            maybe_trapped: false,
        };

        assert_eq!(legal.move_choice(1, false, false).unwrap(), "move 1");
        assert_eq!(legal.move_choice(2, false, true).unwrap(), "move 2 zmove");
        assert!(legal.move_choice(1, true, false).is_err());
        assert!(legal.move_choice(1, false, true).is_err());
        assert!(legal.move_choice(4, false, false).is_err());
        assert_eq!(legal.switch_choice(3).unwrap(), "switch 3");
        assert!(matches!(
            legal.switch_choice(2),
            Err(BattleError::IllegalAction(_))
        ));
    }
}
