//! Identity resolution: protocol references to roster slots

use vantage_protocol::{HpStatus, Player, Pokemon, PokemonDetails, to_id};

use super::battle::{BattleState, Phase, SideId};
use crate::BattleError;
use crate::types::{Combatant, Side, Status};

/// Species that can disguise themselves as another team member
const ILLUSION_FAMILY: &[&str] = &["zoroark", "zorua", "zoroarkhisui", "zoruahisui"];

pub(crate) fn is_illusion_family(name_or_species: &str) -> bool {
    ILLUSION_FAMILY.contains(&to_id(name_or_species).as_str())
}

/// A resolved roster slot
pub type Slot = (SideId, usize);

impl BattleState {
    /// Side a reference belongs to. A reference to neither bound side
    /// aborts the battle.
    pub fn side_of(&mut self, pokemon: &Pokemon) -> Result<SideId, BattleError> {
        self.bound_side(pokemon.player, || {
            format!("{}: {}", pokemon.player.as_str(), pokemon.name)
        })
    }

    /// Side bound to a player tag, or an identity failure that aborts the
    /// battle
    pub fn bound_side(
        &mut self,
        player: Player,
        reference: impl FnOnce() -> String,
    ) -> Result<SideId, BattleError> {
        match self.side_id(player) {
            Some(id) => Ok(id),
            None => {
                let reference = reference();
                tracing::error!(%reference, "reference to unbound side");
                self.phase = Phase::Aborted;
                Err(BattleError::Identity { reference })
            }
        }
    }

    /// Map a reference to a roster slot without moving anything.
    ///
    /// Matches by nickname first, then by species when details are given,
    /// and otherwise reveals the first unknown slot. Returns `Ok(None)` when
    /// all six slots are known and none matches.
    pub fn resolve(
        &mut self,
        pokemon: &Pokemon,
        details: Option<&PokemonDetails>,
    ) -> Result<Option<Slot>, BattleError> {
        let id = self.side_of(pokemon)?;
        let side = self.side_mut(id);

        let found = side.find_by_name(&pokemon.name).or_else(|| {
            details
                .filter(|d| !d.species.is_empty())
                .and_then(|d| side.find_by_species(&d.species))
        });

        if let Some(index) = found {
            return Ok(Some((id, index)));
        }

        match side.first_unknown() {
            Some(index) => {
                side.roster[index].reveal(&pokemon.name, details);
                tracing::debug!(
                    side = ?id,
                    slot = index,
                    name = %pokemon.name,
                    "revealed roster slot"
                );
                Ok(Some((id, index)))
            }
            None => {
                tracing::warn!(
                    side = ?id,
                    name = %pokemon.name,
                    "no roster slot left for reference, skipping"
                );
                Ok(None)
            }
        }
    }

    pub fn combatant(&self, (id, index): Slot) -> &Combatant {
        &self.side(id).roster[index]
    }

    pub fn combatant_mut(&mut self, (id, index): Slot) -> &mut Combatant {
        &mut self.side_mut(id).roster[index]
    }

    /// Resolve a reference and return the combatant it names
    pub fn locate(&mut self, pokemon: &Pokemon) -> Result<Option<&mut Combatant>, BattleError> {
        Ok(self
            .resolve(pokemon, None)?
            .map(|slot| self.combatant_mut(slot)))
    }

    /// Handle switch/drag: resolve, move into slot 0, refresh details and hp
    pub fn switch_in(
        &mut self,
        pokemon: &Pokemon,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
    ) -> Result<Option<Slot>, BattleError> {
        let Some((id, index)) = self.resolve(pokemon, Some(details))? else {
            return Ok(None);
        };

        let side = self.side_mut(id);
        side.pre_switch = Some(side.roster[index].clone());
        side.bring_in(index);

        let active = side.active_mut();
        active.on_switch_in();
        active.apply_details(details);
        if let Some(hp) = hp_status {
            active.apply_hp_status(hp);
        }
        if id == SideId::Player {
            side.force_switch_pending = false;
        }

        Ok(Some((id, 0)))
    }

    /// Handle `replace`: the active combatant was an illusion and is really
    /// the one described.
    pub fn replace_active(
        &mut self,
        pokemon: &Pokemon,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
    ) -> Result<Option<Slot>, BattleError> {
        let id = self.side_of(pokemon)?;
        let side = self.side_mut(id);

        let real = side
            .find_by_name(&pokemon.name)
            .or_else(|| side.find_by_species(&details.species));

        if real != Some(0) {
            let observed = undo_disguise(side);
            match real {
                Some(index) => side.roster.swap(0, index),
                None => match side.first_unknown() {
                    Some(free) => {
                        side.roster.swap(0, free);
                        side.active_mut().reveal(&pokemon.name, Some(details));
                    }
                    None => relabel_active(side, &pokemon.name),
                },
            }
            hand_over_in_play(side.active_mut(), observed);
        }
        side.pre_switch = None;

        let active = side.active_mut();
        active.apply_details(details);
        if let Some(hp) = hp_status {
            active.apply_hp_status(hp);
        }

        tracing::debug!(side = ?id, name = %pokemon.name, "illusion replaced");
        Ok(Some((id, 0)))
    }
}

/// Put the impersonated combatant's record in slot 0 back the way it was
/// before the disguised switch-in. Returns what was observed on the field
/// under the disguise, narrowed to what was learned since: moves, and the
/// ability or item when they differ from the restored record.
fn undo_disguise(side: &mut Side) -> Combatant {
    let restored = match side.pre_switch.take() {
        Some(before) if before.known => before,
        // Revealed by the disguised switch-in: only the identity is real
        Some(_) => identity_of(side.active()),
        None => side.active().clone(),
    };

    let mut observed = std::mem::replace(&mut side.roster[0], restored);
    let restored = &mut side.roster[0];
    restored.on_switch_out();
    observed
        .moves
        .retain(|m| restored.find_move(&m.id).is_none());
    if observed.ability == restored.ability {
        observed.ability = None;
    }
    if observed.item == restored.item {
        observed.item = None;
    }
    observed
}

fn identity_of(combatant: &Combatant) -> Combatant {
    Combatant {
        known: combatant.known,
        name: combatant.name.clone(),
        species: combatant.species.clone(),
        gender: combatant.gender,
        level: combatant.level,
        ..Combatant::default()
    }
}

/// Move what happened on the field under the disguise onto the real
/// combatant now in slot 0
fn hand_over_in_play(active: &mut Combatant, observed: Combatant) {
    active.boosts = observed.boosts;
    active.battle_stats = observed.battle_stats;
    active.trapped = observed.trapped;
    active.recharge = observed.recharge;
    active.health = observed.health;
    active.max_health = observed.max_health;

    for effect in observed.statuses {
        if !Status::is_major(&effect.id) {
            active.add_status(effect);
        }
    }
    for observed_move in observed.moves {
        if active.find_move(&observed_move.id).is_none() {
            active.moves.push(observed_move);
        }
    }
    if observed.ability.is_some() && active.ability.is_none() {
        active.ability = observed.ability;
    }
    if observed.item.is_some() && active.item.is_none() {
        active.item = observed.item;
    }
}

/// No free slot: the active record is relabeled in place
fn relabel_active(side: &mut Side, name: &str) {
    let active = side.active_mut();
    active.known = true;
    active.name = name.to_string();
    active.moves.clear();
    active.ability = None;
    active.item = None;
    active.last_item = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle() -> BattleState {
        let mut battle = BattleState::new();
        battle.bind_player(Player::P1);
        battle
    }

    fn opp(name: &str) -> Pokemon {
        Pokemon::parse(&format!("p2a: {}", name)).unwrap()
    }

    fn details(s: &str) -> PokemonDetails {
        PokemonDetails::parse(s)
    }

    #[test]
    fn test_first_reference_reveals_slot_zero() {
        let mut battle = battle();
        let slot = battle
            .switch_in(&opp("Metagross"), &details("Metagross, M"), None)
            .unwrap();

        assert_eq!(slot, Some((SideId::Opponent, 0)));
        assert!(battle.opponent.roster[0].known);
        assert_eq!(battle.opponent.known_count(), 1);
    }

    #[test]
    fn test_switch_brings_known_slot_forward() {
        let mut battle = battle();
        battle.switch_in(&opp("Metagross"), &details("Metagross"), None).unwrap();
        battle.switch_in(&opp("Latios"), &details("Latios, M"), None).unwrap();

        assert_eq!(battle.opponent.active().name, "Latios");
        assert_eq!(battle.opponent.roster[1].name, "Metagross");

        battle.switch_in(&opp("Metagross"), &details("Metagross"), None).unwrap();
        assert_eq!(battle.opponent.active().name, "Metagross");
        assert_eq!(battle.opponent.roster[1].name, "Latios");
        assert_eq!(battle.opponent.known_count(), 2);
    }

    #[test]
    fn test_unbound_side_aborts() {
        let mut battle = BattleState::new();
        let result = battle.resolve(&opp("Metagross"), None);

        assert!(matches!(result, Err(BattleError::Identity { .. })));
        assert_eq!(battle.phase, Phase::Aborted);
    }

    #[test]
    fn test_seventh_reference_is_skipped() {
        let mut battle = battle();
        for name in ["A", "B", "C", "D", "E", "F"] {
            battle.switch_in(&opp(name), &details(name), None).unwrap();
        }

        let result = battle.switch_in(&opp("G"), &details("G"), None).unwrap();
        assert_eq!(result, None);
        assert_eq!(battle.opponent.known_count(), 6);
    }

    #[test]
    fn test_replace_with_free_slot() {
        let mut battle = battle();
        battle.switch_in(&opp("Tyranitar"), &details("Tyranitar"), None).unwrap();
        battle.switch_in(&opp("Snorlax"), &details("Snorlax"), None).unwrap();

        battle
            .replace_active(&opp("Zoroark"), &details("Zoroark, M"), None)
            .unwrap();

        let side = &battle.opponent;
        assert_eq!(side.active().name, "Zoroark");
        assert_eq!(side.active().species, "Zoroark");
        assert_eq!(side.known_count(), 3);
        assert!(side.find_by_name("Snorlax").is_some());
        assert!(side.find_by_name("Tyranitar").is_some());
    }

    #[test]
    fn test_replace_with_known_real_identity() {
        let mut battle = battle();
        battle.switch_in(&opp("Zoroark"), &details("Zoroark"), None).unwrap();
        battle.switch_in(&opp("Snorlax"), &details("Snorlax"), None).unwrap();

        battle
            .replace_active(&opp("Zoroark"), &details("Zoroark"), None)
            .unwrap();

        let side = &battle.opponent;
        assert_eq!(side.active().name, "Zoroark");
        assert_eq!(side.roster[1].name, "Snorlax");
        assert_eq!(side.known_count(), 2);
    }

    #[test]
    fn test_replace_without_free_slot_relabels() {
        let mut battle = battle();
        for name in ["A", "B", "C", "D", "E", "F"] {
            battle.switch_in(&opp(name), &details(name), None).unwrap();
        }

        battle
            .replace_active(&opp("Zoroark"), &details("Zoroark"), None)
            .unwrap();

        assert_eq!(battle.opponent.active().name, "Zoroark");
        assert_eq!(battle.opponent.known_count(), 6);
    }

    #[test]
    fn test_illusion_family() {
        assert!(is_illusion_family("Zoroark"));
        assert!(is_illusion_family("Zoroark-Hisui"));
        assert!(!is_illusion_family("Snorlax"));
    }
}
