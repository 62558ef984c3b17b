//! Side (player) state

use vantage_protocol::Player;

use super::combatant::Combatant;
use super::effect::Effect;

pub const ROSTER_SIZE: usize = 6;

/// One player's side of the battle. Slot 0 of the roster is always the
/// active combatant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Side {
    /// Player's username
    pub name: String,

    /// Which protocol player this side is, once known
    #[cfg_attr(feature = "serde", serde(skip))]
    pub player: Option<Player>,

    pub roster: [Combatant; ROSTER_SIZE],

    pub mega_used: bool,
    pub z_used: bool,
    pub force_switch_pending: bool,

    /// Side conditions (hazards, screens, etc.)
    pub conditions: Vec<Effect>,

    /// The active record as it was before its latest switch-in, kept so an
    /// illusion can be undone
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pre_switch: Option<Combatant>,
}

impl Default for Side {
    fn default() -> Self {
        Self {
            name: String::new(),
            player: None,
            roster: std::array::from_fn(|_| Combatant::default()),
            mega_used: false,
            z_used: false,
            force_switch_pending: false,
            conditions: Vec::new(),
            pre_switch: None,
        }
    }
}

impl Side {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &Combatant {
        &self.roster[0]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.roster[0]
    }

    /// Find a revealed slot by nickname
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.roster.iter().position(|c| c.known && c.name == name)
    }

    /// Find a revealed, untransformed slot by species
    pub fn find_by_species(&self, species: &str) -> Option<usize> {
        self.roster
            .iter()
            .position(|c| c.known && !c.transformed && c.species == species)
    }

    pub fn first_unknown(&self) -> Option<usize> {
        self.roster.iter().position(|c| !c.known)
    }

    pub fn known_count(&self) -> usize {
        self.roster.iter().filter(|c| c.known).count()
    }

    /// Bring the combatant at `index` into the active slot. The outgoing
    /// combatant takes the vacated index, and every benched combatant runs
    /// its switch-out cleanup. A request snapshot may already have moved
    /// the incoming record to slot 0, so `index == 0` still cleans the bench.
    pub fn bring_in(&mut self, index: usize) {
        self.roster.swap(0, index);
        for benched in self.roster.iter_mut().skip(1) {
            benched.on_switch_out();
        }
    }

    /// 0-based indices of benched combatants that can be switched in
    pub fn switch_candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.roster
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, c)| c.known && c.is_alive())
            .map(|(index, _)| index)
    }

    pub fn find_condition(&self, id: &str) -> Option<&Effect> {
        self.conditions.iter().find(|effect| effect.id == id)
    }

    /// Start a condition, or add a layer to it up to `max_layers`
    pub fn add_condition(&mut self, effect: Effect, max_layers: u8) {
        match self.conditions.iter_mut().find(|e| e.id == effect.id) {
            Some(existing) => {
                existing.layers = existing.layers.saturating_add(1).min(max_layers.max(1));
            }
            None => self.conditions.push(effect),
        }
    }

    pub fn remove_condition(&mut self, id: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|effect| effect.id != id);
        self.conditions.len() != before
    }

    /// Upkeep for this side: single-turn volatiles are dropped, then
    /// conditions and the active combatant's statuses age by one
    pub fn age_effects(&mut self) {
        for combatant in self.roster.iter_mut() {
            combatant.drop_single_turn();
        }
        self.conditions.iter_mut().for_each(Effect::age);
        if self.roster[0].known {
            self.roster[0].age_statuses();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_protocol::PokemonDetails;

    fn revealed(name: &str) -> Combatant {
        let mut combatant = Combatant::default();
        combatant.reveal(name, Some(&PokemonDetails::parse(name)));
        combatant
    }

    #[test]
    fn test_new_side_has_six_unknown_slots() {
        let side = Side::new();
        assert_eq!(side.roster.len(), ROSTER_SIZE);
        assert_eq!(side.known_count(), 0);
        assert_eq!(side.first_unknown(), Some(0));
    }

    #[test]
    fn test_bring_in_swaps_and_cleans_up() {
        let mut side = Side::new();
        side.roster[0] = revealed("Tyranitar");
        side.roster[3] = revealed("Scizor");
        side.roster[0].boosts.atk = 2;

        side.bring_in(3);

        assert_eq!(side.active().name, "Scizor");
        assert_eq!(side.roster[3].name, "Tyranitar");
        assert!(side.roster[3].boosts.is_clear());
        assert_eq!(side.known_count(), 2);
    }

    #[test]
    fn test_bring_in_active_still_cleans_bench() {
        let mut side = Side::new();
        side.roster[0] = revealed("Scizor");
        side.roster[1] = revealed("Tyranitar");
        side.roster[1].boosts.atk = 2;
        side.roster[1].add_status(Effect::named("Confusion"));

        side.bring_in(0);

        assert_eq!(side.active().name, "Scizor");
        assert!(side.roster[1].boosts.is_clear());
        assert!(!side.roster[1].has_status("confusion"));
    }

    #[test]
    fn test_find_by_species_skips_transformed() {
        let mut side = Side::new();
        side.roster[0] = revealed("Ditto");
        side.roster[0].species = "Garchomp".into();
        side.roster[0].transformed = true;

        assert_eq!(side.find_by_species("Garchomp"), None);
        assert_eq!(side.find_by_name("Ditto"), Some(0));
    }

    #[test]
    fn test_condition_layers() {
        let mut side = Side::new();
        for _ in 0..4 {
            side.add_condition(Effect::named("Spikes"), 3);
        }
        assert_eq!(side.conditions.len(), 1);
        assert_eq!(side.find_condition("spikes").unwrap().layers, 3);

        assert!(side.remove_condition("spikes"));
        assert!(!side.remove_condition("spikes"));
    }

    #[test]
    fn test_condition_layers_saturate() {
        let mut side = Side::new();
        side.add_condition(Effect::named("Spikes"), u8::MAX);
        side.conditions[0].layers = u8::MAX;

        side.add_condition(Effect::named("Spikes"), u8::MAX);
        assert_eq!(side.find_condition("spikes").unwrap().layers, u8::MAX);
    }

    #[test]
    fn test_switch_candidates() {
        let mut side = Side::new();
        side.roster[0] = revealed("Tyranitar");
        side.roster[1] = revealed("Scizor");
        side.roster[2] = revealed("Latios");
        side.roster[2].faint();

        let candidates: Vec<_> = side.switch_candidates().collect();
        assert_eq!(candidates, vec![1]);
    }
}
