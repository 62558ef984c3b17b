//! Combatant and move state

use vantage_protocol::{Gender, HpStatus, PokemonDetails, to_id};

use super::effect::Effect;
use super::stats::{BattleStats, CombatStats, StatStages};
use super::status::Status;

/// Species placeholder for slots whose species is not (or no longer) known
pub const UNKNOWN_SPECIES: &str = "";

/// Move ids the server sends in place of a real move while a combatant is
/// locked into an action
pub const PLACEHOLDER_MOVES: &[&str] = &["recharge", "struggle"];

const PARAMETERIZED_MOVES: &[&str] = &["hiddenpower", "return", "frustration"];

/// Canonical move id. Parameterized families lose their numeric suffix
/// ("hiddenpowerfire60" -> "hiddenpowerfire", "return102" -> "return").
pub fn canonical_move_id(raw: &str) -> String {
    let id = to_id(raw);
    if PARAMETERIZED_MOVES.iter().any(|family| id.starts_with(family)) {
        id.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
    } else {
        id
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Move {
    pub id: String,
    pub name: Option<String>,
    pub pp: Option<u32>,
    pub max_pp: Option<u32>,
    pub disabled: bool,
}

impl Move {
    pub fn new(raw: &str) -> Self {
        Self {
            id: canonical_move_id(raw),
            name: None,
            pp: None,
            max_pp: None,
            disabled: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        PLACEHOLDER_MOVES.contains(&self.id.as_str())
    }

    /// Usable if not disabled and not known to be out of pp
    pub fn is_usable(&self) -> bool {
        !self.disabled && self.pp.is_none_or(|pp| pp > 0)
    }
}

/// One roster slot on a side
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Combatant {
    /// Whether the slot has been revealed
    pub known: bool,
    pub name: String,
    pub species: String,
    pub gender: Gender,
    pub level: u8,

    /// Raw hp for our own team, percentage for the opponent
    pub health: f32,
    /// 100 when only a percentage is known
    pub max_health: f32,
    pub fainted: bool,

    /// Major status plus any volatiles, unique by id
    pub statuses: Vec<Effect>,
    pub moves: Vec<Move>,
    pub boosts: StatStages,
    pub battle_stats: BattleStats,
    pub stats: Option<CombatStats>,

    pub ability: Option<String>,
    pub item: Option<String>,
    /// Last item lost or consumed
    pub last_item: Option<String>,

    pub trapped: bool,
    pub transformed: bool,
    pub mega: bool,
    pub recharge: bool,
    pub locked_move_first_index: bool,
}

impl Default for Combatant {
    fn default() -> Self {
        Self {
            known: false,
            name: String::new(),
            species: UNKNOWN_SPECIES.to_string(),
            gender: Gender::Neutral,
            level: 100,
            health: 100.0,
            max_health: 100.0,
            fainted: false,
            statuses: Vec::new(),
            moves: Vec::new(),
            boosts: StatStages::new(),
            battle_stats: BattleStats::default(),
            stats: None,
            ability: None,
            item: None,
            last_item: None,
            trapped: false,
            transformed: false,
            mega: false,
            recharge: false,
            locked_move_first_index: false,
        }
    }
}

impl Combatant {
    /// Reveal an unknown slot as the named combatant
    pub fn reveal(&mut self, name: &str, details: Option<&PokemonDetails>) {
        self.known = true;
        self.name = name.to_string();
        match details {
            Some(details) => self.apply_details(details),
            None => self.species = UNKNOWN_SPECIES.to_string(),
        }
    }

    /// Apply species, level and gender from a details string
    pub fn apply_details(&mut self, details: &PokemonDetails) {
        self.species = details.species.clone();
        self.level = details.level.unwrap_or(100).clamp(1, 100);
        self.gender = details.gender.unwrap_or_default();
    }

    /// Apply hp and the optional status token. A missing status token
    /// leaves the current major status in place.
    pub fn apply_hp_status(&mut self, hp_status: &HpStatus) {
        if let Some(max) = hp_status.max {
            self.max_health = max;
        }
        self.health = hp_status.current;

        match hp_status.status.as_deref() {
            Some("fnt") => self.faint(),
            Some(status) if Status::is_major(status) => self.set_major_status(status),
            _ => {
                if self.health > 0.0 {
                    self.fainted = false;
                }
            }
        }
    }

    pub fn faint(&mut self) {
        self.health = 0.0;
        self.fainted = true;
        self.statuses.clear();
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted
    }

    pub fn major_status(&self) -> Option<Status> {
        self.statuses
            .iter()
            .find_map(|effect| Status::from_protocol(&effect.id))
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.statuses.iter().any(|effect| effect.id == id)
    }

    /// Add an effect unless one with the same id is already present. A new
    /// major status replaces the old one.
    pub fn add_status(&mut self, effect: Effect) {
        if self.has_status(&effect.id) {
            return;
        }
        if Status::is_major(&effect.id) {
            self.clear_major_status();
        }
        self.statuses.push(effect);
    }

    pub fn set_major_status(&mut self, status: &str) {
        self.add_status(Effect::new(status, status));
    }

    pub fn clear_major_status(&mut self) {
        self.statuses.retain(|effect| !Status::is_major(&effect.id));
    }

    pub fn remove_status(&mut self, id: &str) -> bool {
        let before = self.statuses.len();
        self.statuses.retain(|effect| effect.id != id);
        self.statuses.len() != before
    }

    pub fn clear_volatiles(&mut self) {
        self.statuses.retain(|effect| Status::is_major(&effect.id));
    }

    pub fn drop_single_turn(&mut self) {
        self.statuses.retain(|effect| !effect.single_turn);
    }

    pub fn age_statuses(&mut self) {
        self.statuses.iter_mut().for_each(Effect::age);
    }

    pub fn find_move(&self, id: &str) -> Option<usize> {
        self.moves.iter().position(|m| m.id == id)
    }

    /// Record a move observed in use, keeping ids unique
    pub fn learn_move(&mut self, raw: &str) {
        let mut observed = Move::new(raw);
        if self.find_move(&observed.id).is_none() {
            observed.name = Some(raw.to_string());
            self.moves.push(observed);
        }
    }

    /// Record an item, unless it is the one this combatant already lost
    pub fn attribute_item(&mut self, item: &str) {
        if self.last_item.as_deref() == Some(item) {
            return;
        }
        self.item = Some(item.to_string());
    }

    pub fn lose_item(&mut self, item: &str) {
        self.item = None;
        self.last_item = Some(item.to_string());
    }

    /// Called when this combatant leaves the active slot
    pub fn on_switch_out(&mut self) {
        self.boosts.clear();
        self.battle_stats.clear();
        self.clear_volatiles();
        self.trapped = false;
        self.recharge = false;
        self.locked_move_first_index = false;
    }

    /// Called before switch-in details are applied. A transformed
    /// combatant returns to an unknown species until the details say
    /// otherwise.
    pub fn on_switch_in(&mut self) {
        if self.transformed {
            self.species = UNKNOWN_SPECIES.to_string();
            self.transformed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_move_id() {
        assert_eq!(canonical_move_id("hiddenpowerfire60"), "hiddenpowerfire");
        assert_eq!(canonical_move_id("Hidden Power Ice"), "hiddenpowerice");
        assert_eq!(canonical_move_id("return102"), "return");
        assert_eq!(canonical_move_id("frustration102"), "frustration");
        assert_eq!(canonical_move_id("Thunderbolt"), "thunderbolt");
        assert_eq!(canonical_move_id("U-turn"), "uturn");
    }

    #[test]
    fn test_default_is_unknown() {
        let combatant = Combatant::default();
        assert!(!combatant.known);
        assert_eq!(combatant.max_health, 100.0);
        assert_eq!(combatant.level, 100);
        assert!(combatant.moves.is_empty());
    }

    #[test]
    fn test_single_major_status() {
        let mut combatant = Combatant::default();
        combatant.set_major_status("brn");
        combatant.set_major_status("brn");
        assert_eq!(combatant.statuses.len(), 1);

        combatant.add_status(Effect::named("confusion"));
        combatant.set_major_status("par");
        assert_eq!(combatant.statuses.len(), 2);
        assert_eq!(combatant.major_status(), Some(Status::Paralysis));
    }

    #[test]
    fn test_apply_hp_status() {
        let mut combatant = Combatant::default();
        combatant.apply_hp_status(&HpStatus::parse("32/100 brn").unwrap());

        assert_eq!(combatant.health, 32.0);
        assert_eq!(combatant.max_health, 100.0);
        assert_eq!(combatant.major_status(), Some(Status::Burn));

        combatant.apply_hp_status(&HpStatus::parse("0 fnt").unwrap());
        assert!(combatant.fainted);
        assert!(combatant.statuses.is_empty());
    }

    #[test]
    fn test_switch_out_keeps_major_status() {
        let mut combatant = Combatant::default();
        combatant.set_major_status("tox");
        combatant.add_status(Effect::named("substitute"));
        combatant.boosts.atk = 2;
        combatant.trapped = true;

        combatant.on_switch_out();

        assert_eq!(combatant.statuses.len(), 1);
        assert!(combatant.has_status("tox"));
        assert!(combatant.boosts.is_clear());
        assert!(!combatant.trapped);
    }

    #[test]
    fn test_learn_move_unique() {
        let mut combatant = Combatant::default();
        combatant.learn_move("Earthquake");
        combatant.learn_move("Earthquake");
        combatant.learn_move("Hidden Power Fire");

        assert_eq!(combatant.moves.len(), 2);
        assert_eq!(combatant.moves[1].id, "hiddenpowerfire");
    }

    #[test]
    fn test_consumed_item_not_reattributed() {
        let mut combatant = Combatant::default();
        combatant.attribute_item("Sitrus Berry");
        combatant.lose_item("Sitrus Berry");
        combatant.attribute_item("Sitrus Berry");

        assert_eq!(combatant.item, None);
        assert_eq!(combatant.last_item.as_deref(), Some("Sitrus Berry"));
    }

    #[test]
    fn test_switch_in_after_transform() {
        let mut combatant = Combatant::default();
        combatant.reveal("Ditto", Some(&PokemonDetails::parse("Ditto")));
        combatant.species = "Garchomp".into();
        combatant.transformed = true;

        combatant.on_switch_in();

        assert!(!combatant.transformed);
        assert_eq!(combatant.species, UNKNOWN_SPECIES);
    }
}
