//! Domain types for battle state tracking

mod catalog;
mod combatant;
mod effect;
mod field;
mod side;
mod stats;
mod status;

pub use catalog::{BuiltinCatalog, EffectCatalog, EffectClass};
pub use combatant::{
    Combatant, Move, PLACEHOLDER_MOVES, UNKNOWN_SPECIES, canonical_move_id,
};
pub use effect::{Effect, effect_id, effect_name};
pub use field::FieldState;
pub use side::{ROSTER_SIZE, Side};
pub use stats::{BattleStats, CombatStats, StatStages};
pub use status::Status;
