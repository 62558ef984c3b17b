//! Partial-information battle state for Pokemon Showdown.
//!
//! This crate turns the server's message stream into a structured picture
//! of one battle, seen from one player's side.
//!
//! # Overview
//!
//! `vantage-battle` sits between `vantage-protocol` (wire format) and the
//! session layer that talks to the server:
//!
//! ```text
//! vantage-protocol (wire format)
//!        │
//!        ▼
//! vantage-battle (state + interpreter + decision gate) ← THIS CRATE
//!        │
//!        ▼
//! vantage-client (session, transport, agents)
//! ```
//!
//! # Main Types
//!
//! ## Domain Model
//! - [`BattleState`] - Turn, phase, both sides and the field
//! - [`Side`] - A six-slot roster; slot 0 is always the active combatant
//! - [`Combatant`] - What is known about one team member
//! - [`Effect`] - A named condition with a turn counter and layers
//! - [`FieldState`] - Weather, terrain and pseudo-weather
//!
//! ## Tracking
//! - [`Interpreter`] - Applies server frames to a [`BattleState`]
//! - [`LegalActions`] - What the agent may do at the current decision point
//!
//! # Example Usage
//!
//! ```ignore
//! use vantage_battle::{Interpreter, InterpreterConfig, Signal};
//!
//! let mut interpreter = Interpreter::new(InterpreterConfig::new("vantagebot"));
//!
//! for frame in frames {
//!     match interpreter.interpret(&frame)? {
//!         Signal::Decide => {
//!             let legal = interpreter.state().legal.as_ref().unwrap();
//!             let choice = legal.move_choice(legal.moves[0], false, false)?;
//!             // send `/choose {choice}|{rqid}`
//!         }
//!         Signal::Ended => break,
//!         Signal::Continue => {}
//!     }
//! }
//! ```

use thiserror::Error;

pub mod tracking;
pub mod types;

// Re-export main types at crate root for convenience
pub use tracking::{
    BattleState, DecisionKind, Interpreter, InterpreterConfig, LegalActions, Phase, SideId,
    Signal, Slot,
};
pub use types::{
    BattleStats, BuiltinCatalog, Combatant, CombatStats, Effect, EffectCatalog, EffectClass,
    FieldState, Move, ROSTER_SIZE, Side, StatStages, Status,
};

// Re-export commonly used protocol types
pub use vantage_protocol::{Player, Stat};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    /// A reference named a side neither player is bound to. The battle is
    /// aborted when this happens.
    #[error("Reference {reference} does not belong to either side")]
    Identity { reference: String },

    #[error("Illegal action: {0}")]
    IllegalAction(String),
}
