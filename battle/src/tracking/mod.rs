//! Battle state tracking from server messages

mod battle;
mod decision;
mod interpreter;
mod resolver;

pub use battle::{BattleState, Phase, SideId};
pub use decision::{DecisionKind, LegalActions};
pub use interpreter::{Interpreter, InterpreterConfig, Signal};
pub use resolver::Slot;
