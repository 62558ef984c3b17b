//! Pokemon Showdown battle sessions.
//!
//! Connects to a server, logs in and plays one battle at a time through a
//! turn-based action API: [`BattleSession::submit_move`],
//! [`BattleSession::submit_switch`], [`BattleSession::reset`] and
//! [`BattleSession::close`].

mod auth;
mod config;
mod error;
mod session;
mod tests;
mod transport;

pub use config::{
    ACTION_URL, ClientConfig, Credentials, DEFAULT_FORMAT, LOGIN_URL, SHOWDOWN_URL,
};
pub use error::{Result, SessionError};
pub use session::BattleSession;
pub use transport::{Transport, WebSocketTransport};

pub use vantage_battle::{
    BattleError, BattleState, DecisionKind, LegalActions, Phase, SideId, Signal,
};
pub use vantage_protocol::{ClientCommand, ClientMessage, ServerFrame, ServerMessage};
