use thiserror::Error;
use vantage_battle::BattleError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// The transport failed; the session cannot be used any more
    #[error("Transport error: {0:#}")]
    Transport(anyhow::Error),

    #[error("Authentication failed: {0:#}")]
    Auth(anyhow::Error),

    #[error("Session is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SessionError>;
