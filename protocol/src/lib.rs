use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{ClientCommand, ClientMessage};
pub use server::{
    ActivePokemon, Annotations, BattleRequest, Gender, HpStatus, MoveSlot, Player, Pokemon,
    PokemonDetails, RequestKind, RoomType, ServerFrame, ServerMessage, Side, SideInfo,
    SidePokemon, Stat, parse_server_frame, parse_server_message,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,

    #[error("Unrecognized request shape: {0}")]
    InvalidRequest(String),
}

/// Normalize a name the way the server builds ids: lowercase ASCII
/// alphanumerics only ("Mr. Mime" -> "mrmime", "U-turn" -> "uturn").
pub fn to_id(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
