//! Battle initialization message parsers
//!
//! These messages are sent at the start of a battle to set up the game state.

use super::ServerMessage;
use super::battle::Player;
use anyhow::Result;

/// Parse |player|PLAYER|USERNAME|AVATAR|RATING
///
/// The server repeats this line with an empty username when a player leaves.
pub fn parse_player(parts: &[&str]) -> Result<ServerMessage> {
    let player = parts
        .get(2)
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Missing player"))?;

    let username = parts.get(3).unwrap_or(&"").to_string();

    Ok(ServerMessage::Player { player, username })
}

/// Parse |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<ServerMessage> {
    let generation = parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing generation"))?;

    Ok(ServerMessage::Gen(generation))
}

/// Parse |tier|FORMATNAME
pub fn parse_tier(parts: &[&str]) -> Result<ServerMessage> {
    let format = parts.get(2).unwrap_or(&"").to_string();
    Ok(ServerMessage::Tier(format))
}
