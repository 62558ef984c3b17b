//! Battle progress message parsers
//!
//! These messages track the flow and state of a battle.

use super::ServerMessage;
use super::request::BattleRequest;
use crate::ParseError;
use anyhow::Result;

/// Parse |request|REQUEST (JSON)
///
/// The JSON may itself contain `|`, so everything after the tag is rejoined.
/// An empty body is the server's "nothing to decide" request.
pub fn parse_request(parts: &[&str]) -> Result<ServerMessage> {
    let json_str = parts.get(2..).map(|rest| rest.join("|")).unwrap_or_default();

    if json_str.trim().is_empty() {
        return Ok(ServerMessage::Request(None));
    }

    let request: BattleRequest = serde_json::from_str(&json_str)
        .map_err(|e| ParseError::InvalidRequest(e.to_string()))?;

    Ok(ServerMessage::Request(Some(request)))
}

/// Parse |upkeep
pub fn parse_upkeep(_parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Upkeep)
}

/// Parse |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<ServerMessage> {
    let turn = parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing turn number"))?;

    Ok(ServerMessage::Turn(turn))
}

/// Parse |win|USER
pub fn parse_win(parts: &[&str]) -> Result<ServerMessage> {
    let user = parts.get(2).unwrap_or(&"").to_string();
    Ok(ServerMessage::Win(user))
}

/// Parse |tie
pub fn parse_tie(_parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Tie)
}

/// Parse |-message|MESSAGE
pub fn parse_message(parts: &[&str]) -> Result<ServerMessage> {
    let message = parts.get(2..).map(|rest| rest.join("|")).unwrap_or_default();
    Ok(ServerMessage::Message(message))
}
