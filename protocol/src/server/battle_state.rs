//! Field and side condition message parsers

use super::ServerMessage;
use super::battle::{Annotations, parse_field, parse_side};
use anyhow::Result;

/// Parse |-sidestart|SIDE|CONDITION
pub fn parse_sidestart(parts: &[&str]) -> Result<ServerMessage> {
    let side = parse_side(parts, 2)?;
    let condition = parse_field(parts, 3, "condition")?;

    Ok(ServerMessage::SideStart { side, condition })
}

/// Parse |-sideend|SIDE|CONDITION
pub fn parse_sideend(parts: &[&str]) -> Result<ServerMessage> {
    let side = parse_side(parts, 2)?;
    let condition = parse_field(parts, 3, "condition")?;

    Ok(ServerMessage::SideEnd { side, condition })
}

/// Parse |-weather|WEATHER, where WEATHER is "none" once it subsides
pub fn parse_weather(parts: &[&str]) -> Result<ServerMessage> {
    let weather = parse_field(parts, 2, "weather")?;

    Ok(ServerMessage::Weather {
        weather,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-fieldstart|CONDITION
pub fn parse_fieldstart(parts: &[&str]) -> Result<ServerMessage> {
    let condition = parse_field(parts, 2, "condition")?;

    Ok(ServerMessage::FieldStart {
        condition,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-fieldend|CONDITION
pub fn parse_fieldend(parts: &[&str]) -> Result<ServerMessage> {
    let condition = parse_field(parts, 2, "condition")?;
    Ok(ServerMessage::FieldEnd { condition })
}
