use super::{RoomType, ServerMessage};
use crate::ParseError;
use anyhow::Result;

pub fn parse_init(parts: &[&str]) -> Result<ServerMessage> {
    if parts.len() < 3 {
        return Err(ParseError::MissingField("init fields".to_string()).into());
    }

    let room_type = match parts[2] {
        "chat" => RoomType::Chat,
        "battle" => RoomType::Battle,
        _ => {
            return Err(
                ParseError::InvalidFormat(format!("unknown room type: {}", parts[2])).into(),
            );
        }
    };

    Ok(ServerMessage::Init(room_type))
}

pub fn parse_deinit(_parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Deinit)
}
