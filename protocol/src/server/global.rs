use super::ServerMessage;
use crate::ParseError;
use anyhow::Result;

/// A user as the server prints it: a one-character rank, the display name,
/// and an optional `@status` suffix (e.g. " Guest 123" or "+Red@!")
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub rank: char,
    pub name: String,
    pub away: bool,
}

impl User {
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let rank = chars.next()?;
        let rest = chars.as_str();

        let (name, status) = match rest.split_once('@') {
            Some((name, status)) => (name, Some(status)),
            None => (rest, None),
        };

        if name.trim().is_empty() {
            return None;
        }

        Some(User {
            rank,
            name: name.trim().to_string(),
            away: status.map(|s| s.starts_with('!')).unwrap_or(false),
        })
    }
}

pub fn parse_challstr(parts: &[&str]) -> Result<ServerMessage> {
    if parts.len() < 3 {
        return Err(ParseError::MissingField("challstr value".to_string()).into());
    }

    // CHALLSTR can contain | characters, so join everything after parts[1]
    let challstr = parts[2..].join("|");
    if challstr.is_empty() {
        return Err(ParseError::InvalidFormat("challstr cannot be empty".to_string()).into());
    }

    Ok(ServerMessage::Challstr(challstr))
}

pub fn parse_updateuser(parts: &[&str]) -> Result<ServerMessage> {
    if parts.len() < 4 {
        return Err(ParseError::MissingField("updateuser fields".to_string()).into());
    }

    let user = User::parse(parts[2])
        .ok_or_else(|| ParseError::InvalidFormat("invalid user format".to_string()))?;

    let named = parts[3] == "1";
    let avatar = parts.get(4).unwrap_or(&"").to_string();

    Ok(ServerMessage::UpdateUser { user, named, avatar })
}

pub fn parse_nametaken(parts: &[&str]) -> Result<ServerMessage> {
    if parts.len() < 4 {
        return Err(ParseError::MissingField("nametaken fields".to_string()).into());
    }

    Ok(ServerMessage::NameTaken {
        username: parts[2].to_string(),
        message: parts[3..].join("|"),
    })
}

pub fn parse_popup(parts: &[&str]) -> Result<ServerMessage> {
    if parts.len() < 3 {
        return Err(ParseError::MissingField("popup message".to_string()).into());
    }

    // MESSAGE can contain | characters
    Ok(ServerMessage::Popup(parts[2..].join("|")))
}
