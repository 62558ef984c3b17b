/// Commands that clients can send to server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// /trn USERNAME,0,ASSERTION
    TrustedLogin { username: String, assertion: String },

    /// /choose CHOICE|RQID
    Choose { choice: String, rqid: Option<u64> },

    /// /forfeit
    Forfeit,

    /// /timer on | /timer off
    Timer(bool),

    /// /leave ROOMID
    LeaveRoom(String),

    /// /utm TEAM
    UpdateTeam(String),

    /// /search FORMAT
    Search(String),

    /// Raw command for catch-all
    Raw(String),
}

impl ClientCommand {
    /// Serialize command to protocol format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::TrustedLogin {
                username,
                assertion,
            } => format!("/trn {},0,{}", username, assertion),
            Self::Choose {
                choice,
                rqid: Some(rqid),
            } => format!("/choose {}|{}", choice, rqid),
            Self::Choose { choice, rqid: None } => format!("/choose {}", choice),
            Self::Forfeit => "/forfeit".to_string(),
            Self::Timer(on) => format!("/timer {}", if *on { "on" } else { "off" }),
            Self::LeaveRoom(room) => format!("/leave {}", room),
            Self::UpdateTeam(team) => format!("/utm {}", team),
            Self::Search(format) => format!("/search {}", format),
            Self::Raw(command) => command.clone(),
        }
    }
}

/// Client message with optional room context
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub room_id: Option<String>,
    pub command: ClientCommand,
}

impl ClientMessage {
    pub fn global(command: ClientCommand) -> Self {
        Self {
            room_id: None,
            command,
        }
    }

    pub fn room(room_id: impl Into<String>, command: ClientCommand) -> Self {
        Self {
            room_id: Some(room_id.into()),
            command,
        }
    }

    /// Serialize to wire format: ROOMID|TEXT or |TEXT
    pub fn to_wire_format(&self) -> String {
        let text = self.command.to_protocol_string();
        match &self.room_id {
            Some(room) => format!("{}|{}", room, text),
            None => format!("|{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_with_rqid() {
        let msg = ClientMessage::room(
            "battle-gen7randombattle-1",
            ClientCommand::Choose {
                choice: "move 2 mega".into(),
                rqid: Some(7),
            },
        );

        assert_eq!(
            msg.to_wire_format(),
            "battle-gen7randombattle-1|/choose move 2 mega|7"
        );
    }

    #[test]
    fn test_trusted_login() {
        let msg = ClientMessage::global(ClientCommand::TrustedLogin {
            username: "someone".into(),
            assertion: "abc;def".into(),
        });

        assert_eq!(msg.to_wire_format(), "|/trn someone,0,abc;def");
    }

    #[test]
    fn test_timer_and_search() {
        assert_eq!(ClientCommand::Timer(true).to_protocol_string(), "/timer on");
        assert_eq!(ClientCommand::Timer(false).to_protocol_string(), "/timer off");
        assert_eq!(
            ClientCommand::Search("gen7randombattle".into()).to_protocol_string(),
            "/search gen7randombattle"
        );
    }
}
