//! BattleSession - one agent playing one battle at a time

use vantage_battle::{
    BattleError, BattleState, DecisionKind, Interpreter, InterpreterConfig, LegalActions, Phase,
    Signal,
};
use vantage_protocol::{ClientCommand, ClientMessage, ServerMessage, parse_server_frame};

use crate::auth;
use crate::config::ClientConfig;
use crate::error::{Result, SessionError};
use crate::transport::{Transport, WebSocketTransport};

/// A logged-in connection that plays battles through a turn-based API.
///
/// Every public call runs the protocol until the next decision point or
/// the end of the battle, so between calls the state is stable.
///
/// # Example
///
/// ```ignore
/// let mut session = BattleSession::connect(ClientConfig::default()).await?;
/// session.reset().await?;
///
/// while session.decision_pending() {
///     let legal = session.legal_actions().unwrap();
///     let slot = legal.moves[0];
///     session.submit_move(slot, false, false).await?;
/// }
/// ```
pub struct BattleSession<T: Transport = WebSocketTransport> {
    transport: T,
    config: ClientConfig,
    username: String,
    interpreter: Interpreter,
    decision_pending: bool,
    closed: bool,
}

impl BattleSession<WebSocketTransport> {
    /// Connect to the configured server and log in
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = WebSocketTransport::connect(&config.server_url)
            .await
            .map_err(SessionError::Transport)?;
        tracing::info!(url = %config.server_url, "connected");

        Self::login(transport, config).await
    }
}

impl<T: Transport> BattleSession<T> {
    /// Log in over an already open transport
    pub async fn login(mut transport: T, config: ClientConfig) -> Result<Self> {
        let username = auth::authenticate(&mut transport, &config).await?;
        tracing::info!(%username, "logged in");

        Ok(Self::logged_in(transport, config, username))
    }

    /// Wrap a transport whose connection is already logged in as
    /// `username`
    pub fn logged_in(transport: T, config: ClientConfig, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            transport,
            interpreter: Interpreter::new(InterpreterConfig::new(username.clone())),
            config,
            username,
            decision_pending: false,
            closed: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Read-only view of the current battle
    pub fn state(&self) -> &BattleState {
        self.interpreter.state()
    }

    pub fn decision_pending(&self) -> bool {
        self.decision_pending
    }

    /// Legal actions at the pending decision point
    pub fn legal_actions(&self) -> Option<&LegalActions> {
        if self.decision_pending {
            self.interpreter.state().legal.as_ref()
        } else {
            None
        }
    }

    /// Leave any current battle (forfeiting it if still running), search
    /// for a new one and run until its first decision point
    pub async fn reset(&mut self) -> Result<Signal> {
        self.ensure_open()?;
        self.leave_battle().await?;

        self.interpreter = Interpreter::new(InterpreterConfig::new(self.username.clone()));
        self.decision_pending = false;

        let team = self.config.team.clone();
        let format = self.config.format.clone();
        self.send(ClientMessage::global(ClientCommand::UpdateTeam(team)))
            .await?;
        self.send(ClientMessage::global(ClientCommand::Search(format.clone())))
            .await?;
        self.interpreter.state_mut().phase = Phase::Searching;
        tracing::info!(%format, "searching for a battle");

        let signal = self.run_until_decision().await?;

        if let Some(room) = self.interpreter.room().map(str::to_string) {
            tracing::info!(%room, opponent = %self.state().opponent.name, "battle joined");
            if self.config.timer && signal != Signal::Ended {
                self.send(ClientMessage::room(room, ClientCommand::Timer(true)))
                    .await?;
            }
        }

        Ok(signal)
    }

    /// Use the move in `slot` (1-based), optionally mega evolving or as a
    /// Z-move
    pub async fn submit_move(&mut self, slot: usize, mega: bool, z: bool) -> Result<Signal> {
        let choice = self.pending_actions()?.move_choice(slot, mega, z)?;
        self.choose(choice).await
    }

    /// Switch to the combatant in roster `slot` (2..=6)
    pub async fn submit_switch(&mut self, slot: usize) -> Result<Signal> {
        let choice = self.pending_actions()?.switch_choice(slot)?;
        self.choose(choice).await
    }

    /// Close the connection. The session cannot be used afterwards.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.decision_pending = false;
        tracing::info!("closing connection");
        self.transport
            .close()
            .await
            .map_err(SessionError::Transport)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn pending_actions(&self) -> Result<&LegalActions> {
        self.ensure_open()?;
        self.legal_actions().ok_or_else(|| {
            BattleError::IllegalAction("no decision is pending".to_string()).into()
        })
    }

    async fn choose(&mut self, choice: String) -> Result<Signal> {
        let room = self
            .interpreter
            .room()
            .map(str::to_string)
            .ok_or_else(|| BattleError::IllegalAction("not in a battle".to_string()))?;
        let rqid = self.state().rqid();

        tracing::debug!(%room, %choice, ?rqid, "submitting choice");
        self.send(ClientMessage::room(room, ClientCommand::Choose { choice, rqid }))
            .await?;
        self.decision_pending = false;

        self.run_until_decision().await
    }

    /// Interpret frames until the agent has something to decide or the
    /// battle is over
    async fn run_until_decision(&mut self) -> Result<Signal> {
        loop {
            let frame = self.receive().await?;

            match self.interpreter.interpret(&frame)? {
                Signal::Continue => {}
                Signal::Decide => {
                    let Some(legal) = self.interpreter.state().legal.as_ref() else {
                        continue;
                    };
                    if legal.kind == DecisionKind::TeamPreview {
                        self.answer_team_preview().await?;
                        continue;
                    }
                    self.decision_pending = true;
                    return Ok(Signal::Decide);
                }
                Signal::Ended => {
                    self.decision_pending = false;
                    let state = self.state();
                    tracing::info!(
                        phase = ?state.phase,
                        turn = state.turn,
                        winner = ?state.winner,
                        "battle ended"
                    );
                    return Ok(Signal::Ended);
                }
            }
        }
    }

    /// Team preview is always answered with the default order
    async fn answer_team_preview(&mut self) -> Result<()> {
        let Some(room) = self.interpreter.room().map(str::to_string) else {
            return Ok(());
        };
        let rqid = self.state().rqid();
        self.interpreter.state_mut().legal = None;

        self.send(ClientMessage::room(
            room,
            ClientCommand::Choose {
                choice: "default".to_string(),
                rqid,
            },
        ))
        .await
    }

    /// Forfeit if the battle is still running, leave the room and drain
    /// frames until the server tears it down
    async fn leave_battle(&mut self) -> Result<()> {
        let Some(room) = self.interpreter.room().map(str::to_string) else {
            return Ok(());
        };

        if self.state().phase == Phase::Ongoing {
            tracing::info!(%room, "forfeiting");
            self.send(ClientMessage::room(room.clone(), ClientCommand::Forfeit))
                .await?;
        }
        self.send(ClientMessage::global(ClientCommand::LeaveRoom(room.clone())))
            .await?;

        loop {
            let frame = parse_server_frame(&self.receive().await?);
            let deinit = frame.room_id.as_deref() == Some(room.as_str())
                && frame
                    .messages()
                    .any(|(_, message)| matches!(message, Ok(ServerMessage::Deinit)));
            if deinit {
                tracing::debug!(%room, "left battle room");
                return Ok(());
            }
        }
    }

    async fn send(&mut self, message: ClientMessage) -> Result<()> {
        self.transport
            .send(message.to_wire_format())
            .await
            .map_err(SessionError::Transport)
    }

    async fn receive(&mut self) -> Result<String> {
        let frame = self
            .transport
            .receive()
            .await
            .map_err(SessionError::Transport)?
            .ok_or(SessionError::Closed)?;

        for (_, message) in parse_server_frame(&frame).messages() {
            if let Ok(ServerMessage::Popup(text)) = message {
                tracing::warn!(%text, "server popup");
            }
        }
        Ok(frame)
    }
}
