//! Message interpreter: applies server frames to a BattleState

use vantage_protocol::{
    Annotations, Player, Pokemon, ServerMessage, Stat, parse_server_frame, to_id,
};

use super::battle::{BattleState, Phase, SideId};
use super::resolver::is_illusion_family;
use crate::BattleError;
use crate::types::{BuiltinCatalog, Effect, EffectCatalog, EffectClass, effect_id};

/// Substrings of `-message` lines announcing that a player gave up
const FORFEIT_MARKERS: &[&str] = &["lost due to inactivity.", "forfeited."];

/// Per-session settings the interpreter needs to orient itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Our username, used to tell our side from the opponent's
    pub username: String,
}

impl InterpreterConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// What the caller should do after a frame. Ordered by precedence: a frame
/// that both asks for a decision and ends the battle reports `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Signal {
    Continue,
    Decide,
    Ended,
}

/// Interprets the frames of one battle room
///
/// One interpreter is created per battle. The first frame that carries
/// `|init|battle` binds the room; frames for other rooms are ignored after
/// that.
#[derive(Debug, Clone)]
pub struct Interpreter<C: EffectCatalog = BuiltinCatalog> {
    config: InterpreterConfig,
    catalog: C,
    state: BattleState,
}

impl Interpreter<BuiltinCatalog> {
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_catalog(config, BuiltinCatalog)
    }
}

impl<C: EffectCatalog> Interpreter<C> {
    pub fn with_catalog(config: InterpreterConfig, catalog: C) -> Self {
        Self {
            config,
            catalog,
            state: BattleState::new(),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    pub fn into_state(self) -> BattleState {
        self.state
    }

    pub fn room(&self) -> Option<&str> {
        self.state.room.as_deref()
    }

    /// Interpret one websocket frame.
    ///
    /// Malformed lines are logged and skipped. An identity failure stops
    /// the frame and leaves the battle aborted.
    pub fn interpret(&mut self, frame: &str) -> Result<Signal, BattleError> {
        let frame = parse_server_frame(frame);
        let Some(room) = frame.room_id.as_deref() else {
            return Ok(Signal::Continue);
        };

        match self.state.room.as_deref() {
            Some(bound) if bound != room => return Ok(Signal::Continue),
            Some(_) => {}
            None => {
                if !frame.lines.iter().any(|line| line.starts_with("|init|battle")) {
                    return Ok(Signal::Continue);
                }
                tracing::info!(room, "battle room bound");
                self.state.room = Some(room.to_string());
            }
        }

        tracing::debug!(room, lines = frame.lines.len(), "interpreting frame");

        let mut signal = Signal::Continue;
        for (line, message) in frame.messages() {
            match message {
                Ok(message) => signal = signal.max(self.apply(&message)?),
                Err(e) => tracing::warn!(line, error = %e, "skipping malformed line"),
            }
        }

        Ok(signal)
    }

    /// Apply a single parsed message
    pub fn apply(&mut self, msg: &ServerMessage) -> Result<Signal, BattleError> {
        let mut signal = Signal::Continue;

        match msg {
            // === Battle Setup ===
            ServerMessage::Player { player, username } => {
                self.handle_player(*player, username);
            }

            ServerMessage::Gen(generation) => {
                self.state.generation = Some(*generation);
            }

            ServerMessage::Tier(tier) => {
                self.state.tier = Some(tier.clone());
            }

            // === Progress ===
            ServerMessage::Turn(turn) => {
                self.state.advance_turn(*turn);
                if !self.state.phase.is_terminal() {
                    self.state.phase = Phase::Ongoing;
                }
                signal = Signal::Decide;
            }

            ServerMessage::Win(winner) => {
                self.state.phase = if to_id(winner) == to_id(&self.config.username) {
                    Phase::Win
                } else {
                    Phase::Loss
                };
                self.state.winner = Some(winner.clone());
                tracing::info!(%winner, phase = ?self.state.phase, "battle ended");
                signal = Signal::Ended;
            }

            ServerMessage::Tie => {
                self.state.phase = Phase::Tie;
                tracing::info!("battle ended in a tie");
                signal = Signal::Ended;
            }

            ServerMessage::Request(Some(request)) => {
                if self.state.apply_request(request.clone()) {
                    signal = Signal::Decide;
                }
            }

            ServerMessage::Upkeep => {
                self.state.age_effects();
            }

            ServerMessage::Message(text) => {
                if FORFEIT_MARKERS.iter().any(|marker| text.contains(marker)) {
                    self.state.forfeited = true;
                }
            }

            // === Major Actions ===
            ServerMessage::Switch {
                pokemon,
                details,
                hp_status,
            }
            | ServerMessage::Drag {
                pokemon,
                details,
                hp_status,
            } => {
                self.state.switch_in(pokemon, details, hp_status.as_ref())?;
            }

            ServerMessage::Replace {
                pokemon,
                details,
                hp_status,
            } => {
                self.state.replace_active(pokemon, details, hp_status.as_ref())?;
            }

            ServerMessage::DetailsChange {
                pokemon,
                details,
                hp_status,
            } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.apply_details(details);
                    if let Some(hp) = hp_status {
                        combatant.apply_hp_status(hp);
                    }
                }
            }

            ServerMessage::FormeChange {
                pokemon,
                species,
                hp_status,
                ..
            } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.species = species.clone();
                    if let Some(hp) = hp_status {
                        combatant.apply_hp_status(hp);
                    }
                }
            }

            ServerMessage::Faint(pokemon) => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.faint();
                }
            }

            ServerMessage::Cant {
                pokemon, reason, ..
            } => {
                if effect_id(reason) == "recharge" {
                    if let Some(combatant) = self.state.locate(pokemon)? {
                        combatant.recharge = false;
                    }
                }
            }

            ServerMessage::Move {
                pokemon,
                move_name,
                annotations,
                ..
            } => {
                // Called moves ([from] Metronome, Sleep Talk...) are not part
                // of the moveset
                if annotations.from.is_none()
                    && self.state.side_of(pokemon)? == SideId::Opponent
                {
                    if let Some(combatant) = self.state.locate(pokemon)? {
                        combatant.learn_move(move_name);
                    }
                }
            }

            // === HP ===
            ServerMessage::Damage {
                pokemon, hp_status, ..
            }
            | ServerMessage::Heal {
                pokemon, hp_status, ..
            }
            | ServerMessage::SetHp {
                pokemon, hp_status, ..
            } => {
                if let (Some(combatant), Some(hp)) = (self.state.locate(pokemon)?, hp_status) {
                    combatant.apply_hp_status(hp);
                }
            }

            // === Status ===
            ServerMessage::Status {
                pokemon, status, ..
            } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.set_major_status(&to_id(status));
                }
            }

            ServerMessage::CureStatus {
                pokemon, status, ..
            } => {
                self.handle_cure_status(pokemon, status)?;
            }

            ServerMessage::CureTeam(pokemon) => {
                let id = self.state.side_of(pokemon)?;
                for combatant in self.state.side_mut(id).roster.iter_mut() {
                    combatant.clear_major_status();
                }
            }

            // === Boosts ===
            ServerMessage::Boost {
                pokemon,
                stat,
                amount,
                ..
            } => {
                self.handle_boost(pokemon, *stat, *amount)?;
            }

            ServerMessage::Unboost {
                pokemon,
                stat,
                amount,
                ..
            } => {
                self.handle_boost(pokemon, *stat, amount.saturating_neg())?;
            }

            ServerMessage::SetBoost {
                pokemon,
                stat,
                amount,
            } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    if stat.is_battle_stat() {
                        combatant.battle_stats.set(*stat, f32::from(*amount));
                    } else {
                        combatant.boosts.set(*stat, *amount);
                    }
                }
            }

            ServerMessage::ClearBoost(pokemon) => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.boosts.clear();
                    combatant.battle_stats.clear();
                }
            }

            ServerMessage::ClearAllBoost => {
                for side in [&mut self.state.player, &mut self.state.opponent] {
                    let active = side.active_mut();
                    active.boosts.clear();
                    active.battle_stats.clear();
                }
            }

            // === Volatiles ===
            ServerMessage::VolatileStart {
                pokemon, effect, ..
            } => {
                let effect = self.effect(effect);
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.add_status(effect);
                }
            }

            ServerMessage::VolatileEnd {
                pokemon, effect, ..
            } => {
                let id = self.catalog.canonical_id(effect);
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.remove_status(&id);
                }
            }

            ServerMessage::SingleTurn { pokemon, effect } => {
                let effect = self.effect(effect).single_turn();
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.add_status(effect);
                }
            }

            ServerMessage::MustRecharge(pokemon) => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.recharge = true;
                }
            }

            // === Side and Field ===
            ServerMessage::SideStart { side, condition } => {
                let id = self.state.bound_side(side.player, || side.raw.clone())?;
                let effect = self.effect(condition);
                let max_layers = self.catalog.max_layers(&effect.id);
                self.state.side_mut(id).add_condition(effect, max_layers);
            }

            ServerMessage::SideEnd { side, condition } => {
                let id = self.state.bound_side(side.player, || side.raw.clone())?;
                let condition = self.catalog.canonical_id(condition);
                self.state.side_mut(id).remove_condition(&condition);
            }

            ServerMessage::Weather { weather, .. } => {
                if weather == "none" {
                    self.state.field.clear_weather();
                } else {
                    let effect = self.effect(weather);
                    self.state.field.set_weather(effect);
                }
            }

            ServerMessage::FieldStart { condition, .. } => {
                let effect = self.effect(condition);
                let class = self.catalog.classify(&effect.id);
                let catalog = &self.catalog;
                self.state.field.start(effect, class, |id| {
                    catalog.classify(id) == EffectClass::Terrain
                });
            }

            ServerMessage::FieldEnd { condition } => {
                let condition = self.catalog.canonical_id(condition);
                self.state.field.end(&condition);
            }

            // === Abilities and Items ===
            ServerMessage::Ability {
                pokemon,
                ability,
                annotations,
            } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.ability = Some(ability.clone());
                }
                if is_trace(annotations) {
                    if let Some(of) = &annotations.of {
                        if let Some(source) = self.state.locate(of)? {
                            source.ability = Some(ability.clone());
                        }
                    }
                }
            }

            ServerMessage::EndAbility { pokemon, .. } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.ability = None;
                }
            }

            ServerMessage::Item { pokemon, item, .. } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.attribute_item(item);
                }
            }

            ServerMessage::EndItem { pokemon, item, .. } => {
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.lose_item(item);
                }
            }

            // === Transformations ===
            ServerMessage::Transform {
                pokemon, target, ..
            } => {
                let species = self.state.locate(target)?.map(|c| c.species.clone());
                if let (Some(combatant), Some(species)) = (self.state.locate(pokemon)?, species) {
                    combatant.species = species;
                    combatant.transformed = true;
                }
            }

            ServerMessage::Mega {
                pokemon,
                mega_stone,
            } => {
                let id = self.state.side_of(pokemon)?;
                if let Some(combatant) = self.state.locate(pokemon)? {
                    combatant.mega = true;
                    if let Some(stone) = mega_stone {
                        combatant.item = Some(stone.clone());
                    }
                }
                self.state.side_mut(id).mega_used = true;
            }

            ServerMessage::ZPower(pokemon) => {
                let id = self.state.side_of(pokemon)?;
                self.state.side_mut(id).z_used = true;
            }

            // Connection-level messages are the session's business
            ServerMessage::Request(None)
            | ServerMessage::Challstr(_)
            | ServerMessage::UpdateUser { .. }
            | ServerMessage::NameTaken { .. }
            | ServerMessage::Popup(_)
            | ServerMessage::Init(_)
            | ServerMessage::Deinit
            | ServerMessage::Immune { .. }
            | ServerMessage::Raw(_) => {}
        }

        self.attribute(msg)?;
        Ok(signal)
    }

    fn effect(&self, raw: &str) -> Effect {
        Effect::new(raw, self.catalog.canonical_id(raw))
    }

    fn handle_player(&mut self, player: Player, username: &str) {
        // The server clears a seat with an empty name when a player leaves
        if username.is_empty() {
            return;
        }

        if to_id(username) == to_id(&self.config.username) {
            self.state.bind_player(player);
            self.state.player.name = username.to_string();
        } else if self.state.player.player != Some(player) {
            self.state.opponent.player = Some(player);
            self.state.opponent.name = username.to_string();
        }
        tracing::debug!(player = player.as_str(), %username, "player bound");
    }

    fn handle_boost(&mut self, pokemon: &Pokemon, stat: Stat, amount: i8) -> Result<(), BattleError> {
        if let Some(combatant) = self.state.locate(pokemon)? {
            if stat.is_battle_stat() {
                combatant.battle_stats.boost(stat, f32::from(amount));
            } else {
                combatant.boosts.boost(stat, amount);
            }
        }
        Ok(())
    }

    /// Cure a major status. Under a possible illusion the reference cannot
    /// be trusted, so the cure goes to the one combatant on that side that
    /// carries the status, and nowhere if that is ambiguous.
    fn handle_cure_status(&mut self, pokemon: &Pokemon, status: &str) -> Result<(), BattleError> {
        let status = to_id(status);
        let id = self.state.side_of(pokemon)?;
        let side = self.state.side(id);

        let disguised = is_illusion_family(&pokemon.name)
            || side
                .find_by_name(&pokemon.name)
                .is_some_and(|index| is_illusion_family(&side.roster[index].species));

        if !disguised {
            if let Some(combatant) = self.state.locate(pokemon)? {
                combatant.remove_status(&status);
            }
            return Ok(());
        }

        let carriers: Vec<usize> = side
            .roster
            .iter()
            .enumerate()
            .filter(|(_, c)| c.known && c.has_status(&status))
            .map(|(index, _)| index)
            .collect();

        match carriers.as_slice() {
            [index] => {
                let index = *index;
                self.state.side_mut(id).roster[index].remove_status(&status);
            }
            _ => tracing::warn!(
                name = %pokemon.name,
                %status,
                carriers = carriers.len(),
                "cannot tell who was cured under illusion, skipping"
            ),
        }
        Ok(())
    }

    /// `[from] ability: X` / `[from] item: X` reveal an ability or item of
    /// the `[of]` combatant, or of the line's subject when there is none
    fn attribute(&mut self, msg: &ServerMessage) -> Result<(), BattleError> {
        let Some(annotations) = msg.annotations() else {
            return Ok(());
        };
        if matches!(msg, ServerMessage::EndItem { .. })
            || matches!(msg, ServerMessage::Ability { .. }) && is_trace(annotations)
        {
            return Ok(());
        }

        let Some(holder) = annotations.of.as_ref().or(msg.subject()) else {
            return Ok(());
        };

        if let Some(ability) = annotations.from_ability() {
            if let Some(combatant) = self.state.locate(holder)? {
                combatant.ability = Some(ability.to_string());
            }
        } else if let Some(item) = annotations.from_item() {
            if let Some(combatant) = self.state.locate(holder)? {
                combatant.attribute_item(item);
            }
        }
        Ok(())
    }
}

fn is_trace(annotations: &Annotations) -> bool {
    annotations
        .from_ability()
        .is_some_and(|ability| to_id(ability) == "trace")
}
