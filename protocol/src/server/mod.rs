mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod battle_state;
mod global;
mod request;
mod room;

pub use battle::{
    Annotations, Gender, HpStatus, Player, Pokemon, PokemonDetails, Side, Stat,
};
pub use global::User;
pub use request::{
    ActivePokemon, BattleRequest, MoveSlot, PokemonStats, RequestKind, SideInfo, SidePokemon,
    ZMoveInfo,
};

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Chat,
    Battle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    // Global
    Challstr(String),
    UpdateUser {
        user: User,
        named: bool,
        avatar: String,
    },
    NameTaken {
        username: String,
        message: String,
    },
    Popup(String),

    // Room lifecycle
    Init(RoomType),
    Deinit,

    // Battle setup and progress
    Player {
        player: Player,
        username: String,
    },
    Gen(u8),
    Tier(String),
    /// None for the empty request that closes a battle
    Request(Option<BattleRequest>),
    Upkeep,
    Turn(u32),
    Win(String),
    Tie,
    Message(String),

    // Major actions
    Move {
        pokemon: Pokemon,
        move_name: String,
        target: Option<Pokemon>,
        annotations: Annotations,
    },
    Switch {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Drag {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Replace {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    DetailsChange {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    FormeChange {
        pokemon: Pokemon,
        species: String,
        hp_status: Option<HpStatus>,
        annotations: Annotations,
    },
    Faint(Pokemon),
    Cant {
        pokemon: Pokemon,
        reason: String,
        move_name: Option<String>,
    },

    // Minor actions
    Damage {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
        annotations: Annotations,
    },
    Heal {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
        annotations: Annotations,
    },
    SetHp {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
        annotations: Annotations,
    },
    Status {
        pokemon: Pokemon,
        status: String,
        annotations: Annotations,
    },
    CureStatus {
        pokemon: Pokemon,
        status: String,
        annotations: Annotations,
    },
    CureTeam(Pokemon),
    Boost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
        annotations: Annotations,
    },
    Unboost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
        annotations: Annotations,
    },
    SetBoost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
    },
    ClearBoost(Pokemon),
    ClearAllBoost,
    VolatileStart {
        pokemon: Pokemon,
        effect: String,
        annotations: Annotations,
    },
    VolatileEnd {
        pokemon: Pokemon,
        effect: String,
        annotations: Annotations,
    },
    SingleTurn {
        pokemon: Pokemon,
        effect: String,
    },
    MustRecharge(Pokemon),
    Immune {
        pokemon: Pokemon,
        annotations: Annotations,
    },
    SideStart {
        side: Side,
        condition: String,
    },
    SideEnd {
        side: Side,
        condition: String,
    },
    Weather {
        weather: String,
        annotations: Annotations,
    },
    FieldStart {
        condition: String,
        annotations: Annotations,
    },
    FieldEnd {
        condition: String,
    },
    Ability {
        pokemon: Pokemon,
        ability: String,
        annotations: Annotations,
    },
    EndAbility {
        pokemon: Pokemon,
        annotations: Annotations,
    },
    Item {
        pokemon: Pokemon,
        item: String,
        annotations: Annotations,
    },
    EndItem {
        pokemon: Pokemon,
        item: String,
        annotations: Annotations,
    },
    Transform {
        pokemon: Pokemon,
        target: Pokemon,
        annotations: Annotations,
    },
    Mega {
        pokemon: Pokemon,
        mega_stone: Option<String>,
    },
    ZPower(Pokemon),

    Raw(String),
}

impl ServerMessage {
    /// The combatant a battle line is primarily about, if any
    pub fn subject(&self) -> Option<&Pokemon> {
        match self {
            Self::Move { pokemon, .. }
            | Self::Switch { pokemon, .. }
            | Self::Drag { pokemon, .. }
            | Self::Replace { pokemon, .. }
            | Self::DetailsChange { pokemon, .. }
            | Self::FormeChange { pokemon, .. }
            | Self::Faint(pokemon)
            | Self::Cant { pokemon, .. }
            | Self::Damage { pokemon, .. }
            | Self::Heal { pokemon, .. }
            | Self::SetHp { pokemon, .. }
            | Self::Status { pokemon, .. }
            | Self::CureStatus { pokemon, .. }
            | Self::CureTeam(pokemon)
            | Self::Boost { pokemon, .. }
            | Self::Unboost { pokemon, .. }
            | Self::SetBoost { pokemon, .. }
            | Self::ClearBoost(pokemon)
            | Self::VolatileStart { pokemon, .. }
            | Self::VolatileEnd { pokemon, .. }
            | Self::SingleTurn { pokemon, .. }
            | Self::MustRecharge(pokemon)
            | Self::Immune { pokemon, .. }
            | Self::Ability { pokemon, .. }
            | Self::EndAbility { pokemon, .. }
            | Self::Item { pokemon, .. }
            | Self::EndItem { pokemon, .. }
            | Self::Transform { pokemon, .. }
            | Self::Mega { pokemon, .. }
            | Self::ZPower(pokemon) => Some(pokemon),
            _ => None,
        }
    }

    /// Trailing annotations carried by the line, if the line kind has any
    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            Self::Move { annotations, .. }
            | Self::FormeChange { annotations, .. }
            | Self::Damage { annotations, .. }
            | Self::Heal { annotations, .. }
            | Self::SetHp { annotations, .. }
            | Self::Status { annotations, .. }
            | Self::CureStatus { annotations, .. }
            | Self::Boost { annotations, .. }
            | Self::Unboost { annotations, .. }
            | Self::VolatileStart { annotations, .. }
            | Self::VolatileEnd { annotations, .. }
            | Self::Immune { annotations, .. }
            | Self::Weather { annotations, .. }
            | Self::FieldStart { annotations, .. }
            | Self::Ability { annotations, .. }
            | Self::EndAbility { annotations, .. }
            | Self::Item { annotations, .. }
            | Self::EndItem { annotations, .. }
            | Self::Transform { annotations, .. } => Some(annotations),
            _ => None,
        }
    }
}

/// One websocket delivery: an optional `>ROOMID` header and the raw lines
/// that follow it. Lines are parsed lazily so that one malformed line does
/// not cost the rest of the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    pub room_id: Option<String>,
    pub lines: Vec<String>,
}

impl ServerFrame {
    /// Parse every line, pairing each result with the line it came from
    pub fn messages(&self) -> impl Iterator<Item = (&str, Result<ServerMessage>)> + '_ {
        self.lines
            .iter()
            .map(|line| (line.as_str(), parse_server_message(line)))
    }
}

/// Split a complete WebSocket frame into its room header and lines
pub fn parse_server_frame(frame: &str) -> ServerFrame {
    let mut lines = frame.lines().peekable();
    let mut room_id = None;

    // Check if first line is >ROOMID
    if let Some(room) = lines.peek().and_then(|first| first.strip_prefix('>')) {
        room_id = Some(room.trim().to_string());
        lines.next();
    }

    let lines = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect();

    ServerFrame { room_id, lines }
}

type Parser = fn(&[&str]) -> Result<ServerMessage>;

/// Tag to parser lookup. Tags not listed here come back as `Raw`.
const PARSERS: &[(&str, Parser)] = &[
    ("challstr", global::parse_challstr),
    ("updateuser", global::parse_updateuser),
    ("nametaken", global::parse_nametaken),
    ("popup", global::parse_popup),
    ("init", room::parse_init),
    ("deinit", room::parse_deinit),
    ("player", battle_init::parse_player),
    ("gen", battle_init::parse_gen),
    ("tier", battle_init::parse_tier),
    ("request", battle_progress::parse_request),
    ("upkeep", battle_progress::parse_upkeep),
    ("turn", battle_progress::parse_turn),
    ("win", battle_progress::parse_win),
    ("tie", battle_progress::parse_tie),
    ("-message", battle_progress::parse_message),
    ("move", battle_major::parse_move),
    ("switch", battle_major::parse_switch),
    ("drag", battle_major::parse_drag),
    ("replace", battle_major::parse_replace),
    ("detailschange", battle_major::parse_detailschange),
    ("-formechange", battle_major::parse_formechange),
    ("faint", battle_major::parse_faint),
    ("cant", battle_major::parse_cant),
    ("-damage", battle_minor::parse_damage),
    ("-heal", battle_minor::parse_heal),
    ("-sethp", battle_minor::parse_sethp),
    ("-status", battle_minor::parse_status),
    ("-curestatus", battle_minor::parse_curestatus),
    ("-cureteam", battle_minor::parse_cureteam),
    ("-boost", battle_minor::parse_boost),
    ("-unboost", battle_minor::parse_unboost),
    ("-setboost", battle_minor::parse_setboost),
    ("-clearboost", battle_minor::parse_clearboost),
    ("-clearallboost", battle_minor::parse_clearallboost),
    ("-start", battle_minor::parse_start),
    ("-end", battle_minor::parse_end),
    ("-singleturn", battle_minor::parse_singleturn),
    ("-mustrecharge", battle_minor::parse_mustrecharge),
    ("-immune", battle_minor::parse_immune),
    ("-ability", battle_minor::parse_ability),
    ("-endability", battle_minor::parse_endability),
    ("-item", battle_minor::parse_item),
    ("-enditem", battle_minor::parse_enditem),
    ("-transform", battle_minor::parse_transform),
    ("-mega", battle_minor::parse_mega),
    ("-zpower", battle_minor::parse_zpower),
    ("-sidestart", battle_state::parse_sidestart),
    ("-sideend", battle_state::parse_sideend),
    ("-weather", battle_state::parse_weather),
    ("-fieldstart", battle_state::parse_fieldstart),
    ("-fieldend", battle_state::parse_fieldend),
];

/// Parse a single line from the server into a ServerMessage
pub fn parse_server_message(line: &str) -> Result<ServerMessage> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return Ok(ServerMessage::Raw(String::new()));
    }

    if !line.starts_with('|') {
        return Ok(ServerMessage::Raw(line.to_string()));
    }

    let parts: Vec<&str> = line.split('|').collect();

    if parts.len() < 2 {
        return Ok(ServerMessage::Raw(line.to_string()));
    }

    match PARSERS.iter().find(|(tag, _)| *tag == parts[1]) {
        Some((_, parse)) => parse(&parts),
        None => Ok(ServerMessage::Raw(line.to_string())),
    }
}
