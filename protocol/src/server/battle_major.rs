//! Major battle action message parsers
//!
//! These are the primary actions in battle: moves, switches, faints, etc.

use super::ServerMessage;
use super::battle::{
    Annotations, HpStatus, Pokemon, PokemonDetails, optional_field, parse_details,
    parse_field, parse_hp_status, parse_pokemon,
};
use anyhow::Result;

/// POKEMON|DETAILS|HP STATUS, shared by every line that puts a combatant
/// into a slot or redescribes it
fn parse_appearance(parts: &[&str]) -> Result<(Pokemon, PokemonDetails, Option<HpStatus>)> {
    let pokemon = parse_pokemon(parts, 2)?;
    let details = parse_details(parts, 3);
    if details.species.is_empty() {
        return Err(anyhow::anyhow!("Missing details for {}", pokemon.name));
    }
    let hp_status = parse_hp_status(parts, 4);

    Ok((pokemon, details, hp_status))
}

/// Parse |move|POKEMON|MOVE|TARGET with optional tags
pub fn parse_move(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let move_name = parse_field(parts, 3, "move")?;
    let target = parts.get(4).and_then(|s| Pokemon::parse(s));

    Ok(ServerMessage::Move {
        pokemon,
        move_name,
        target,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |switch|POKEMON|DETAILS|HP STATUS
pub fn parse_switch(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(ServerMessage::Switch {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |drag|POKEMON|DETAILS|HP STATUS
pub fn parse_drag(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(ServerMessage::Drag {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |replace|POKEMON|DETAILS|HP STATUS (illusion ended)
pub fn parse_replace(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(ServerMessage::Replace {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |detailschange|POKEMON|DETAILS|HP STATUS
pub fn parse_detailschange(parts: &[&str]) -> Result<ServerMessage> {
    let (pokemon, details, hp_status) = parse_appearance(parts)?;
    Ok(ServerMessage::DetailsChange {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |-formechange|POKEMON|SPECIES|HP STATUS
pub fn parse_formechange(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let species = parse_field(parts, 3, "species")?;
    let hp_status = parse_hp_status(parts, 4);

    Ok(ServerMessage::FormeChange {
        pokemon,
        species,
        hp_status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
pub fn parse_cant(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let reason = parts.get(3).unwrap_or(&"").to_string();
    let move_name = optional_field(parts, 4);

    Ok(ServerMessage::Cant {
        pokemon,
        reason,
        move_name,
    })
}

/// Parse |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(ServerMessage::Faint(pokemon))
}
