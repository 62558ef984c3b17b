//! Minor battle action message parsers
//!
//! These are secondary effects in battle: damage, stat changes, status, etc.
//! In the official client, they're usually displayed in smaller font.

use super::ServerMessage;
use super::battle::{
    Annotations, Stat, optional_field, parse_field, parse_hp_status, parse_pokemon,
};
use anyhow::Result;

/// Parse |-damage|POKEMON|HP STATUS
pub fn parse_damage(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let hp_status = parse_hp_status(parts, 3);

    Ok(ServerMessage::Damage {
        pokemon,
        hp_status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-heal|POKEMON|HP STATUS
pub fn parse_heal(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let hp_status = parse_hp_status(parts, 3);

    Ok(ServerMessage::Heal {
        pokemon,
        hp_status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-sethp|POKEMON|HP
pub fn parse_sethp(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let hp_status = parse_hp_status(parts, 3);

    Ok(ServerMessage::SetHp {
        pokemon,
        hp_status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let status = parse_field(parts, 3, "status")?;

    Ok(ServerMessage::Status {
        pokemon,
        status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-curestatus|POKEMON|STATUS
pub fn parse_curestatus(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let status = parse_field(parts, 3, "status")?;

    Ok(ServerMessage::CureStatus {
        pokemon,
        status,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-cureteam|POKEMON
pub fn parse_cureteam(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(ServerMessage::CureTeam(pokemon))
}

/// STAT|AMOUNT at positions 3 and 4
fn parse_stat_change(parts: &[&str]) -> Result<(Stat, i8)> {
    let stat = parts
        .get(3)
        .and_then(|s| Stat::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Missing stat"))?;
    let amount = parts
        .get(4)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Missing amount"))?;

    Ok((stat, amount))
}

/// Parse |-boost|POKEMON|STAT|AMOUNT
pub fn parse_boost(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let (stat, amount) = parse_stat_change(parts)?;

    Ok(ServerMessage::Boost {
        pokemon,
        stat,
        amount,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-unboost|POKEMON|STAT|AMOUNT
pub fn parse_unboost(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let (stat, amount) = parse_stat_change(parts)?;

    Ok(ServerMessage::Unboost {
        pokemon,
        stat,
        amount,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-setboost|POKEMON|STAT|AMOUNT
pub fn parse_setboost(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let (stat, amount) = parse_stat_change(parts)?;

    Ok(ServerMessage::SetBoost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-clearboost|POKEMON
pub fn parse_clearboost(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(ServerMessage::ClearBoost(pokemon))
}

/// Parse |-clearallboost
pub fn parse_clearallboost(_parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::ClearAllBoost)
}

/// Parse |-start|POKEMON|EFFECT
pub fn parse_start(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = parse_field(parts, 3, "effect")?;

    Ok(ServerMessage::VolatileStart {
        pokemon,
        effect,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-end|POKEMON|EFFECT
pub fn parse_end(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = parse_field(parts, 3, "effect")?;

    Ok(ServerMessage::VolatileEnd {
        pokemon,
        effect,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-singleturn|POKEMON|MOVE
pub fn parse_singleturn(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = parse_field(parts, 3, "effect")?;

    Ok(ServerMessage::SingleTurn { pokemon, effect })
}

/// Parse |-mustrecharge|POKEMON
pub fn parse_mustrecharge(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(ServerMessage::MustRecharge(pokemon))
}

/// Parse |-immune|POKEMON
pub fn parse_immune(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;

    Ok(ServerMessage::Immune {
        pokemon,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-ability|POKEMON|ABILITY
pub fn parse_ability(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let ability = parse_field(parts, 3, "ability")?;

    Ok(ServerMessage::Ability {
        pokemon,
        ability,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-endability|POKEMON
pub fn parse_endability(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;

    Ok(ServerMessage::EndAbility {
        pokemon,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-item|POKEMON|ITEM
pub fn parse_item(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let item = parse_field(parts, 3, "item")?;

    Ok(ServerMessage::Item {
        pokemon,
        item,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-enditem|POKEMON|ITEM
pub fn parse_enditem(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let item = parse_field(parts, 3, "item")?;

    Ok(ServerMessage::EndItem {
        pokemon,
        item,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-transform|POKEMON|TARGET
pub fn parse_transform(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let target = parse_pokemon(parts, 3)?;

    Ok(ServerMessage::Transform {
        pokemon,
        target,
        annotations: Annotations::parse(parts),
    })
}

/// Parse |-mega|POKEMON|SPECIES|MEGASTONE
pub fn parse_mega(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    let mega_stone = optional_field(parts, 4);

    Ok(ServerMessage::Mega {
        pokemon,
        mega_stone,
    })
}

/// Parse |-zpower|POKEMON
pub fn parse_zpower(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(ServerMessage::ZPower(pokemon))
}
