//! Stat stages, accuracy/evasion stages and raw stats

use vantage_protocol::Stat;

const MIN_STAGE: i8 = -6;
const MAX_STAGE: i8 = 6;

/// Stage modifiers for the five battle stats (-6 to +6)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
}

impl StatStages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stage for a stat. Accuracy and evasion live in [`BattleStats`].
    pub fn get(&self, stat: Stat) -> Option<i8> {
        match stat {
            Stat::Atk => Some(self.atk),
            Stat::Def => Some(self.def),
            Stat::Spa => Some(self.spa),
            Stat::Spd => Some(self.spd),
            Stat::Spe => Some(self.spe),
            Stat::Accuracy | Stat::Evasion => None,
        }
    }

    fn slot(&mut self, stat: Stat) -> Option<&mut i8> {
        match stat {
            Stat::Atk => Some(&mut self.atk),
            Stat::Def => Some(&mut self.def),
            Stat::Spa => Some(&mut self.spa),
            Stat::Spd => Some(&mut self.spd),
            Stat::Spe => Some(&mut self.spe),
            Stat::Accuracy | Stat::Evasion => None,
        }
    }

    /// Set stage for a stat (clamped to -6..+6)
    pub fn set(&mut self, stat: Stat, value: i8) {
        if let Some(slot) = self.slot(stat) {
            *slot = value.clamp(MIN_STAGE, MAX_STAGE);
        }
    }

    /// Apply a signed change, returns the change actually applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let Some(slot) = self.slot(stat) else {
            return 0;
        };
        let current = *slot;
        let new_value = current.saturating_add(amount).clamp(MIN_STAGE, MAX_STAGE);
        *slot = new_value;
        new_value - current
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Accuracy and evasion stages, kept as floats and clamped like stages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BattleStats {
    pub accuracy: f32,
    pub evasion: f32,
}

impl BattleStats {
    pub fn get(&self, stat: Stat) -> Option<f32> {
        match stat {
            Stat::Accuracy => Some(self.accuracy),
            Stat::Evasion => Some(self.evasion),
            _ => None,
        }
    }

    fn slot(&mut self, stat: Stat) -> Option<&mut f32> {
        match stat {
            Stat::Accuracy => Some(&mut self.accuracy),
            Stat::Evasion => Some(&mut self.evasion),
            _ => None,
        }
    }

    pub fn set(&mut self, stat: Stat, value: f32) {
        if let Some(slot) = self.slot(stat) {
            *slot = value.clamp(MIN_STAGE as f32, MAX_STAGE as f32);
        }
    }

    pub fn boost(&mut self, stat: Stat, amount: f32) {
        if let Some(slot) = self.slot(stat) {
            *slot = (*slot + amount).clamp(MIN_STAGE as f32, MAX_STAGE as f32);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Raw stats as reported for the player's own team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CombatStats {
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl From<vantage_protocol::server::PokemonStats> for CombatStats {
    fn from(stats: vantage_protocol::server::PokemonStats) -> Self {
        Self {
            atk: stats.atk,
            def: stats.def,
            spa: stats.spa,
            spd: stats.spd,
            spe: stats.spe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stages_are_zero() {
        let stages = StatStages::new();
        assert!(stages.is_clear());
        assert_eq!(stages.get(Stat::Atk), Some(0));
        assert_eq!(stages.get(Stat::Accuracy), None);
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut stages = StatStages::new();
        stages.set(Stat::Atk, 10);
        assert_eq!(stages.atk, 6);

        stages.set(Stat::Def, -10);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_boost() {
        let mut stages = StatStages::new();

        let change = stages.boost(Stat::Atk, 2);
        assert_eq!(change, 2);
        assert_eq!(stages.atk, 2);

        // Boost that hits cap
        stages.atk = 5;
        let change = stages.boost(Stat::Atk, 3);
        assert_eq!(change, 1);
        assert_eq!(stages.atk, 6);

        let change = stages.boost(Stat::Atk, 1);
        assert_eq!(change, 0);
    }

    #[test]
    fn test_unboost_to_minimum() {
        let mut stages = StatStages::new();
        stages.def = -5;
        let change = stages.boost(Stat::Def, -3);
        assert_eq!(change, -1);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_boost_ignores_battle_stats() {
        let mut stages = StatStages::new();
        assert_eq!(stages.boost(Stat::Evasion, 2), 0);
        assert!(stages.is_clear());
    }

    #[test]
    fn test_battle_stats_clamp() {
        let mut battle_stats = BattleStats::default();
        battle_stats.boost(Stat::Evasion, 4.0);
        battle_stats.boost(Stat::Evasion, 4.0);
        assert_eq!(battle_stats.evasion, 6.0);

        battle_stats.boost(Stat::Accuracy, -7.0);
        assert_eq!(battle_stats.accuracy, -6.0);

        battle_stats.boost(Stat::Atk, 1.0);
        assert_eq!(battle_stats.get(Stat::Atk), None);
    }
}
