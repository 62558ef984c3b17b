//! Major status conditions

/// Major status conditions. A combatant holds at most one, and it survives
/// switching out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    BadPoison,
    Sleep,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }

    /// Whether an effect id names a major status
    pub fn is_major(id: &str) -> bool {
        Self::from_protocol(id).is_some()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_protocol())
    }
}
