//! Charger hardware and preference enums.

use serde::{Deserialize, Serialize};

/// The kind of charger installed at a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotType {
    Tesla,
    Chargepoint,
}

impl std::fmt::Display for SpotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tesla => write!(f, "tesla"),
            Self::Chargepoint => write!(f, "chargepoint"),
        }
    }
}

impl std::str::FromStr for SpotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tesla" => Ok(Self::Tesla),
            "chargepoint" => Ok(Self::Chargepoint),
            _ => Err(format!("invalid spot type: {s}")),
        }
    }
}

/// Which charger kinds a user is willing to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargerPreference {
    /// Any available charger.
    #[default]
    Both,
    /// Tesla connectors only.
    Tesla,
    /// ChargePoint connectors only.
    Chargepoint,
}

impl ChargerPreference {
    /// Whether a spot of the given type satisfies this preference.
    #[must_use]
    pub const fn accepts(&self, spot_type: SpotType) -> bool {
        matches!(
            (self, spot_type),
            (Self::Both, _)
                | (Self::Tesla, SpotType::Tesla)
                | (Self::Chargepoint, SpotType::Chargepoint)
        )
    }
}

impl std::fmt::Display for ChargerPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Both => write!(f, "both"),
            Self::Tesla => write!(f, "tesla"),
            Self::Chargepoint => write!(f, "chargepoint"),
        }
    }
}

impl std::str::FromStr for ChargerPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Self::Both),
            "tesla" => Ok(Self::Tesla),
            "chargepoint" => Ok(Self::Chargepoint),
            _ => Err(format!("invalid charger preference: {s}")),
        }
    }
}
