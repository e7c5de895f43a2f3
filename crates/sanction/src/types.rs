//! Sanction value types

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use coinguard_core::{Address, Coins};

/// Status carried by a temporary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TempStatus {
    Sanctioned,
    Unsanctioned,
}

impl TempStatus {
    pub fn to_byte(self) -> u8 {
        match self {
            TempStatus::Sanctioned => 0x01,
            TempStatus::Unsanctioned => 0x00,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(TempStatus::Sanctioned),
            0x00 => Some(TempStatus::Unsanctioned),
            _ => None,
        }
    }
}

/// A temporary sanction or unsanction tied to a pending proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryEntry {
    pub address: Address,
    pub proposal_id: u64,
    pub status: TempStatus,
}

/// Deposit thresholds for immediate (temporary) effect.
/// A zero threshold disables the immediate effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub immediate_sanction_min_deposit: Coins,
    #[serde(default)]
    pub immediate_unsanction_min_deposit: Coins,
}
