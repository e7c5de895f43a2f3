//! Quarantine value types

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use coinguard_core::{Address, CoinError, Coins};

/// Standing response of a recipient to funds from one sender
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoResponse {
    #[default]
    Unspecified,
    Accept,
    Decline,
}

impl AutoResponse {
    /// Stored byte; `Unspecified` is never stored
    pub fn to_byte(self) -> Option<u8> {
        match self {
            AutoResponse::Unspecified => None,
            AutoResponse::Accept => Some(0x01),
            AutoResponse::Decline => Some(0x02),
        }
    }

    /// Decode a stored byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(AutoResponse::Accept),
            0x02 => Some(AutoResponse::Decline),
            _ => None,
        }
    }

    pub fn is_accept(self) -> bool {
        self == AutoResponse::Accept
    }

    pub fn is_decline(self) -> bool {
        self == AutoResponse::Decline
    }
}

/// Funds held for one (recipient, sender) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineRecord {
    pub coins: Coins,
    #[serde(default)]
    pub declined: bool,
}

impl QuarantineRecord {
    pub fn new(coins: Coins, declined: bool) -> Self {
        Self { coins, declined }
    }

    /// Add more coins; existing coins are never overwritten
    pub fn add_coins(&mut self, coins: &Coins) -> Result<(), CoinError> {
        self.coins = self.coins.checked_add(coins)?;
        Ok(())
    }

    /// Zero-coin records are semantically empty
    pub fn is_empty(&self) -> bool {
        self.coins.is_zero()
    }
}

/// Query/genesis view of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantinedFunds {
    pub to_address: Address,
    pub from_address: Address,
    pub coins: Coins,
    #[serde(default)]
    pub declined: bool,
}

/// Query/genesis view of one auto-response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoResponseEntry {
    pub to_address: Address,
    pub from_address: Address,
    pub response: AutoResponse,
}

/// One requested change in an auto-response update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoResponseUpdate {
    pub from_address: Address,
    pub response: AutoResponse,
}
