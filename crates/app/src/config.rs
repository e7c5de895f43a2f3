//! Guard configuration
//!
//! Module names, exempt addresses and the immediate-effect deposit
//! defaults are read from a JSON file; every field has a default.

use serde::{Deserialize, Serialize};

use coinguard_core::{Address, AddressError, CoinError, Coins};
use coinguard_sanction::Params;

/// Configuration for the guard modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    // === Module accounts ===
    /// Module whose account holds quarantined funds
    #[serde(default = "default_quarantine_module_name")]
    pub quarantine_module_name: String,

    /// Module whose account is the sanction authority
    #[serde(default = "default_gov_module_name")]
    pub gov_module_name: String,

    // === Sanction ===
    /// Module accounts that can never be sanctioned
    #[serde(default = "default_unsanctionable_module_names")]
    pub unsanctionable_module_names: Vec<String>,

    /// Further exempt addresses (hex)
    #[serde(default)]
    pub extra_unsanctionable_addresses: Vec<String>,

    /// Deposit for a pending sanction to take effect; "" disables it
    #[serde(default)]
    pub default_immediate_sanction_min_deposit: String,

    /// Deposit for a pending unsanction to take effect; "" disables it
    #[serde(default)]
    pub default_immediate_unsanction_min_deposit: String,
}

fn default_quarantine_module_name() -> String {
    "quarantine".to_string()
}

fn default_gov_module_name() -> String {
    "gov".to_string()
}

fn default_unsanctionable_module_names() -> Vec<String> {
    [
        "fee_collector",
        "gov",
        "distribution",
        "mint",
        "bonded_tokens_pool",
        "not_bonded_tokens_pool",
        "quarantine",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            quarantine_module_name: default_quarantine_module_name(),
            gov_module_name: default_gov_module_name(),
            unsanctionable_module_names: default_unsanctionable_module_names(),
            extra_unsanctionable_addresses: Vec::new(),
            default_immediate_sanction_min_deposit: String::new(),
            default_immediate_unsanction_min_deposit: String::new(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Address of the quarantine holding account
    pub fn quarantine_holder(&self) -> Address {
        Address::module(&self.quarantine_module_name)
    }

    /// Address allowed to sign sanction messages
    pub fn gov_authority(&self) -> Address {
        Address::module(&self.gov_module_name)
    }

    /// Module accounts plus the configured extras
    pub fn unsanctionable_addresses(&self) -> Result<Vec<Address>, AddressError> {
        let mut addrs: Vec<Address> = self
            .unsanctionable_module_names
            .iter()
            .map(|name| Address::module(name))
            .collect();
        for raw in &self.extra_unsanctionable_addresses {
            addrs.push(raw.parse()?);
        }
        Ok(addrs)
    }

    /// Sanction params used when none are stored
    pub fn sanction_params(&self) -> Result<Params, CoinError> {
        Ok(Params {
            immediate_sanction_min_deposit: self.default_immediate_sanction_min_deposit.parse::<Coins>()?,
            immediate_unsanction_min_deposit: self.default_immediate_unsanction_min_deposit.parse::<Coins>()?,
        })
    }
}
