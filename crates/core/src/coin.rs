//! Coin / Coins - Denominated amounts
//!
//! `Coins` is a canonical set: denoms are unique and sorted, and zero
//! entries are never kept. The string form is `"100fish,5stake"`.

use crate::amount::{Amount, AmountError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing or combining coins
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("Invalid denom: {0}")]
    InvalidDenom(String),

    #[error("Invalid coin: {0}")]
    InvalidCoin(String),

    #[error("Duplicate denom: {0}")]
    DuplicateDenom(String),

    #[error("Coin amount overflow for denom {0}")]
    Overflow(String),

    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Validate a denom: a letter followed by 2..=127 of `[a-zA-Z0-9/:._-]`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let mut chars = denom.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    if !first_ok || !rest_ok || denom.len() < 3 || denom.len() > 128 {
        return Err(CoinError::InvalidDenom(denom.to_string()));
    }
    Ok(())
}

/// A single denominated amount
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    /// Create a new coin, validating the denom
    pub fn new(amount: impl Into<Amount>, denom: impl Into<String>) -> Result<Self, CoinError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self {
            denom,
            amount: amount.into(),
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinError::InvalidCoin(s.to_string()))?;
        if split == 0 {
            return Err(CoinError::InvalidCoin(s.to_string()));
        }
        let (amount, denom) = s.split_at(split);
        Coin::new(amount.parse::<Amount>()?, denom)
    }
}

impl TryFrom<String> for Coin {
    type Error = CoinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coin> for String {
    fn from(coin: Coin) -> Self {
        coin.to_string()
    }
}

/// Canonical multi-denom amount
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coins(BTreeMap<String, Amount>);

impl Coins {
    /// Empty set of coins
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from individual coins. Zero coins are dropped, duplicates rejected.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, CoinError> {
        let mut map = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            if map.contains_key(&coin.denom) {
                return Err(CoinError::DuplicateDenom(coin.denom));
            }
            if !coin.amount.is_zero() {
                map.insert(coin.denom, coin.amount);
            }
        }
        Ok(Self(map))
    }

    /// Shorthand for a single-denom set
    pub fn single(amount: impl Into<Amount>, denom: impl Into<String>) -> Result<Self, CoinError> {
        Self::from_coins([Coin::new(amount, denom)?])
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount held of `denom` (zero when absent)
    pub fn amount_of(&self, denom: &str) -> Amount {
        self.0.get(denom).copied().unwrap_or(Amount::ZERO)
    }

    /// Iterate in denom order
    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().map(|(denom, amount)| Coin {
            denom: denom.clone(),
            amount: *amount,
        })
    }

    /// Coin-wise sum
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoinError> {
        let mut sum = self.0.clone();
        for (denom, amount) in &other.0 {
            let entry = sum.entry(denom.clone()).or_insert(Amount::ZERO);
            *entry = entry
                .checked_add(amount)
                .ok_or_else(|| CoinError::Overflow(denom.clone()))?;
        }
        Ok(Coins(sum))
    }

    /// Coin-wise difference. None if any denom would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut diff = self.0.clone();
        for (denom, amount) in &other.0 {
            let have = diff.get(denom).copied().unwrap_or(Amount::ZERO);
            let left = have.checked_sub(amount)?;
            if left.is_zero() {
                diff.remove(denom);
            } else {
                diff.insert(denom.clone(), left);
            }
        }
        Some(Coins(diff))
    }

    /// Coin-wise difference, clamping each denom at zero
    pub fn saturating_sub(&self, other: &Coins) -> Coins {
        let mut diff = BTreeMap::new();
        for (denom, amount) in &self.0 {
            if let Some(left) = amount.checked_sub(&other.amount_of(denom)) {
                if !left.is_zero() {
                    diff.insert(denom.clone(), left);
                }
            }
        }
        Coins(diff)
    }

    /// True when every denom in `other` is covered by `self`
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .0
            .iter()
            .all(|(denom, amount)| self.amount_of(denom) >= *amount)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::new());
        }
        let coins = s
            .split(',')
            .map(str::parse::<Coin>)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::from_coins(coins)
    }
}

impl TryFrom<String> for Coins {
    type Error = CoinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Coins> for String {
    fn from(coins: Coins) -> Self {
        coins.to_string()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        let mut map = BTreeMap::new();
        if !coin.amount.is_zero() {
            map.insert(coin.denom, coin.amount);
        }
        Coins(map)
    }
}
