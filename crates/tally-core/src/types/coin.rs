use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::serialize::amount_str;

/// A single denomination amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_str")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Coin {
            denom: denom.into(),
            amount,
        }
    }
}

/// A coin vector: at most one non-zero amount per denomination, kept in
/// denomination order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    pub fn new() -> Self {
        Coins(BTreeMap::new())
    }

    /// Build from a list of coins, merging duplicate denominations
    pub fn from_coins<I: IntoIterator<Item = Coin>>(coins: I) -> Result<Self, CoreError> {
        let mut out = Coins::new();
        for coin in coins {
            out.add_amount(&coin.denom, coin.amount)?;
        }
        Ok(out)
    }

    /// Amount held in `denom`, zero when absent
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// Add `amount` of `denom`; zero amounts are ignored
    pub fn add_amount(&mut self, denom: &str, amount: u128) -> Result<(), CoreError> {
        if amount == 0 {
            return Ok(());
        }
        let entry = self.0.entry(denom.to_string()).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(CoreError::Overflow)?;
        Ok(())
    }

    /// Merge another vector into this one
    pub fn add_coins(&mut self, other: &Coins) -> Result<(), CoreError> {
        for (denom, amount) in other.iter() {
            self.add_amount(denom, amount)?;
        }
        Ok(())
    }

    pub fn saturating_add(&self, other: &Coins) -> Coins {
        let mut sum = self.clone();
        for (denom, amount) in other.iter() {
            let entry = sum.0.entry(denom.to_string()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        sum
    }

    /// Per-denomination subtraction floored at zero; emptied denominations
    /// are dropped
    pub fn saturating_sub(&self, other: &Coins) -> Coins {
        let entries = self
            .0
            .iter()
            .map(|(denom, amount)| (denom.clone(), amount.saturating_sub(other.amount_of(denom))))
            .filter(|(_, amount)| *amount > 0)
            .collect();
        Coins(entries)
    }

    /// True when some coin in `floor` is met or exceeded by this vector's
    /// amount of the same denomination. An empty floor is never met.
    pub fn is_any_gte(&self, floor: &Coins) -> bool {
        floor
            .iter()
            .any(|(denom, min)| self.amount_of(denom) >= min)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> + '_ {
        self.0.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Coin> {
        self.iter().map(|(denom, amount)| Coin::new(denom, amount)).collect()
    }

    /// Insert a per-denomination result computed elsewhere; callers guarantee
    /// the denomination is not present yet.
    pub(crate) fn insert_nonzero(&mut self, denom: &str, amount: u128) {
        if amount > 0 {
            self.0.insert(denom.to_string(), amount);
        }
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoreError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Coins::from_coins(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.to_vec()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(denom, amount)| format!("{}{}", amount, denom))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
