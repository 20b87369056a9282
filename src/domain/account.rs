use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::error::{Error, FieldError};

pub type AccountId = i64;
pub type UserId = i64;

/// The closed set of currencies an account can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Eur
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(Error::validation(vec![FieldError::new(
                "currency",
                "The currency must be one of: USD EUR GBP",
            )])),
        }
    }
}

/// Operational state of an account. The transaction engine never changes
/// it; account lifecycle management lives outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Closed,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => f.write_str("active"),
            AccountStatus::Closed => f.write_str("closed"),
        }
    }
}

/// A per-user monetary account. One account exists per (user, currency)
/// pair, and its balance never goes negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub balance: Decimal,
    pub currency: Currency,
    pub status: AccountStatus,
}

impl Account {
    /// A freshly opened account starts active with a zero balance.
    pub fn open(id: AccountId, user_id: UserId, currency: Currency) -> Self {
        Self {
            id,
            user_id,
            balance: Decimal::ZERO,
            currency,
            status: AccountStatus::Active,
        }
    }
}
