use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::account::{AccountId, UserId};
use crate::domain::error::{Error, FieldError};

pub type TransactionId = String;

/// Provenance of a transaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Game,
    Server,
    Payment,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Game => "game",
            Source::Server => "server",
            Source::Payment => "payment",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "game" => Ok(Source::Game),
            "server" => Ok(Source::Server),
            "payment" => Ok(Source::Payment),
            _ => Err(Error::validation(vec![FieldError::new(
                "source",
                "The source must be one of: game server payment",
            )])),
        }
    }
}

/// Direction of a transaction. The amount itself is always unsigned;
/// the kind decides whether it is credited or debited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Win,
    Lose,
}

impl TransactionKind {
    /// Apply the direction to a normalized amount.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Win => amount,
            TransactionKind::Lose => -amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Win => "win",
            TransactionKind::Lose => "lose",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    // deposit/withdrawal are accepted as aliases for win/lose.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" | "deposit" => Ok(TransactionKind::Win),
            "lose" | "withdrawal" => Ok(TransactionKind::Lose),
            other => Err(Error::InvalidTransactionType(other.to_string())),
        }
    }
}

/// A committed ledger entry. Entries are immutable once written and their
/// id is never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub source: Source,
    pub kind: TransactionKind,
    pub inserted_at: DateTime<Utc>,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} account={} {} {} via {}",
            self.id, self.account_id, self.kind, self.amount, self.source
        )
    }
}

/// The raw inbound payload as the surrounding request layer hands it
/// over: the account already resolved, everything else still textual.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub id: String,
    pub account_id: AccountId,
    pub amount: String,
    pub source: String,
    pub kind: String,
}

/// An inbound record before account resolution, keyed by the submitting
/// user rather than an account.
#[derive(Debug, Clone)]
pub struct InboundRecord {
    pub user_id: UserId,
    pub transaction_id: String,
    pub amount: String,
    pub source: String,
    pub kind: String,
}

impl InboundRecord {
    pub fn into_request(self, account_id: AccountId) -> TransactionRequest {
        TransactionRequest {
            id: self.transaction_id,
            account_id,
            amount: self.amount,
            source: self.source,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_decides_the_sign() {
        let amount = Decimal::from_str("12.50").unwrap();
        assert_eq!(TransactionKind::Win.signed(amount), amount);
        assert_eq!(TransactionKind::Lose.signed(amount), -amount);
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("win".parse::<TransactionKind>().unwrap(), TransactionKind::Win);
        assert_eq!("deposit".parse::<TransactionKind>().unwrap(), TransactionKind::Win);
        assert_eq!("lose".parse::<TransactionKind>().unwrap(), TransactionKind::Lose);
        assert_eq!(
            "withdrawal".parse::<TransactionKind>().unwrap(),
            TransactionKind::Lose
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "refund".parse::<TransactionKind>().unwrap_err();
        assert_eq!(err, Error::InvalidTransactionType("refund".to_string()));
    }

    #[test]
    fn source_parses_the_closed_set() {
        for name in ["game", "server", "payment"] {
            let source: Source = name.parse().unwrap();
            assert_eq!(source.to_string(), name);
        }
        assert!("email".parse::<Source>().is_err());
    }
}
