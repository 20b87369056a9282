use std::fmt;

/// A single failed validation rule, keyed by the wire name of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),

    #[error("invalid amount format")]
    InvalidAmount,

    #[error("amount must be a positive number")]
    AmountMustBePositive,

    #[error("invalid transaction type: {0}")]
    InvalidTransactionType(String),

    #[error("user account not found")]
    AccountNotFound,

    #[error("user account already exists")]
    DuplicateAccount,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("transaction {0} already exists")]
    DuplicateTransaction(String),

    #[error("user transaction not found")]
    TransactionNotFound,

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl Error {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::ValidationFailed(FieldErrors(errors))
    }

    /// Infrastructure faults may be retried by the caller; business
    /// rejections will fail the same way on every resubmission.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
