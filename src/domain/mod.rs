pub mod account;
pub mod error;
pub mod money;
pub mod traits;
pub mod transaction;

pub use account::{Account, AccountId, AccountStatus, Currency, UserId};
pub use error::{Error, FieldError, FieldErrors};
pub use traits::{ApplyUnit, DeadLetterQueue, RequestStream, Store};
pub use transaction::{
    InboundRecord, Source, Transaction, TransactionId, TransactionKind, TransactionRequest,
};
