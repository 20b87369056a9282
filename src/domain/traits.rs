use async_trait::async_trait;
use futures::Stream;
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, Currency, Error, InboundRecord, Transaction, UserId,
};

/// Authoritative holder of accounts and the transaction ledger.
///
/// Reads always reflect committed state; `begin_apply` hands out the
/// atomic unit used to commit a ledger entry and its balance change
/// together.
#[async_trait]
pub trait Store: Send + Sync {
    type Unit: ApplyUnit + Send;

    async fn account(&self, id: AccountId) -> Result<Account, Error>;

    async fn account_by_user(&self, user_id: UserId) -> Result<Account, Error>;

    /// Open an account with a zero balance. One account exists per
    /// (user, currency) pair.
    async fn create_account(
        &self,
        user_id: UserId,
        currency: Currency,
    ) -> Result<Account, Error>;

    /// Every account the store holds, in no particular order.
    async fn accounts(&self) -> Result<Vec<Account>, Error>;

    async fn transaction(&self, id: &str) -> Result<Transaction, Error>;

    /// Acquire the account's row-level ownership and open an atomic unit
    /// against its committed state. Waits if another apply holds the row.
    async fn begin_apply(&self, account_id: AccountId) -> Result<Self::Unit, Error>;
}

/// One all-or-nothing ledger-append-plus-balance-update. Staged writes
/// become observable only at `commit`; dropping the unit rolls them back.
#[async_trait]
pub trait ApplyUnit: Send {
    /// The account state this unit operates on, with any staged delta
    /// already folded in.
    fn account(&self) -> &Account;

    /// Stage the ledger entry. Fails when the id is already taken.
    async fn append(&mut self, transaction: Transaction) -> Result<(), Error>;

    /// Stage the balance change. Fails when the candidate balance would
    /// drop below zero.
    fn apply_delta(&mut self, delta: Decimal) -> Result<&Account, Error>;

    /// Commit the staged writes as one unit.
    async fn commit(self) -> Result<(Transaction, Account), Error>;
}

/// Ordered feed of inbound transaction records.
pub trait RequestStream {
    type Stream: Stream<Item = Result<InboundRecord, Error>> + Send + Unpin + 'static;

    fn stream(&mut self) -> Self::Stream;
}

/// Sink for records the engine rejected.
pub trait DeadLetterQueue {
    fn report(&self, record: &InboundRecord, error: &Error);
}
