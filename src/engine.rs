use chrono::Utc;
use futures::StreamExt;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::money;
use crate::domain::{
    AccountId, ApplyUnit, Currency, DeadLetterQueue, Error, InboundRecord, RequestStream, Source,
    Store, Transaction, TransactionKind, TransactionRequest,
};
use crate::validation;

/// What the caller gets back for a committed transaction: the ledger
/// entry's identity plus the post-apply account snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: String,
    pub account_id: AccountId,
    pub new_balance: Decimal,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub source: Source,
}

/// Counts for one drained request stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: u64,
    pub rejected: u64,
    pub malformed: u64,
}

/// Applies inbound transaction requests to accounts, all-or-nothing.
///
/// The storage handle is passed in explicitly; the engine keeps no state
/// of its own and can be shared freely between concurrent callers.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, normalize, and atomically apply one transaction request.
    ///
    /// Either the ledger entry and the balance change are both committed,
    /// or neither is; every error leaves the account exactly as it was.
    pub async fn apply(&self, request: TransactionRequest) -> Result<Receipt, Error> {
        validation::validate_request(&request)?;

        let amount = money::normalize_amount(&request.amount)?;
        let kind: TransactionKind = request.kind.parse()?;
        let source: Source = request.source.parse()?;
        let delta = kind.signed(amount);

        debug!(
            tx_id = %request.id,
            account_id = request.account_id,
            %kind,
            %amount,
            "applying transaction"
        );

        let mut unit = self.store.begin_apply(request.account_id).await?;
        let previous_balance = unit.account().balance;

        let entry = Transaction {
            id: request.id,
            account_id: request.account_id,
            amount,
            source,
            kind,
            inserted_at: Utc::now(),
        };
        unit.append(entry).await?;
        unit.apply_delta(delta)?;
        let (transaction, account) = unit.commit().await?;

        info!(
            tx_id = %transaction.id,
            account_id = account.id,
            %previous_balance,
            new_balance = %account.balance,
            "transaction committed"
        );

        Ok(Receipt {
            transaction_id: transaction.id,
            account_id: account.id,
            new_balance: account.balance,
            amount,
            kind,
            source,
        })
    }

    /// Drain a stream of inbound records, standing in for the transport
    /// layer: resolve each submitting user to their account (opening one
    /// on first sight), apply, and hand rejections to the dead-letter
    /// sink.
    pub async fn process<I, D>(&self, ingestion: &mut I, dlq: &D) -> BatchOutcome
    where
        I: RequestStream,
        D: DeadLetterQueue,
    {
        let mut stream = ingestion.stream();
        let mut outcome = BatchOutcome::default();

        while let Some(item) = stream.next().await {
            let record = match item {
                Ok(record) => record,
                Err(err) => {
                    warn!(%err, "discarding unreadable record");
                    outcome.malformed += 1;
                    continue;
                }
            };

            match self.resolve_and_apply(&record).await {
                Ok(_) => outcome.applied += 1,
                Err(err) => {
                    dlq.report(&record, &err);
                    outcome.rejected += 1;
                }
            }
        }

        outcome
    }

    async fn resolve_and_apply(&self, record: &InboundRecord) -> Result<Receipt, Error> {
        let account = match self.store.account_by_user(record.user_id).await {
            Ok(account) => account,
            Err(Error::AccountNotFound) => {
                self.store
                    .create_account(record.user_id, Currency::default())
                    .await?
            }
            Err(err) => return Err(err),
        };

        self.apply(record.clone().into_request(account.id)).await
    }
}
