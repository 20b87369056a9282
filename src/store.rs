use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::domain::{
    Account, AccountId, ApplyUnit, Currency, Error, Store, Transaction, UserId,
};

// account_by_user resolution order when a user holds accounts in more
// than one currency
const CURRENCIES: [Currency; 3] = [Currency::Eur, Currency::Usd, Currency::Gbp];

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    accounts_by_user: HashMap<(UserId, Currency), AccountId>,
    ledger: HashMap<String, Transaction>,
    row_locks: HashMap<AccountId, Arc<Mutex<()>>>,
    next_account_id: AccountId,
}

/// In-memory storage backend.
///
/// Applies against one account are serialized by a per-account lock held
/// for the lifetime of the apply unit, so every unit reads the committed
/// balance and commits against it without interleaving. Units against
/// different accounts do not contend. Nothing an unfinished unit staged
/// is visible to readers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Unit = MemoryUnit;

    async fn account(&self, id: AccountId) -> Result<Account, Error> {
        let inner = self.inner.read().await;
        inner.accounts.get(&id).cloned().ok_or(Error::AccountNotFound)
    }

    async fn account_by_user(&self, user_id: UserId) -> Result<Account, Error> {
        let inner = self.inner.read().await;
        for currency in CURRENCIES {
            if let Some(id) = inner.accounts_by_user.get(&(user_id, currency)) {
                return inner.accounts.get(id).cloned().ok_or(Error::AccountNotFound);
            }
        }
        Err(Error::AccountNotFound)
    }

    async fn create_account(
        &self,
        user_id: UserId,
        currency: Currency,
    ) -> Result<Account, Error> {
        let mut inner = self.inner.write().await;
        if inner.accounts_by_user.contains_key(&(user_id, currency)) {
            return Err(Error::DuplicateAccount);
        }

        inner.next_account_id += 1;
        let id = inner.next_account_id;
        let account = Account::open(id, user_id, currency);
        inner.accounts.insert(id, account.clone());
        inner.accounts_by_user.insert((user_id, currency), id);
        inner.row_locks.insert(id, Arc::new(Mutex::new(())));

        debug!(account_id = id, user_id, %currency, "account opened");
        Ok(account)
    }

    async fn accounts(&self) -> Result<Vec<Account>, Error> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.values().cloned().collect())
    }

    async fn transaction(&self, id: &str) -> Result<Transaction, Error> {
        let inner = self.inner.read().await;
        inner.ledger.get(id).cloned().ok_or(Error::TransactionNotFound)
    }

    async fn begin_apply(&self, account_id: AccountId) -> Result<MemoryUnit, Error> {
        let lock = {
            let inner = self.inner.read().await;
            if !inner.accounts.contains_key(&account_id) {
                return Err(Error::AccountNotFound);
            }
            inner
                .row_locks
                .get(&account_id)
                .cloned()
                .ok_or_else(|| Error::Storage(format!("no row lock for account {account_id}")))?
        };

        // May wait here until a concurrent apply releases the row.
        let row = lock.lock_owned().await;

        // Re-read now that this unit owns the row; the balance cannot
        // change underneath it from here on.
        let account = {
            let inner = self.inner.read().await;
            inner
                .accounts
                .get(&account_id)
                .cloned()
                .ok_or(Error::AccountNotFound)?
        };

        Ok(MemoryUnit {
            inner: Arc::clone(&self.inner),
            _row: row,
            account,
            staged_entry: None,
            staged_balance: None,
        })
    }
}

/// An open atomic unit against one account row. Writes are staged on the
/// unit and published together at [`ApplyUnit::commit`]; dropping the
/// unit discards them and releases the row.
#[derive(Debug)]
pub struct MemoryUnit {
    inner: Arc<RwLock<Inner>>,
    _row: OwnedMutexGuard<()>,
    account: Account,
    staged_entry: Option<Transaction>,
    staged_balance: Option<Decimal>,
}

#[async_trait]
impl ApplyUnit for MemoryUnit {
    fn account(&self) -> &Account {
        &self.account
    }

    async fn append(&mut self, transaction: Transaction) -> Result<(), Error> {
        {
            let inner = self.inner.read().await;
            if inner.ledger.contains_key(&transaction.id) {
                return Err(Error::DuplicateTransaction(transaction.id));
            }
        }
        self.staged_entry = Some(transaction);
        Ok(())
    }

    fn apply_delta(&mut self, delta: Decimal) -> Result<&Account, Error> {
        let candidate = self.account.balance + delta;
        if candidate < Decimal::ZERO {
            return Err(Error::InsufficientBalance);
        }
        self.account.balance = candidate;
        self.staged_balance = Some(candidate);
        Ok(&self.account)
    }

    async fn commit(self) -> Result<(Transaction, Account), Error> {
        let entry = self
            .staged_entry
            .ok_or_else(|| Error::Storage("commit without a staged ledger entry".into()))?;
        let balance = self
            .staged_balance
            .ok_or_else(|| Error::Storage("commit without a staged balance".into()))?;

        let mut inner = self.inner.write().await;

        // Transaction ids are global, so an apply against another account
        // may have claimed this id after it was staged.
        if inner.ledger.contains_key(&entry.id) {
            return Err(Error::DuplicateTransaction(entry.id));
        }

        let account = inner
            .accounts
            .get_mut(&entry.account_id)
            .ok_or(Error::AccountNotFound)?;
        account.balance = balance;
        let account = account.clone();
        inner.ledger.insert(entry.id.clone(), entry.clone());

        Ok((entry, account))
    }
}
