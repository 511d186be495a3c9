//! Account service implementation

use std::sync::Arc;

use common::error::{Error, ErrorExt, Result};
use common::model::account::{Account, AccountId, AccountType, NewAccount, Transaction, TransactionOutcome};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AccountServiceConfig;
use crate::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};

/// Account service: account lookups and balance transactions
pub struct AccountService {
    /// Repository for account data
    repo: Arc<dyn AccountRepository>,
    /// Per-account guards serialising read-check-write on one balance.
    /// Only effective within this process.
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// PostgreSQL repository
    Postgres(Option<String>),
}

impl AccountService {
    /// Create a new account service backed by the in-memory store
    pub fn new() -> Self {
        Self::from_repository(Arc::new(InMemoryAccountRepository::new()))
    }

    /// Create a service over any repository implementation
    pub fn from_repository(repo: Arc<dyn AccountRepository>) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
        }
    }

    /// Create a new account service with a specific repository type
    pub async fn with_repository(repo_type: RepositoryType) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> = match repo_type {
            RepositoryType::InMemory => Arc::new(InMemoryAccountRepository::new()),
            RepositoryType::Postgres(database_url) => {
                Arc::new(PostgresAccountRepository::new(database_url).await?)
            }
        };

        Ok(Self::from_repository(repo))
    }

    /// Create a new account service with a configuration
    pub async fn with_config(config: &AccountServiceConfig) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> = match config.database_url {
            Some(_) => Arc::new(PostgresAccountRepository::with_config(config).await?),
            None => {
                info!("No database configured, using in-memory account store");
                Arc::new(InMemoryAccountRepository::new())
            }
        };

        Ok(Self::from_repository(repo))
    }

    /// Persist a new account and return its assigned ID
    pub async fn save_account(&self, new_account: NewAccount) -> Result<AccountId> {
        info!(
            "Creating {} account for user {}",
            new_account.account_type, new_account.user_id
        );

        let account = self
            .repo
            .create_account(new_account)
            .await
            .with_context(|| "Failed to create account")?;

        info!("Created account {}", account.id);
        Ok(account.id)
    }

    /// Get an account by ID
    pub async fn find_account(&self, id: AccountId) -> Result<Account> {
        debug!("Finding account {}", id);

        self.repo
            .get_account(id)
            .await
            .with_context(|| format!("Failed to retrieve account {}", id))?
            .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", id)))
    }

    /// Get all accounts owned by a user
    pub async fn find_accounts(&self, user_id: &str) -> Result<Vec<Account>> {
        debug!("Finding accounts for user {}", user_id);
        self.repo.find_by_user(user_id).await
    }

    /// Get all accounts of one type owned by a user
    pub async fn find_accounts_by_type(&self, user_id: &str, account_type: AccountType) -> Result<Vec<Account>> {
        debug!("Finding {} accounts for user {}", account_type, user_id);
        self.repo.find_by_user_and_type(user_id, account_type).await
    }

    /// Apply a credit or debit to an account balance.
    ///
    /// A transaction that would drive the balance below zero, or past the
    /// decimal range, is reported as [`TransactionOutcome::Rejected`] and
    /// nothing is written. An unknown
    /// account is an [`Error::AccountNotFound`].
    pub async fn apply_transaction(&self, transaction: &Transaction) -> Result<TransactionOutcome> {
        info!(
            "Applying {:?} of {} to account {}",
            transaction.transaction_type, transaction.amount, transaction.account_id
        );

        // Unknown ids must not leave an entry in the lock table
        self.find_account(transaction.account_id).await?;

        let lock = self.account_lock(transaction.account_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_locked(transaction).await
        };
        drop(lock);
        self.release_lock(transaction.account_id);

        result
    }

    /// Read-check-write of one balance; the caller holds the account lock
    async fn apply_locked(&self, transaction: &Transaction) -> Result<TransactionOutcome> {
        let mut account = self.find_account(transaction.account_id).await?;

        match account.apply(transaction) {
            rejected @ TransactionOutcome::Rejected { balance } => {
                warn!(
                    "Rejected {:?} of {} on account {}: balance {} cannot absorb it",
                    transaction.transaction_type, transaction.amount, account.id, balance
                );
                Ok(rejected)
            }
            TransactionOutcome::Success { .. } => {
                let stored = self
                    .repo
                    .update_balance(account.id, account.balance)
                    .await
                    .with_context(|| format!("Failed to update balance for account {}", account.id))?;

                info!("Account {} balance is now {}", stored.id, stored.balance);
                Ok(TransactionOutcome::Success { balance: stored.balance })
            }
        }
    }

    fn account_lock(&self, id: AccountId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry once no caller holds or waits on it
    fn release_lock(&self, id: AccountId) {
        self.locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
