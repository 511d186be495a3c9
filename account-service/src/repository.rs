//! Repository for account data

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use common::db::{self, DbAccount};
use common::decimal::Amount;
use common::error::{Error, Result};
use common::model::account::{Account, AccountId, AccountType, NewAccount};
use dashmap::DashMap;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::AccountServiceConfig;

const SELECT_ACCOUNT: &str =
    "SELECT id, user_id, account_type, creation_date, open_balance, balance FROM accounts";

/// Account repository trait defining the interface for account data storage
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store a new account, assigning its ID
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Get an account by ID
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Get all accounts owned by a user
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Account>>;

    /// Get all accounts of one type owned by a user
    async fn find_by_user_and_type(&self, user_id: &str, account_type: AccountType) -> Result<Vec<Account>>;

    /// Overwrite the balance of an existing account
    async fn update_balance(&self, id: AccountId, balance: Amount) -> Result<Account>;
}

/// In-memory repository for account data
pub struct InMemoryAccountRepository {
    /// Accounts by ID
    pub accounts: DashMap<AccountId, Account>,
    /// Last assigned ID
    sequence: AtomicI32,
}

impl InMemoryAccountRepository {
    /// Create a new in-memory account repository
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            sequence: AtomicI32::new(0),
        }
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<Account>
    where
        F: Fn(&Account) -> bool,
    {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let account = new_account.into_account(id);

        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Account>> {
        Ok(self.collect_sorted(|account| account.user_id == user_id))
    }

    async fn find_by_user_and_type(&self, user_id: &str, account_type: AccountType) -> Result<Vec<Account>> {
        Ok(self.collect_sorted(|account| {
            account.user_id == user_id && account.account_type == account_type
        }))
    }

    async fn update_balance(&self, id: AccountId, balance: Amount) -> Result<Account> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", id)))?;

        entry.balance = balance;
        Ok(entry.clone())
    }
}

/// PostgreSQL repository for account data
pub struct PostgresAccountRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a repository over an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new PostgreSQL account repository
    pub async fn new(database_url: Option<String>) -> Result<Self> {
        let database_url = match database_url {
            Some(url) => url,
            None => std::env::var("DATABASE_URL")
                .map_err(|_| Error::ConfigurationError("DATABASE_URL must be set".to_string()))?,
        };

        let pool = db::init_db_pool(&database_url, 5).await?;
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL account repository with configuration
    pub async fn with_config(config: &AccountServiceConfig) -> Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| Error::ConfigurationError("DATABASE_URL must be set".to_string()))?;

        info!("Connecting to PostgreSQL database with pool size: {}", config.db_pool_size);
        let pool = db::init_db_pool(database_url, config.db_pool_size).await?;

        if config.run_migrations {
            db::run_migrations(&pool).await?;
        }

        Ok(Self { pool })
    }

    fn into_accounts(rows: Vec<DbAccount>) -> Result<Vec<Account>> {
        rows.into_iter().map(Account::try_from).collect()
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!("Creating new account in database for user {}", new_account.user_id);

        // The SERIAL column assigns the real id
        let draft = new_account.into_account(0);

        let id: AccountId = sqlx::query_scalar(
            "INSERT INTO accounts (user_id, account_type, creation_date, open_balance, balance)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&draft.user_id)
        .bind(draft.account_type.as_str())
        .bind(draft.creation_date)
        .bind(draft.open_balance)
        .bind(draft.balance)
        .fetch_one(&self.pool)
        .await?;

        Ok(Account { id, ..draft })
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        debug!("Getting account from database: {}", id);

        let row = sqlx::query_as::<_, DbAccount>(&format!("{} WHERE id = $1", SELECT_ACCOUNT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Account>> {
        debug!("Getting accounts for user: {}", user_id);

        let rows = sqlx::query_as::<_, DbAccount>(&format!(
            "{} WHERE user_id = $1 ORDER BY id",
            SELECT_ACCOUNT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Self::into_accounts(rows)
    }

    async fn find_by_user_and_type(&self, user_id: &str, account_type: AccountType) -> Result<Vec<Account>> {
        debug!("Getting {} accounts for user: {}", account_type, user_id);

        let rows = sqlx::query_as::<_, DbAccount>(&format!(
            "{} WHERE user_id = $1 AND account_type = $2 ORDER BY id",
            SELECT_ACCOUNT
        ))
        .bind(user_id)
        .bind(account_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Self::into_accounts(rows)
    }

    async fn update_balance(&self, id: AccountId, balance: Amount) -> Result<Account> {
        debug!("Updating balance in database for account {}", id);

        let row = sqlx::query_as::<_, DbAccount>(
            "UPDATE accounts SET balance = $2 WHERE id = $1
             RETURNING id, user_id, account_type, creation_date, open_balance, balance",
        )
        .bind(id)
        .bind(balance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", id)))?;

        Account::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryAccountRepository::new();

        let first = repo.create_account(NewAccount::new("dfp", AccountType::Current, dec!(10))).await.unwrap();
        let second = repo.create_account(NewAccount::new("dfp", AccountType::Current, dec!(10))).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.accounts.len(), 2);
    }

    #[tokio::test]
    async fn test_update_balance_unknown_account() {
        let repo = InMemoryAccountRepository::new();
        let result = repo.update_balance(42, dec!(1)).await;

        assert!(matches!(result, Err(Error::AccountNotFound(_))));
    }
}
