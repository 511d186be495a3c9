use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::model::account::{Account, AccountId};

/// Database model for Account table
#[derive(Debug, Clone, FromRow)]
pub struct DbAccount {
    pub id: AccountId,
    pub user_id: String,
    pub account_type: String,
    pub creation_date: DateTime<Utc>,
    pub open_balance: Decimal,
    pub balance: Decimal,
}

impl TryFrom<DbAccount> for Account {
    type Error = Error;

    fn try_from(row: DbAccount) -> Result<Self> {
        Ok(Account {
            id: row.id,
            user_id: row.user_id,
            account_type: row.account_type.parse()?,
            creation_date: row.creation_date,
            open_balance: row.open_balance,
            balance: row.balance,
        })
    }
}
