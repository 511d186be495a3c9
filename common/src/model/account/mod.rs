//! Account models and the balance transition rule
//!
//! Field names on the wire follow the public JSON contract: `userid`,
//! `type`, `creationdate` (epoch milliseconds), `openbalance` and `balance`
//! (JSON numbers).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Amount;
use crate::error::Error;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Store-assigned account identifier
pub type AccountId = i32;

/// Account category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Day-to-day current account
    Current,
    /// Savings account
    Savings,
}

impl AccountType {
    /// Wire and column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "CURRENT",
            AccountType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CURRENT" => Ok(AccountType::Current),
            "SAVINGS" => Ok(AccountType::Savings),
            other => Err(Error::ValidationError(format!("Unknown account type: {}", other))),
        }
    }
}

/// Account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Account {
    /// Unique account ID, assigned by the store
    #[cfg_attr(feature = "utoipa", schema(value_type = i32))]
    pub id: AccountId,
    /// Owning user
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Account category
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Creation timestamp
    #[serde(rename = "creationdate", with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "utoipa", schema(value_type = i64))]
    pub creation_date: DateTime<Utc>,
    /// Balance at creation time
    #[serde(rename = "openbalance", with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa", schema(value_type = f64))]
    pub open_balance: Amount,
    /// Current balance
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa", schema(value_type = f64))]
    pub balance: Amount,
}

impl Account {
    /// Apply a transaction to the in-memory balance.
    ///
    /// The balance only changes when the outcome is
    /// [`TransactionOutcome::Success`]. A transaction that would leave the
    /// balance below zero, or outside the range of [`Amount`], is rejected
    /// and the account is left untouched.
    pub fn apply(&mut self, transaction: &Transaction) -> TransactionOutcome {
        let candidate = transaction
            .transaction_type
            .apply_to(self.balance, transaction.amount);

        match candidate {
            Some(balance) if balance >= Amount::ZERO => {
                self.balance = balance;
                TransactionOutcome::Success { balance }
            }
            _ => TransactionOutcome::Rejected { balance: self.balance },
        }
    }
}

/// Account creation request
///
/// Only the owner and the type are required. A missing opening balance is
/// zero, a missing balance equals the opening balance and a missing creation
/// date is the time the account is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct NewAccount {
    /// Owning user
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Account category
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Creation timestamp
    #[serde(
        rename = "creationdate",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<i64>))]
    pub creation_date: Option<DateTime<Utc>>,
    /// Balance at creation time
    #[serde(
        rename = "openbalance",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub open_balance: Option<Amount>,
    /// Initial balance
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub balance: Option<Amount>,
}

impl NewAccount {
    /// Create a request for a new account with the given opening balance
    pub fn new(user_id: impl Into<String>, account_type: AccountType, open_balance: Amount) -> Self {
        Self {
            user_id: user_id.into(),
            account_type,
            creation_date: None,
            open_balance: Some(open_balance),
            balance: None,
        }
    }

    /// Set an explicit creation date
    pub fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = Some(creation_date);
        self
    }

    /// Build the stored account once an id has been assigned
    pub fn into_account(self, id: AccountId) -> Account {
        let open_balance = self.open_balance.unwrap_or(Amount::ZERO);

        Account {
            id,
            user_id: self.user_id,
            account_type: self.account_type,
            creation_date: self.creation_date.unwrap_or_else(Utc::now),
            open_balance,
            balance: self.balance.unwrap_or(open_balance),
        }
    }
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Increases the balance
    Credit,
    /// Decreases the balance
    Debit,
}

impl TransactionType {
    /// Candidate balance after moving `amount` in this direction, `None` on overflow
    pub fn apply_to(self, balance: Amount, amount: Amount) -> Option<Amount> {
        match self {
            TransactionType::Credit => balance.checked_add(amount),
            TransactionType::Debit => balance.checked_sub(amount),
        }
    }
}

/// Balance transaction instruction. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Transaction {
    /// Target account
    #[serde(rename = "accountId")]
    #[cfg_attr(feature = "utoipa", schema(value_type = i32))]
    pub account_id: AccountId,
    /// Magnitude of the movement
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa", schema(value_type = f64))]
    pub amount: Amount,
    /// Direction of the movement
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Credit `amount` to an account
    pub fn credit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            amount,
            transaction_type: TransactionType::Credit,
        }
    }

    /// Debit `amount` from an account
    pub fn debit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            amount,
            transaction_type: TransactionType::Debit,
        }
    }
}

/// Result of applying a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Balance updated
    Success {
        /// Balance after the transaction
        balance: Amount,
    },
    /// Balance would have gone negative or overflowed; nothing changed
    Rejected {
        /// Unchanged balance
        balance: Amount,
    },
}

impl TransactionOutcome {
    /// Whether the transaction was applied
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Success { .. })
    }

    /// Balance held by the account after the call
    pub fn balance(&self) -> Amount {
        match self {
            TransactionOutcome::Success { balance } | TransactionOutcome::Rejected { balance } => *balance,
        }
    }
}
