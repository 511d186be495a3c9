//! Domain models for the accounts service

pub mod account;

pub use account::{
    Account, AccountId, AccountType, NewAccount, Transaction, TransactionOutcome, TransactionType,
};
