use std::sync::Arc;

use account_service::{
    AccountRepository, AccountService, AccountServiceConfig, InMemoryAccountRepository, RepositoryType,
};
use common::decimal::Amount;
use common::error::Error;
use common::model::account::{AccountType, NewAccount, Transaction, TransactionOutcome};
use rust_decimal_macros::dec;

async fn service_with_account(balance: Amount) -> (AccountService, i32) {
    let service = AccountService::with_repository(RepositoryType::InMemory).await.unwrap();
    let id = service
        .save_account(NewAccount::new("dfp", AccountType::Current, balance))
        .await
        .unwrap();
    (service, id)
}

#[tokio::test]
async fn test_with_config_without_database_url_uses_memory() {
    let service = AccountService::with_config(&AccountServiceConfig::in_memory())
        .await
        .unwrap();

    let id = service
        .save_account(NewAccount::new("dfp", AccountType::Savings, dec!(1)))
        .await
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(service.find_account(id).await.unwrap().account_type, AccountType::Savings);
}

#[tokio::test]
async fn test_save_account_returns_store_id() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let service = AccountService::from_repository(repo.clone());

    let id = service
        .save_account(NewAccount::new("dfp", AccountType::Current, dec!(500.00)))
        .await
        .unwrap();

    let stored = repo.get_account(id).await.unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.user_id, "dfp");
}

#[tokio::test]
async fn test_find_account_roundtrip() {
    let service = AccountService::new();
    let creation_date = chrono::Utc::now();
    let id = service
        .save_account(NewAccount::new("dfp", AccountType::Savings, dec!(42.5)).with_creation_date(creation_date))
        .await
        .unwrap();

    let first = service.find_account(id).await.unwrap();
    assert_eq!(first.id, id);
    assert_eq!(first.account_type, AccountType::Savings);
    assert_eq!(first.creation_date, creation_date);
    assert_eq!(first.open_balance, dec!(42.5));
    assert_eq!(first.balance, dec!(42.5));

    // Reads without intervening transactions are stable
    let second = service.find_account(id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_find_account_not_found() {
    let service = AccountService::new();

    match service.find_account(404).await {
        Err(Error::AccountNotFound(_)) => (),
        other => panic!("Expected AccountNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_find_accounts_by_user() {
    let service = AccountService::new();
    let a = service.save_account(NewAccount::new("alice", AccountType::Current, dec!(1))).await.unwrap();
    let _ = service.save_account(NewAccount::new("bob", AccountType::Current, dec!(2))).await.unwrap();
    let c = service.save_account(NewAccount::new("alice", AccountType::Savings, dec!(3))).await.unwrap();

    let accounts = service.find_accounts("alice").await.unwrap();
    let ids: Vec<i32> = accounts.iter().map(|acc| acc.id).collect();
    assert_eq!(ids, vec![a, c]);
    assert!(accounts.iter().all(|acc| acc.user_id == "alice"));

    assert!(service.find_accounts("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_accounts_by_type() {
    let service = AccountService::new();
    let current = service.save_account(NewAccount::new("alice", AccountType::Current, dec!(1))).await.unwrap();
    let savings = service.save_account(NewAccount::new("alice", AccountType::Savings, dec!(1))).await.unwrap();
    let _ = service.save_account(NewAccount::new("bob", AccountType::Savings, dec!(1))).await.unwrap();

    let found = service.find_accounts_by_type("alice", AccountType::Current).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, current);

    let found = service.find_accounts_by_type("alice", AccountType::Savings).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, savings);

    assert!(service.find_accounts_by_type("carol", AccountType::Savings).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_credit_transaction() {
    let (service, id) = service_with_account(dec!(500.00)).await;

    let outcome = service.apply_transaction(&Transaction::credit(id, dec!(100.00))).await.unwrap();
    assert_eq!(outcome, TransactionOutcome::Success { balance: dec!(600.00) });

    let account = service.find_account(id).await.unwrap();
    assert_eq!(account.balance, dec!(600.00));
    assert_eq!(account.open_balance, dec!(500.00));
}

#[tokio::test]
async fn test_debit_transaction() {
    let (service, id) = service_with_account(dec!(500.00)).await;

    let outcome = service.apply_transaction(&Transaction::debit(id, dec!(200.00))).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(service.find_account(id).await.unwrap().balance, dec!(300.00));
}

#[tokio::test]
async fn test_debit_insufficient_funds() {
    let (service, id) = service_with_account(dec!(500.00)).await;

    let outcome = service.apply_transaction(&Transaction::debit(id, dec!(600.00))).await.unwrap();
    assert_eq!(outcome, TransactionOutcome::Rejected { balance: dec!(500.00) });
    assert_eq!(service.find_account(id).await.unwrap().balance, dec!(500.00));
}

#[tokio::test]
async fn test_transaction_unknown_account() {
    let service = AccountService::new();

    let result = service.apply_transaction(&Transaction::credit(9, dec!(1))).await;
    assert!(matches!(result, Err(Error::AccountNotFound(_))));
}

#[tokio::test]
async fn test_concurrent_debits_never_overdraw() {
    let (service, id) = service_with_account(dec!(500)).await;
    let service = Arc::new(service);

    let tasks = (0..10).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.apply_transaction(&Transaction::debit(id, dec!(100))).await })
    });

    let outcomes: Vec<TransactionOutcome> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let applied = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(applied, 5);
    assert_eq!(service.find_account(id).await.unwrap().balance, Amount::ZERO);
}
