use account_service::{AccountService, AccountServiceConfig};
use common::model::account::{AccountType, NewAccount, Transaction, TransactionOutcome};
use rust_decimal_macros::dec;
use tokio::test;

use dotenv::dotenv;

// PostgreSQL integration tests for account service
// These tests require a running PostgreSQL database
// Run with: cargo test --test account_postgres_tests -- --ignored

async fn create_test_service() -> AccountService {
    dotenv().ok(); // Load .env.test if it exists

    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run PostgreSQL tests");

    let config = AccountServiceConfig::new(Some(database_url), 5, true);
    AccountService::with_config(&config)
        .await
        .expect("Failed to create account service with PostgreSQL repository")
}

fn unique_user() -> String {
    format!("pg-test-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[test]
#[ignore = "Requires test database"]
async fn test_postgres_account_creation() {
    let service = create_test_service().await;
    let user = unique_user();

    let id = service
        .save_account(NewAccount::new(user.clone(), AccountType::Current, dec!(500.00)))
        .await
        .unwrap();

    let account = service.find_account(id).await.unwrap();
    assert_eq!(account.id, id);
    assert_eq!(account.user_id, user);
    assert_eq!(account.account_type, AccountType::Current);
    assert_eq!(account.open_balance, dec!(500.00));
    assert_eq!(account.balance, dec!(500.00));
}

#[test]
#[ignore = "Requires test database"]
async fn test_postgres_queries() {
    let service = create_test_service().await;
    let user = unique_user();

    let current = service.save_account(NewAccount::new(user.clone(), AccountType::Current, dec!(1))).await.unwrap();
    let savings = service.save_account(NewAccount::new(user.clone(), AccountType::Savings, dec!(1))).await.unwrap();

    let all: Vec<i32> = service.find_accounts(&user).await.unwrap().iter().map(|a| a.id).collect();
    assert_eq!(all, vec![current, savings]);

    let filtered = service.find_accounts_by_type(&user, AccountType::Savings).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, savings);
}

#[test]
#[ignore = "Requires test database"]
async fn test_postgres_transactions() {
    let service = create_test_service().await;
    let id = service
        .save_account(NewAccount::new(unique_user(), AccountType::Current, dec!(500.00)))
        .await
        .unwrap();

    let outcome = service.apply_transaction(&Transaction::credit(id, dec!(100.00))).await.unwrap();
    assert_eq!(outcome, TransactionOutcome::Success { balance: dec!(600.00) });

    let outcome = service.apply_transaction(&Transaction::debit(id, dec!(700.00))).await.unwrap();
    assert!(!outcome.is_success());

    assert_eq!(service.find_account(id).await.unwrap().balance, dec!(600.00));
}

#[test]
#[ignore = "Requires test database"]
async fn test_postgres_keeps_exact_balances() {
    let service = create_test_service().await;
    let id = service
        .save_account(NewAccount::new(unique_user(), AccountType::Current, dec!(0)))
        .await
        .unwrap();

    let outcome = service.apply_transaction(&Transaction::credit(id, dec!(0.00001))).await.unwrap();
    assert_eq!(outcome, TransactionOutcome::Success { balance: dec!(0.00001) });
    assert_eq!(service.find_account(id).await.unwrap().balance, dec!(0.00001));

    let large = dec!(1000000000000000);
    let outcome = service.apply_transaction(&Transaction::credit(id, large)).await.unwrap();
    assert_eq!(outcome, TransactionOutcome::Success { balance: large + dec!(0.00001) });
    assert_eq!(service.find_account(id).await.unwrap().balance, large + dec!(0.00001));
}
