//! API handlers
//!
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Call the account service
//! - Map the result to a JSON resource or a plain-text status

pub mod account;
pub mod health;
pub mod response;

pub use response::{HealthResponse, TransactionReply};
