//! Common types and utilities for the accounts service
//!
//! This library contains the domain model, the shared error type and the
//! database helpers used by both the account service and the HTTP gateway.

pub mod error;
pub mod model;
pub mod decimal;
pub mod db;

/// Re-export important types
pub use error::{Error, Result, ErrorExt, IntoError};
pub use decimal::*;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
