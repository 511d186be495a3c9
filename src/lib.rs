//! Metapackage for end-to-end tests
//!
//! Re-exports the workspace crates so tests at the workspace root can drive
//! the full stack through one dependency.

pub use account_service;
pub use api_gateway;
pub use common;
