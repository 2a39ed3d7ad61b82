//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod accounts;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod debts;
pub mod decision;
pub mod recurring;
pub mod tools;
pub mod transactions;

// Re-export all handlers for use in router
pub use accounts::*;
pub use audit::*;
pub use auth::*;
pub use dashboard::*;
pub use debts::*;
pub use decision::*;
pub use recurring::*;
pub use tools::*;
pub use transactions::*;
