//! Vault UI
//!
//! HTTP front end for the time-locked vault client: a single page plus a JSON
//! API over [`vault_client::VaultClient`], and the contract setup check.

pub mod api;
pub mod config;
pub mod error;
pub mod page;
pub mod setup;

pub use api::server::{build_cors, create_router, start_server};
pub use config::UiConfig;
pub use error::ApiError;
