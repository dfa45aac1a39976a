//! Vault Client: wallet-connected front end for a time-locked ETH vault
//!
//! Connects a wallet, shows the account's ETH balance, governance token count
//! and deposit lock, and submits deposits and withdrawals to a pre-deployed
//! vault contract described by an externally supplied ABI.
//!
//! # Architecture
//!
//! - **Wallet provider**: capability trait over account access, balance
//!   queries, calls, signing and confirmation ([`WalletProvider`]), with a
//!   JSON-RPC implementation ([`JsonRpcProvider`])
//! - **Contract binding**: address + ABI + signer ([`VaultContract`])
//! - **View state**: immutable snapshots updated through a reducer ([`Store`])
//! - **Client**: orchestrates the above ([`VaultClient`])
//!
//! # Example
//!
//! ```ignore
//! use vault_client::{ClientConfig, VaultClient};
//!
//! let client = VaultClient::from_config(&ClientConfig::from_env())?;
//! client.connect().await?;
//! client.deposit("0.5").await?;
//!
//! let state = client.state();
//! println!("Unlocks: {}", state.unlock_date_text());
//! ```

// Public modules
pub mod abi;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod lock;
pub mod provider;
pub mod rpc;
pub mod state;
pub mod units;

// Re-exports for convenience
pub use abi::ContractAbi;
pub use alloy::primitives::{Address, U256};
pub use client::VaultClient;
pub use config::{ClientConfig, ContractConfig, ContractFiles};
pub use contract::{DepositRecord, VaultContract};
pub use error::VaultError;
pub use lock::{unlock_timestamp, LOCK_DURATION_SECS};
pub use provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
pub use rpc::JsonRpcProvider;
pub use state::{Action, Connection, DepositStatus, Operation, Store, ViewState};
pub use units::{format_ether, parse_ether};

// Common result type
pub type Result<T> = std::result::Result<T, VaultError>;
