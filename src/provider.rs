//! Wallet provider capability
//!
//! Everything the client needs from a wallet: account access, balance
//! lookups, read-only calls, signing and submitting transactions, and
//! waiting for them to confirm. The JSON-RPC implementation lives in
//! [`crate::rpc`]; tests substitute their own.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::Result;

/// Read-only contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

/// State-changing transaction to be signed by the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    /// Value transfer in wei
    pub value: U256,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub success: bool,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access
    ///
    /// Returns the authorised accounts, active account first.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Balance of `address` in wei
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Execute a read-only call and return the raw result bytes
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>>;

    /// Sign and submit a transaction, returning its hash
    async fn sign_and_send(&self, request: &TransactionRequest) -> Result<String>;

    /// Wait until the transaction is mined
    ///
    /// Reverted transactions are an error.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<TransactionReceipt>;
}
