//! Error types for vault client operations
//!
//! Covers wallet provider failures, contract binding problems, amount
//! conversion and transaction outcomes.

use std::error::Error as StdError;
use std::fmt;

use crate::state::Operation;

/// Core error type for vault client operations
///
/// Cloneable so the same error can be logged, stored in the view state and
/// returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultError {
    /// No wallet provider is configured
    ProviderMissing,

    /// Operation needs a connected wallet and a bound contract
    NotConnected,

    /// The wallet refused or failed the account request
    ConnectionRejected(String),

    /// The wallet granted access but exposed no accounts
    NoAccounts,

    /// Amount string could not be converted to wei
    InvalidAmount(String),

    /// Malformed address
    InvalidAddress(String),

    /// ABI document or call encoding problem
    Abi(String),

    /// JSON-RPC error object returned by the node
    Rpc { code: i64, message: String },

    /// HTTP transport failure
    Transport(String),

    /// Node answered with something we could not interpret
    InvalidResponse(String),

    /// Transaction was mined but reverted
    TransactionReverted(String),

    /// The same operation is already in flight
    Busy(Operation),

    /// Missing or unreadable contract configuration
    Config(String),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderMissing => {
                write!(f, "No wallet provider found! Set VAULT_RPC_URL to a wallet endpoint.")
            }
            Self::NotConnected => write!(f, "Wallet not connected"),
            Self::ConnectionRejected(msg) => write!(f, "Connection rejected: {}", msg),
            Self::NoAccounts => write!(f, "Wallet returned no accounts"),
            Self::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            Self::InvalidAddress(addr) => write!(f, "Invalid address: {}", addr),
            Self::Abi(msg) => write!(f, "ABI error: {}", msg),
            Self::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid response from wallet: {}", msg),
            Self::TransactionReverted(hash) => write!(f, "Transaction reverted: {}", hash),
            Self::Busy(op) => write!(f, "{} already in progress", op),
            Self::Config(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for VaultError {}

impl VaultError {
    pub fn abi(msg: impl Into<String>) -> Self {
        Self::Abi(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Whether retrying by the user can help
    ///
    /// Busy and amount errors are resolved by the user, not by the node.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_) | Self::Busy(_) | Self::NotConnected | Self::ProviderMissing
        )
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
