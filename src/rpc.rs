//! Ethereum JSON-RPC wallet provider
//!
//! Talks to a node (or wallet bridge) over HTTP. Transactions are submitted
//! with `eth_sendTransaction`, so signing happens on the other side with the
//! unlocked account; this process never holds a private key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::abi::{from_hex_data, parse_address, to_hex_data};
use crate::error::VaultError;
use crate::provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
use crate::Result;

/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i64 = -32601;

/// EIP-1193 "user rejected request"
pub const USER_REJECTED: i64 = 4001;

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub struct JsonRpcProvider {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
    poll_interval: Duration,
}

impl JsonRpcProvider {
    /// Create a provider for the node at `url`
    ///
    /// `timeout` bounds each HTTP request; `poll_interval` is the pause
    /// between receipt lookups while waiting for confirmation.
    pub fn new(url: impl Into<String>, timeout: Duration, poll_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url = url.into();
        log::info!("Wallet provider endpoint: {}", url);

        Ok(Self {
            url,
            client,
            next_id: AtomicU64::new(1),
            poll_interval,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call
    ///
    /// A missing or null `result` comes back as `Value::Null`.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        log::debug!("RPC -> {} (id {})", method, id);

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();

        let body: JsonRpcResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(VaultError::Transport(format!(
                    "{} returned HTTP {}",
                    method, status
                )))
            }
            Err(e) => return Err(VaultError::invalid_response(format!("{}: {}", method, e))),
        };

        if let Some(error) = body.error {
            log::debug!("RPC <- {} error {}: {}", method, error.code, error.message);
            return Err(VaultError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>> {
        let result = self
            .rpc_call("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }

        let raw: RawReceipt = serde_json::from_value(result)?;
        let block_number = match raw.block_number {
            Some(ref quantity) => parse_quantity(quantity)?,
            None => return Ok(None),
        };
        // receipts without status predate EIP-658 and only exist for successful txs
        let success = match raw.status {
            Some(ref status) => parse_quantity(status)? == U256::from(1),
            None => true,
        };

        Ok(Some(TransactionReceipt {
            tx_hash: raw.transaction_hash,
            block_number: u64::try_from(block_number).map_err(|_| {
                VaultError::invalid_response(format!("block number {} out of range", block_number))
            })?,
            success,
        }))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let result = match self.rpc_call("eth_requestAccounts", json!([])).await {
            Err(VaultError::Rpc { code, .. }) if code == METHOD_NOT_FOUND => {
                log::debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.rpc_call("eth_accounts", json!([])).await?
            }
            Err(VaultError::Rpc { code, message }) if code == USER_REJECTED => {
                return Err(VaultError::ConnectionRejected(message));
            }
            other => other?,
        };

        let accounts: Vec<String> = serde_json::from_value(result)?;
        accounts
            .iter()
            .map(|account| parse_address(account))
            .collect()
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        let result = self
            .rpc_call("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        let quantity = result
            .as_str()
            .ok_or_else(|| VaultError::invalid_response("Invalid balance format"))?;
        parse_quantity(quantity)
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>> {
        let mut call = json!({
            "to": request.to.to_string(),
            "data": to_hex_data(&request.data),
        });
        if let Some(from) = request.from {
            call["from"] = json!(from.to_string());
        }

        let result = self.rpc_call("eth_call", json!([call, "latest"])).await?;
        let data = result
            .as_str()
            .ok_or_else(|| VaultError::invalid_response("Invalid eth_call result format"))?;
        from_hex_data(data)
    }

    async fn sign_and_send(&self, request: &TransactionRequest) -> Result<String> {
        let tx = json!({
            "from": request.from.to_string(),
            "to": request.to.to_string(),
            "data": to_hex_data(&request.data),
            "value": to_quantity(request.value),
        });

        let result = self.rpc_call("eth_sendTransaction", json!([tx])).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| VaultError::invalid_response("Invalid transaction hash format"))?;

        log::info!("Submitted transaction {}", hash);
        Ok(hash.to_string())
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<TransactionReceipt> {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                if !receipt.success {
                    log::warn!(
                        "Transaction {} reverted in block {}",
                        tx_hash,
                        receipt.block_number
                    );
                    return Err(VaultError::TransactionReverted(tx_hash.to_string()));
                }
                log::info!(
                    "Transaction {} confirmed in block {}",
                    tx_hash,
                    receipt.block_number
                );
                return Ok(receipt);
            }

            log::debug!("Transaction {} pending (attempt {})", tx_hash, attempt);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Parse a hex-encoded JSON-RPC quantity
pub fn parse_quantity(quantity: &str) -> Result<U256> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| VaultError::invalid_response(format!("quantity '{}' lacks 0x", quantity)))?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| VaultError::invalid_response(format!("quantity '{}': {}", quantity, e)))
}

pub fn to_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}
