//! Common test utilities for the vault UI
//!
//! Runs a small JSON-RPC node on a local port that serves the vault contract
//! from memory, and builds routers around clients pointed at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use vault_client::abi::{selector, to_hex_data};
use vault_client::rpc::{parse_quantity, to_quantity};
use vault_client::{Address, ClientConfig, ContractFiles, VaultClient, U256};
use vault_ui::{build_cors, create_router};

pub const ACCOUNT: &str = "0xABC0000000000000000000000000000000000001";

/// Timestamp the node stamps on confirmed deposits
pub const CONFIRMED_AT: u64 = 1_700_000_000;

pub const ETHER: u128 = 1_000_000_000_000_000_000;

pub fn account() -> Address {
    ACCOUNT.parse().expect("valid test account")
}

pub fn wei(value: u128) -> U256 {
    U256::from(value)
}

fn word(value: U256) -> String {
    to_hex_data(&value.to_be_bytes::<32>())
}

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[derive(Debug, Default)]
pub struct NodeState {
    pub balance: U256,
    pub governance_tokens: U256,
    pub deposit_amount: U256,
    pub deposit_timestamp: U256,
    /// Answer `eth_requestAccounts` with "method not found"
    pub request_accounts_unsupported: bool,
    /// Answer `eth_requestAccounts` with a user rejection
    pub reject_connection: bool,
    /// Mine every transaction with status 0
    pub revert: bool,
    /// Raw `eth_sendTransaction` objects, in order
    pub sent: Vec<Value>,
    /// Receipt lookups per transaction hash
    pub polls: HashMap<String, usize>,
}

pub type SharedNode = Arc<Mutex<NodeState>>;

pub struct FakeNode {
    pub url: String,
    pub state: SharedNode,
}

impl FakeNode {
    pub async fn start(state: NodeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/", post(rpc_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake node");
        let addr = listener.local_addr().expect("fake node address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn sent(&self) -> Vec<Value> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn set(&self, update: impl FnOnce(&mut NodeState)) {
        update(&mut self.state.lock().unwrap());
    }
}

fn call_selector(signature: &str) -> String {
    to_hex_data(&selector(signature))
}

fn apply_confirmed(node: &mut NodeState, tx: &Value) {
    let value = tx["value"]
        .as_str()
        .and_then(|v| parse_quantity(v).ok())
        .unwrap_or_default();
    let data = tx["data"].as_str().unwrap_or_default();

    if data.starts_with(&call_selector("deposit()")) {
        node.balance = node.balance.saturating_sub(value);
        node.deposit_amount += value;
        node.deposit_timestamp = U256::from(CONFIRMED_AT);
    } else if data.starts_with(&call_selector("withdraw(uint256)")) {
        let amount = U256::from_str_radix(&data[10..], 16).unwrap_or_default();
        node.deposit_amount = node.deposit_amount.saturating_sub(amount);
        node.balance += amount;
        if node.deposit_amount.is_zero() {
            node.deposit_timestamp = U256::ZERO;
        }
    }
}

fn dispatch(node: &mut NodeState, method: &str, params: &Value) -> Result<Value, (i64, String)> {
    match method {
        "eth_requestAccounts" if node.request_accounts_unsupported => {
            Err((-32601, "Method not found".to_string()))
        }
        "eth_requestAccounts" if node.reject_connection => {
            Err((4001, "User rejected the request.".to_string()))
        }
        "eth_requestAccounts" | "eth_accounts" => Ok(json!([ACCOUNT])),
        "eth_getBalance" => Ok(json!(to_quantity(node.balance))),
        "eth_call" => {
            let data = params[0]["data"].as_str().unwrap_or_default();
            if data.starts_with(&call_selector("getGovernanceTokens(address)")) {
                Ok(json!(word(node.governance_tokens)))
            } else if data.starts_with(&call_selector("getDeposit(address)")) {
                let mut words = node.deposit_amount.to_be_bytes::<32>().to_vec();
                words.extend_from_slice(&node.deposit_timestamp.to_be_bytes::<32>());
                Ok(json!(to_hex_data(&words)))
            } else {
                Err((-32000, "execution reverted".to_string()))
            }
        }
        "eth_sendTransaction" => {
            node.sent.push(params[0].clone());
            Ok(json!(format!("0x{:064x}", node.sent.len())))
        }
        "eth_getTransactionReceipt" => {
            let hash = params[0].as_str().unwrap_or_default().to_string();
            let polls = {
                let count = node.polls.entry(hash.clone()).or_insert(0);
                *count += 1;
                *count
            };
            // pending on the first lookup
            if polls == 1 {
                return Ok(Value::Null);
            }
            let index = usize::from_str_radix(hash.trim_start_matches("0x"), 16).unwrap_or(0);
            if polls == 2 && !node.revert {
                if let Some(tx) = node.sent.get(index.wrapping_sub(1)).cloned() {
                    apply_confirmed(node, &tx);
                }
            }
            let status = if node.revert { "0x0" } else { "0x1" };
            Ok(json!({
                "transactionHash": hash,
                "blockNumber": "0x10",
                "status": status,
            }))
        }
        _ => Err((-32601, "Method not found".to_string())),
    }
}

async fn rpc_handler(State(node): State<SharedNode>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let outcome = dispatch(&mut node.lock().unwrap(), &method, &req["params"]);

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message },
        }),
    })
}

pub fn deploy_files() -> ContractFiles {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    ContractFiles::new(
        root.join("deploy/contract-address.json"),
        root.join("deploy/abi.json"),
    )
}

pub fn client_config(rpc_url: Option<&str>) -> ClientConfig {
    ClientConfig {
        rpc_url: rpc_url.map(str::to_string),
        contract_files: deploy_files(),
        contract_address: None,
        confirmation_poll_interval: Duration::from_millis(10),
        rpc_timeout: Duration::from_secs(5),
    }
}

pub fn app_for(rpc_url: Option<&str>) -> Router {
    let client = VaultClient::from_config(&client_config(rpc_url)).expect("client from config");
    create_router(Arc::new(client), build_cors(&None).expect("cors"))
}
