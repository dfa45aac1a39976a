//! Common test utilities for vault client integration tests
//!
//! Provides an in-memory `WalletProvider` whose answers and failures can be
//! scripted per call, plus helpers to build a client around it.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use vault_client::abi::selector;
use vault_client::{
    Address, CallRequest, ContractFiles, TransactionReceipt, TransactionRequest, VaultClient,
    VaultError, WalletProvider, U256,
};

pub const ACCOUNT: &str = "0xABC0000000000000000000000000000000000001";

/// Timestamp the fake contract stamps on confirmed deposits
pub const CONFIRMED_AT: u64 = 1_700_000_000;

pub fn account() -> Address {
    ACCOUNT.parse().expect("valid test account")
}

pub fn word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Provider calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeCall {
    RequestAccounts,
    Balance,
    GovernanceTokens,
    GetDeposit,
    Send,
    Confirm,
}

#[derive(Debug, Default)]
struct Chain {
    balance: U256,
    governance_tokens: U256,
    deposit_amount: U256,
    deposit_timestamp: U256,
    sent: Vec<TransactionRequest>,
    reads: usize,
}

pub struct FakeProvider {
    accounts: Vec<Address>,
    chain: Mutex<Chain>,
    failing: Mutex<HashSet<FakeCall>>,
    /// When set, confirmations wait for a notification
    gate: Option<Arc<Notify>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            accounts: vec![account()],
            chain: Mutex::new(Chain::default()),
            failing: Mutex::new(HashSet::new()),
            gate: None,
        }
    }

    pub fn with_accounts(mut self, accounts: &[Address]) -> Self {
        self.accounts = accounts.to_vec();
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_balance(&self, wei: U256) {
        self.chain.lock().unwrap().balance = wei;
    }

    pub fn set_governance_tokens(&self, tokens: U256) {
        self.chain.lock().unwrap().governance_tokens = tokens;
    }

    pub fn set_deposit_timestamp(&self, timestamp: u64) {
        self.chain.lock().unwrap().deposit_timestamp = U256::from(timestamp);
    }

    pub fn fail(&self, call: FakeCall) {
        self.failing.lock().unwrap().insert(call);
    }

    pub fn recover(&self, call: FakeCall) {
        self.failing.lock().unwrap().remove(&call);
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.chain.lock().unwrap().sent.clone()
    }

    pub fn reads(&self) -> usize {
        self.chain.lock().unwrap().reads
    }

    fn check(&self, call: FakeCall) -> Result<(), VaultError> {
        if self.failing.lock().unwrap().contains(&call) {
            Err(VaultError::Transport(format!("{:?} unavailable", call)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WalletProvider for FakeProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, VaultError> {
        if self.failing.lock().unwrap().contains(&FakeCall::RequestAccounts) {
            return Err(VaultError::ConnectionRejected("User rejected the request".into()));
        }
        Ok(self.accounts.clone())
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, VaultError> {
        self.check(FakeCall::Balance)?;
        Ok(self.chain.lock().unwrap().balance)
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, VaultError> {
        let mut chain = self.chain.lock().unwrap();
        chain.reads += 1;

        let selector_bytes = &request.data[..4];
        if selector_bytes == selector("getGovernanceTokens(address)") {
            self.check(FakeCall::GovernanceTokens)?;
            Ok(word(chain.governance_tokens).to_vec())
        } else if selector_bytes == selector("getDeposit(address)") {
            self.check(FakeCall::GetDeposit)?;
            let mut out = word(chain.deposit_amount).to_vec();
            out.extend_from_slice(&word(chain.deposit_timestamp));
            Ok(out)
        } else {
            Err(VaultError::Rpc {
                code: 3,
                message: "execution reverted".into(),
            })
        }
    }

    async fn sign_and_send(&self, request: &TransactionRequest) -> Result<String, VaultError> {
        self.check(FakeCall::Send)?;
        let mut chain = self.chain.lock().unwrap();
        chain.sent.push(request.clone());
        Ok(format!("0x{:064x}", chain.sent.len()))
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<TransactionReceipt, VaultError> {
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&FakeCall::Confirm) {
            return Err(VaultError::TransactionReverted(tx_hash.to_string()));
        }

        let mut chain = self.chain.lock().unwrap();
        let last = chain.sent.last().cloned();
        if let Some(tx) = last {
            if !tx.value.is_zero() {
                chain.deposit_amount += tx.value;
                chain.deposit_timestamp = U256::from(CONFIRMED_AT);
                chain.balance = chain.balance.saturating_sub(tx.value);
            }
        }

        Ok(TransactionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: chain.sent.len() as u64,
            success: true,
        })
    }
}

/// Deployment files shipped with the repository
pub fn deploy_files() -> ContractFiles {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    ContractFiles::new(
        root.join("deploy/contract-address.json"),
        root.join("deploy/abi.json"),
    )
}

pub fn client_with(provider: Arc<FakeProvider>) -> VaultClient {
    let config = deploy_files().load().expect("deploy files load");
    VaultClient::new(Some(provider as Arc<dyn WalletProvider>), config)
}
