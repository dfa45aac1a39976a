//! Client configuration from environment variables
//!
//! Controls the wallet provider endpoint and where the deployed contract's
//! address and ABI are read from.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::abi::{parse_address, ContractAbi};
use crate::error::VaultError;
use crate::Result;

pub const DEFAULT_ADDRESS_FILE: &str = "deploy/contract-address.json";
pub const DEFAULT_ABI_FILE: &str = "deploy/abi.json";

/// Locations of the deployment outputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractFiles {
    /// JSON file of the form `{"address": "0x..."}`
    pub address_path: PathBuf,
    /// ABI document (entry array or build artifact)
    pub abi_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct AddressFile {
    address: String,
}

impl ContractFiles {
    pub fn new(address_path: impl Into<PathBuf>, abi_path: impl Into<PathBuf>) -> Self {
        Self {
            address_path: address_path.into(),
            abi_path: abi_path.into(),
        }
    }

    /// Read `VAULT_ADDRESS_FILE` and `VAULT_ABI_FILE`, falling back to `deploy/`
    pub fn from_env() -> Self {
        let address_path =
            env::var("VAULT_ADDRESS_FILE").unwrap_or_else(|_| DEFAULT_ADDRESS_FILE.to_string());
        let abi_path = env::var("VAULT_ABI_FILE").unwrap_or_else(|_| DEFAULT_ABI_FILE.to_string());
        Self::new(address_path, abi_path)
    }

    /// Fail fast when either deployment output is missing
    pub fn preflight(&self) -> Result<()> {
        if !self.address_path.exists() {
            return Err(VaultError::Config(
                "Contract address file missing! Please deploy the contract first.".to_string(),
            ));
        }
        if !self.abi_path.exists() {
            return Err(VaultError::Config(
                "Contract ABI file missing! Please deploy the contract first.".to_string(),
            ));
        }
        Ok(())
    }

    /// Run the pre-flight check and load both files
    pub fn load(&self) -> Result<ContractConfig> {
        self.preflight()?;

        let address_json = read_file(&self.address_path)?;
        let address_file: AddressFile = serde_json::from_str(&address_json).map_err(|e| {
            VaultError::Config(format!(
                "Contract address file {} is malformed: {}",
                self.address_path.display(),
                e
            ))
        })?;

        let abi_json = read_file(&self.abi_path)?;
        let abi = ContractAbi::from_json(&abi_json)?;

        ContractConfig::new(&address_file.address, abi)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| VaultError::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Deployed vault contract: where it lives and how to call it
#[derive(Clone, Debug)]
pub struct ContractConfig {
    pub address: Address,
    pub abi: ContractAbi,
}

impl ContractConfig {
    pub fn new(address: &str, abi: ContractAbi) -> Result<Self> {
        Ok(Self {
            address: parse_address(address)?,
            abi,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Wallet JSON-RPC endpoint; `None` means no wallet provider is present
    pub rpc_url: Option<String>,
    pub contract_files: ContractFiles,
    /// Overrides the address file when set
    pub contract_address: Option<String>,
    /// Pause between receipt lookups while a transaction confirms
    pub confirmation_poll_interval: Duration,
    /// Per-request HTTP timeout for the wallet endpoint
    pub rpc_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `VAULT_RPC_URL`: wallet JSON-RPC endpoint (unset = no wallet)
    /// - `VAULT_ADDRESS_FILE` / `VAULT_ABI_FILE`: deployment outputs
    /// - `VAULT_CONTRACT_ADDRESS`: optional address override
    /// - `CONFIRMATION_POLL_MS`: receipt polling interval (default 1000)
    /// - `RPC_TIMEOUT_SECS`: HTTP request timeout (default 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rpc_url = env::var("VAULT_RPC_URL").ok().filter(|url| !url.is_empty());
        match rpc_url {
            Some(ref url) => log::info!("🔗 Wallet RPC URL: {}", url),
            None => log::warn!("⚠️  VAULT_RPC_URL not set, no wallet provider available"),
        }

        let contract_address = env::var("VAULT_CONTRACT_ADDRESS")
            .ok()
            .filter(|addr| !addr.is_empty());
        if let Some(ref addr) = contract_address {
            log::info!("📄 Contract address override: {}", addr);
        }

        let confirmation_poll_interval = env::var("CONFIRMATION_POLL_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.confirmation_poll_interval);

        let rpc_timeout = env::var("RPC_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rpc_timeout);

        Self {
            rpc_url,
            contract_files: ContractFiles::from_env(),
            contract_address,
            confirmation_poll_interval,
            rpc_timeout,
        }
    }

    /// Load the contract files, applying the address override
    pub fn load_contract(&self) -> Result<ContractConfig> {
        let config = self.contract_files.load()?;
        match self.contract_address {
            Some(ref address) => ContractConfig::new(address, config.abi),
            None => Ok(config),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_files: ContractFiles::new(DEFAULT_ADDRESS_FILE, DEFAULT_ABI_FILE),
            contract_address: None,
            confirmation_poll_interval: Duration::from_millis(1000),
            rpc_timeout: Duration::from_secs(30),
        }
    }
}
