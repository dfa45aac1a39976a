//! Vault contract binding
//!
//! A `VaultContract` ties the configured address and ABI to the connected
//! account (the signer) and the wallet provider that executes calls.

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Function;
use alloy::primitives::{Address, U256};

use crate::abi::{decode_uint, encode_call};
use crate::config::ContractConfig;
use crate::provider::{CallRequest, TransactionReceipt, TransactionRequest, WalletProvider};
use crate::Result;

pub const GET_GOVERNANCE_TOKENS: &str = "getGovernanceTokens";
pub const GET_DEPOSIT: &str = "getDeposit";
pub const DEPOSIT: &str = "deposit";
pub const WITHDRAW: &str = "withdraw";

/// On-chain deposit record of one account
///
/// Owned by the contract; the client only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRecord {
    /// Seconds since the epoch; 0 means no deposit
    pub timestamp: U256,
}

impl DepositRecord {
    pub fn has_deposit(&self) -> bool {
        !self.timestamp.is_zero()
    }
}

pub struct VaultContract {
    address: Address,
    signer: Address,
    provider: Arc<dyn WalletProvider>,
    get_governance_tokens: Function,
    get_deposit: Function,
    deposit: Function,
    withdraw: Function,
}

impl VaultContract {
    /// Bind the contract for `signer`
    ///
    /// Fails if the ABI lacks any of the vault entry points.
    pub fn bind(
        config: &ContractConfig,
        provider: Arc<dyn WalletProvider>,
        signer: Address,
    ) -> Result<Self> {
        let abi = &config.abi;
        Ok(Self {
            address: config.address,
            signer,
            provider,
            get_governance_tokens: abi.function(GET_GOVERNANCE_TOKENS)?,
            get_deposit: abi.function(GET_DEPOSIT)?,
            deposit: abi.function(DEPOSIT)?,
            withdraw: abi.function(WITHDRAW)?,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    async fn read(&self, function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>> {
        let request = CallRequest {
            from: Some(self.signer),
            to: self.address,
            data: encode_call(function, args)?,
        };
        self.provider.call(&request).await
    }

    async fn send(&self, function: &Function, args: &[DynSolValue], value: U256) -> Result<String> {
        let request = TransactionRequest {
            from: self.signer,
            to: self.address,
            data: encode_call(function, args)?,
            value,
        };
        self.provider.sign_and_send(&request).await
    }

    pub async fn governance_tokens(&self, holder: Address) -> Result<U256> {
        let f = &self.get_governance_tokens;
        let data = self.read(f, &[DynSolValue::Address(holder)]).await?;
        decode_uint(f, &data, None)
    }

    pub async fn deposit_record(&self, holder: Address) -> Result<DepositRecord> {
        let f = &self.get_deposit;
        let data = self.read(f, &[DynSolValue::Address(holder)]).await?;
        let timestamp = decode_uint(f, &data, Some("timestamp"))?;
        Ok(DepositRecord { timestamp })
    }

    /// Submit a deposit of `value` wei, returning the transaction hash
    pub async fn deposit(&self, value: U256) -> Result<String> {
        self.send(&self.deposit, &[], value).await
    }

    /// Submit a withdrawal of `amount` wei
    ///
    /// The amount is a call argument; no value is attached.
    pub async fn withdraw(&self, amount: U256) -> Result<String> {
        self.send(&self.withdraw, &[DynSolValue::Uint(amount, 256)], U256::ZERO)
            .await
    }

    pub async fn wait(&self, tx_hash: &str) -> Result<TransactionReceipt> {
        self.provider.wait_for_confirmation(tx_hash).await
    }
}
