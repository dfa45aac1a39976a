//! Vault client orchestration
//!
//! Connects the wallet, binds the vault contract for the active account,
//! runs reads and transactions against it, and records every outcome in the
//! view-state store. Errors are returned to the caller, logged, and
//! reflected in the state; none of them leaves the client unusable.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use alloy::primitives::{Address, U256};

use crate::config::{ClientConfig, ContractConfig};
use crate::contract::{DepositRecord, VaultContract};
use crate::error::VaultError;
use crate::provider::{TransactionReceipt, WalletProvider};
use crate::rpc::JsonRpcProvider;
use crate::state::{Action, Operation, Query, Store, ViewState};
use crate::units::parse_ether;
use crate::Result;

pub struct VaultClient {
    /// `None` when no wallet is available to this process
    provider: Option<Arc<dyn WalletProvider>>,
    contract_config: ContractConfig,
    store: Store,
    /// Present only after a successful connection
    contract: RwLock<Option<Arc<VaultContract>>>,
}

impl VaultClient {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, contract_config: ContractConfig) -> Self {
        log::info!("Vault contract at {}", contract_config.address);
        Self {
            provider,
            contract_config,
            store: Store::new(),
            contract: RwLock::new(None),
        }
    }

    /// Build a client backed by the JSON-RPC provider from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let contract_config = config.load_contract()?;
        let provider = match config.rpc_url {
            Some(ref url) => {
                let provider = JsonRpcProvider::new(
                    url.clone(),
                    config.rpc_timeout,
                    config.confirmation_poll_interval,
                )?;
                Some(Arc::new(provider) as Arc<dyn WalletProvider>)
            }
            None => None,
        };
        Ok(Self::new(provider, contract_config))
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<ViewState> {
        self.store.snapshot()
    }

    pub fn contract_address(&self) -> Address {
        self.contract_config.address
    }

    fn contract_handle(&self) -> Option<Arc<VaultContract>> {
        self.contract
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_contract_handle(&self, contract: Option<Arc<VaultContract>>) {
        *self.contract.write().unwrap_or_else(PoisonError::into_inner) = contract;
    }

    fn active_account(&self) -> Option<Address> {
        self.store.snapshot().account()
    }

    // ============================================================================
    // Connection
    // ============================================================================

    /// Request account access and bind the contract for the first account
    ///
    /// On success the balance, governance tokens and deposit info are loaded
    /// independently; a failing read does not fail the connection.
    pub async fn connect(&self) -> Result<Address> {
        let _guard = self.store.try_begin(Operation::Connect)?;

        let provider = match self.provider {
            Some(ref provider) => provider.clone(),
            None => {
                let err = VaultError::ProviderMissing;
                log::error!("{}", err);
                self.store.dispatch(Action::ProviderMissing {
                    notice: err.to_string(),
                });
                return Err(err);
            }
        };

        let (account, contract) = match self.open_session(provider).await {
            Ok(session) => session,
            Err(e) => {
                log::error!("Wallet connection failed: {}", e);
                self.set_contract_handle(None);
                self.store.dispatch(Action::ConnectFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        log::info!("Connected account {} to vault {}", account, contract.address());
        self.set_contract_handle(Some(Arc::new(contract)));
        self.store.dispatch(Action::Connected { account });

        let _ = tokio::join!(
            self.refresh_balance(),
            self.refresh_governance_tokens(),
            self.fetch_deposit_info(),
        );

        Ok(account)
    }

    async fn open_session(
        &self,
        provider: Arc<dyn WalletProvider>,
    ) -> Result<(Address, VaultContract)> {
        let accounts = provider.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(VaultError::NoAccounts)?;
        let contract = VaultContract::bind(&self.contract_config, provider, account)?;
        Ok((account, contract))
    }

    // ============================================================================
    // Reads
    // ============================================================================

    fn record_query_failure(&self, query: Query, err: &VaultError) {
        log::error!("Failed to fetch {}: {}", query, err);
        self.store.dispatch(Action::QueryFailed {
            query,
            error: err.to_string(),
        });
    }

    /// Reload the ETH balance of the active account
    ///
    /// `Ok(None)` when not connected.
    pub async fn refresh_balance(&self) -> Result<Option<U256>> {
        let (Some(provider), Some(account)) = (self.provider.as_ref(), self.active_account())
        else {
            return Ok(None);
        };

        match provider.get_balance(account).await {
            Ok(wei) => {
                self.store.dispatch(Action::BalanceLoaded(wei));
                Ok(Some(wei))
            }
            Err(e) => {
                self.record_query_failure(Query::Balance, &e);
                Err(e)
            }
        }
    }

    pub async fn refresh_governance_tokens(&self) -> Result<Option<U256>> {
        let (Some(contract), Some(account)) = (self.contract_handle(), self.active_account())
        else {
            return Ok(None);
        };

        match contract.governance_tokens(account).await {
            Ok(tokens) => {
                self.store.dispatch(Action::GovernanceTokensLoaded(tokens));
                Ok(Some(tokens))
            }
            Err(e) => {
                self.record_query_failure(Query::GovernanceTokens, &e);
                Err(e)
            }
        }
    }

    /// Read the deposit record of the active account
    ///
    /// No-op returning `Ok(None)` without a contract handle and account. On
    /// failure the previously displayed values stay in place.
    pub async fn fetch_deposit_info(&self) -> Result<Option<DepositRecord>> {
        let (Some(contract), Some(account)) = (self.contract_handle(), self.active_account())
        else {
            return Ok(None);
        };

        match contract.deposit_record(account).await {
            Ok(record) => {
                log::debug!("Deposit record for {}: {:?}", account, record);
                self.store.dispatch(Action::DepositLoaded(record));
                Ok(Some(record))
            }
            Err(e) => {
                self.record_query_failure(Query::DepositInfo, &e);
                Err(e)
            }
        }
    }

    // ============================================================================
    // Transactions
    // ============================================================================

    /// Deposit `amount` ETH (decimal string) into the vault
    pub async fn deposit(&self, amount: &str) -> Result<TransactionReceipt> {
        self.transact(Operation::Deposit, amount, |contract, wei| async move {
            contract.deposit(wei).await
        })
        .await
    }

    /// Withdraw `amount` ETH (decimal string) from the vault
    pub async fn withdraw(&self, amount: &str) -> Result<TransactionReceipt> {
        self.transact(Operation::Withdraw, amount, |contract, wei| async move {
            contract.withdraw(wei).await
        })
        .await
    }

    async fn transact<F, Fut>(
        &self,
        operation: Operation,
        amount: &str,
        submit: F,
    ) -> Result<TransactionReceipt>
    where
        F: FnOnce(Arc<VaultContract>, U256) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let _guard = self.store.try_begin(operation).map_err(|e| {
            log::warn!("{}", e);
            e
        })?;
        self.store.dispatch(Action::AmountChanged(amount.to_string()));

        let outcome = async {
            let contract = self.contract_handle().ok_or(VaultError::NotConnected)?;
            let wei = parse_ether(amount)?;
            log::info!("{} of {} wei requested by {}", operation, wei, contract.signer());
            let tx_hash = submit(contract.clone(), wei).await?;
            contract.wait(&tx_hash).await
        }
        .await;

        match outcome {
            Ok(receipt) => {
                log::info!("{} confirmed: {}", operation, receipt.tx_hash);
                self.store.dispatch(Action::TransactionConfirmed {
                    operation,
                    tx_hash: receipt.tx_hash.clone(),
                    notice: format!("{} successful!", operation),
                });
                let _ = tokio::join!(self.fetch_deposit_info(), self.refresh_balance());
                Ok(receipt)
            }
            Err(e) => {
                if e.is_user_error() {
                    log::warn!("{} failed: {}", operation, e);
                } else {
                    log::error!("{} failed: {}", operation, e);
                }
                self.store.dispatch(Action::TransactionFailed {
                    operation,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    // ============================================================================
    // Form state
    // ============================================================================

    pub fn set_amount(&self, amount: impl Into<String>) -> Arc<ViewState> {
        self.store.dispatch(Action::AmountChanged(amount.into()))
    }

    pub fn dismiss_error(&self) -> Arc<ViewState> {
        self.store.dispatch(Action::ErrorDismissed)
    }

    pub fn dismiss_notice(&self) -> Arc<ViewState> {
        self.store.dispatch(Action::NoticeDismissed)
    }
}
