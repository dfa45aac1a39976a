//! View state and its reducer
//!
//! The UI-visible snapshot is an immutable `ViewState`. Every change goes
//! through `reduce`, which takes the current snapshot and an `Action` and
//! returns the next one. `Store` holds the current snapshot and serialises
//! dispatches.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use alloy::primitives::{Address, U256};
use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::contract::DepositRecord;
use crate::error::VaultError;
use crate::lock::{format_timestamp, unlock_timestamp, NOT_AVAILABLE_TEXT, NO_DEPOSIT_TEXT};
use crate::units::format_ether;
use crate::Result;

/// User-triggered operations that may not overlap with themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Connect,
    Deposit,
    Withdraw,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "Wallet connection"),
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdraw => write!(f, "Withdrawal"),
        }
    }
}

/// Independently fetched read values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Balance,
    GovernanceTokens,
    DepositInfo,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balance => write!(f, "balance"),
            Self::GovernanceTokens => write!(f, "governance tokens"),
            Self::DepositInfo => write!(f, "deposit info"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Connection {
    #[default]
    Disconnected,
    Connected {
        account: Address,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepositStatus {
    /// Nothing read from the contract yet
    #[default]
    NotLoaded,
    NoDeposit,
    Deposited {
        timestamp: U256,
    },
}

impl From<DepositRecord> for DepositStatus {
    fn from(record: DepositRecord) -> Self {
        if record.has_deposit() {
            Self::Deposited {
                timestamp: record.timestamp,
            }
        } else {
            Self::NoDeposit
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InFlight {
    pub connect: bool,
    pub deposit: bool,
    pub withdraw: bool,
}

impl InFlight {
    pub fn get(&self, operation: Operation) -> bool {
        match operation {
            Operation::Connect => self.connect,
            Operation::Deposit => self.deposit,
            Operation::Withdraw => self.withdraw,
        }
    }

    fn set(&mut self, operation: Operation, value: bool) {
        match operation {
            Operation::Connect => self.connect = value,
            Operation::Deposit => self.deposit = value,
            Operation::Withdraw => self.withdraw = value,
        }
    }
}

/// UI-visible snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub connection: Connection,
    pub balance_wei: U256,
    pub governance_tokens: U256,
    pub deposit: DepositStatus,
    /// Contents of the amount field, kept across failures
    pub amount_input: String,
    pub in_flight: InFlight,
    pub error: Option<String>,
    /// Blocking notice or success message
    pub notice: Option<String>,
    pub last_tx_hash: Option<String>,
}

impl ViewState {
    pub fn account(&self) -> Option<Address> {
        match self.connection {
            Connection::Connected { account } => Some(account),
            Connection::Disconnected => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn is_busy(&self, operation: Operation) -> bool {
        self.in_flight.get(operation)
    }

    pub fn balance_text(&self) -> String {
        format_ether(self.balance_wei)
    }

    pub fn governance_tokens_text(&self) -> String {
        self.governance_tokens.to_string()
    }

    pub fn deposit_timestamp_text(&self) -> String {
        self.deposit_timestamp_text_in(&Local)
    }

    pub fn unlock_date_text(&self) -> String {
        self.unlock_date_text_in(&Local)
    }

    pub fn deposit_timestamp_text_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self.deposit {
            DepositStatus::NotLoaded => String::new(),
            DepositStatus::NoDeposit => NO_DEPOSIT_TEXT.to_string(),
            DepositStatus::Deposited { timestamp } => format_timestamp(timestamp, tz),
        }
    }

    pub fn unlock_date_text_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self.deposit {
            DepositStatus::NotLoaded => String::new(),
            DepositStatus::NoDeposit => NOT_AVAILABLE_TEXT.to_string(),
            DepositStatus::Deposited { timestamp } => {
                format_timestamp(unlock_timestamp(timestamp), tz)
            }
        }
    }

    /// Unlock instant in epoch seconds, when a deposit exists
    pub fn unlock_timestamp(&self) -> Option<U256> {
        match self.deposit {
            DepositStatus::Deposited { timestamp } => Some(unlock_timestamp(timestamp)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Started(Operation),
    Settled(Operation),
    ProviderMissing { notice: String },
    Connected { account: Address },
    ConnectFailed { error: String },
    BalanceLoaded(U256),
    GovernanceTokensLoaded(U256),
    DepositLoaded(DepositRecord),
    QueryFailed { query: Query, error: String },
    AmountChanged(String),
    TransactionConfirmed {
        operation: Operation,
        tx_hash: String,
        notice: String,
    },
    TransactionFailed { operation: Operation, error: String },
    ErrorDismissed,
    NoticeDismissed,
}

/// Compute the next snapshot
///
/// Read failures keep the last successfully loaded values. A failed
/// connection resets everything except the amount field and in-flight flags.
pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();

    match action {
        Action::Started(operation) => {
            next.in_flight.set(operation, true);
            next.error = None;
            next.notice = None;
        }
        Action::Settled(operation) => {
            next.in_flight.set(operation, false);
        }
        Action::ProviderMissing { notice } => {
            next.error = Some(notice.clone());
            next.notice = Some(notice);
        }
        Action::Connected { account } => {
            next = ViewState {
                connection: Connection::Connected { account },
                amount_input: next.amount_input,
                in_flight: next.in_flight,
                ..ViewState::default()
            };
        }
        Action::ConnectFailed { error } => {
            next = ViewState {
                amount_input: next.amount_input,
                in_flight: next.in_flight,
                error: Some(format!("Wallet connection failed: {}", error)),
                ..ViewState::default()
            };
        }
        Action::BalanceLoaded(wei) => next.balance_wei = wei,
        Action::GovernanceTokensLoaded(tokens) => next.governance_tokens = tokens,
        Action::DepositLoaded(record) => next.deposit = record.into(),
        Action::QueryFailed { query, error } => {
            next.error = Some(format!("Failed to fetch {}: {}", query, error));
        }
        Action::AmountChanged(amount) => next.amount_input = amount,
        Action::TransactionConfirmed {
            tx_hash, notice, ..
        } => {
            next.last_tx_hash = Some(tx_hash);
            next.notice = Some(notice);
            next.error = None;
        }
        Action::TransactionFailed { operation, error } => {
            next.error = Some(format!("{} failed: {}", operation, error));
        }
        Action::ErrorDismissed => next.error = None,
        Action::NoticeDismissed => next.notice = None,
    }

    next
}

/// Holder of the current snapshot
#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<Arc<ViewState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<ViewState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dispatch(&self, action: Action) -> Arc<ViewState> {
        log::trace!("dispatch {:?}", action);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(reduce(&state, action));
        *state = next.clone();
        next
    }

    /// Mark `operation` in flight
    ///
    /// Refuses when it already is. The flag clears when the guard drops.
    pub fn try_begin(&self, operation: Operation) -> Result<InFlightGuard<'_>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_busy(operation) {
            return Err(VaultError::Busy(operation));
        }
        *state = Arc::new(reduce(&state, Action::Started(operation)));
        Ok(InFlightGuard {
            store: self,
            operation,
        })
    }
}

#[must_use = "the operation is marked settled as soon as the guard drops"]
pub struct InFlightGuard<'a> {
    store: &'a Store,
    operation: Operation,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::Settled(self.operation));
    }
}
