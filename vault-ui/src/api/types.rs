use serde::{Deserialize, Serialize};
use vault_client::{Address, ViewState};

#[derive(Debug, Default, Deserialize)]
pub struct AmountRequest {
    /// Decimal ETH; when absent the stored form value is used
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyView {
    pub connect: bool,
    pub deposit: bool,
    pub withdraw: bool,
}

/// Rendered view state, as shown on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    pub contract_address: String,
    pub connected: bool,
    pub account: Option<String>,
    /// ETH, decimal
    pub balance: String,
    pub governance_tokens: String,
    pub deposit_timestamp: String,
    pub unlock_date: String,
    /// Epoch seconds, decimal
    pub unlock_timestamp: Option<String>,
    pub amount: String,
    pub busy: BusyView,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub last_tx_hash: Option<String>,
}

impl StateView {
    pub fn render(state: &ViewState, contract_address: Address) -> Self {
        Self {
            contract_address: contract_address.to_string(),
            connected: state.is_connected(),
            account: state.account().map(|account| account.to_string()),
            balance: state.balance_text(),
            governance_tokens: state.governance_tokens_text(),
            deposit_timestamp: state.deposit_timestamp_text(),
            unlock_date: state.unlock_date_text(),
            unlock_timestamp: state.unlock_timestamp().map(|ts| ts.to_string()),
            amount: state.amount_input.clone(),
            busy: BusyView {
                connect: state.in_flight.connect,
                deposit: state.in_flight.deposit,
                withdraw: state.in_flight.withdraw,
            },
            error: state.error.clone(),
            notice: state.notice.clone(),
            last_tx_hash: state.last_tx_hash.clone(),
        }
    }
}

/// Error body: the message plus the state after the failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub state: StateView,
}
