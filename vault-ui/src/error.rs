use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use vault_client::VaultError;

use crate::api::types::{ErrorResponse, StateView};

/// Failed client operation, carrying the state rendered after the failure
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ApiError {
    #[source]
    pub error: VaultError,
    pub state: StateView,
}

impl ApiError {
    pub fn new(error: VaultError, state: StateView) -> Self {
        Self { error, state }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            VaultError::ProviderMissing => StatusCode::SERVICE_UNAVAILABLE,
            VaultError::InvalidAmount(_) | VaultError::InvalidAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            VaultError::NotConnected | VaultError::Busy(_) => StatusCode::CONFLICT,
            VaultError::ConnectionRejected(_) | VaultError::NoAccounts => StatusCode::FORBIDDEN,
            VaultError::TransactionReverted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VaultError::Rpc { .. } | VaultError::Transport(_) | VaultError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            VaultError::Abi(_) | VaultError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
            state: self.state,
        });

        (status, body).into_response()
    }
}
