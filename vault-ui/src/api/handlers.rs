//! Axum HTTP handlers for the vault UI
//!
//! Every handler answers with the state rendered after the operation.

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;
use vault_client::{VaultClient, VaultError};

use super::types::{AmountRequest, StateView};
use crate::error::ApiError;
use crate::page::INDEX_HTML;

/// Shared application state
pub type AppState = Arc<VaultClient>;

fn render(client: &VaultClient) -> StateView {
    StateView::render(&client.state(), client.contract_address())
}

fn respond<T>(client: &VaultClient, result: Result<T, VaultError>) -> Result<Json<StateView>, ApiError> {
    let view = render(client);
    match result {
        Ok(_) => Ok(Json(view)),
        Err(error) => Err(ApiError::new(error, view)),
    }
}

/// Amount from the request body, or the value already in the form
fn requested_amount(client: &VaultClient, req: AmountRequest) -> String {
    req.amount
        .unwrap_or_else(|| client.state().amount_input.clone())
}

/// GET /
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/state
pub async fn get_state_handler(State(client): State<AppState>) -> Json<StateView> {
    Json(render(&client))
}

/// POST /api/connect
pub async fn connect_handler(
    State(client): State<AppState>,
) -> Result<Json<StateView>, ApiError> {
    let result = client.connect().await;
    respond(&client, result)
}

/// POST /api/deposit-info
pub async fn deposit_info_handler(
    State(client): State<AppState>,
) -> Result<Json<StateView>, ApiError> {
    let result = client.fetch_deposit_info().await;
    respond(&client, result)
}

/// POST /api/amount
/// Stores the form value without submitting anything
pub async fn set_amount_handler(
    State(client): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Json<StateView> {
    client.set_amount(req.amount.unwrap_or_default());
    Json(render(&client))
}

/// POST /api/deposit
pub async fn deposit_handler(
    State(client): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<StateView>, ApiError> {
    let amount = requested_amount(&client, req);
    let result = client.deposit(&amount).await;
    respond(&client, result)
}

/// POST /api/withdraw
pub async fn withdraw_handler(
    State(client): State<AppState>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<StateView>, ApiError> {
    let amount = requested_amount(&client, req);
    let result = client.withdraw(&amount).await;
    respond(&client, result)
}

/// POST /api/error/dismiss
pub async fn dismiss_error_handler(State(client): State<AppState>) -> Json<StateView> {
    client.dismiss_error();
    Json(render(&client))
}

/// POST /api/notice/dismiss
pub async fn dismiss_notice_handler(State(client): State<AppState>) -> Json<StateView> {
    client.dismiss_notice();
    Json(render(&client))
}
