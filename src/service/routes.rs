use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ledger::{Ledger, LedgerError};

pub type SharedLedger = Arc<dyn Ledger>;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub name: String,
    pub pin_number: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub name: String,
    pub bank_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub bank_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub sender_name: String,
    pub sender_pin: String,
    pub recipient_name: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub message: &'static str,
    pub sender_new_balance: Decimal,
    pub recipient_new_balance: Decimal,
}

/// Ledger failure rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            LedgerError::AccountNotFound { .. } => (StatusCode::NOT_FOUND, "account_not_found"),
            LedgerError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            LedgerError::InvalidAmount { .. } => (StatusCode::BAD_REQUEST, "invalid_amount"),
            LedgerError::SelfTransferNotAllowed => (StatusCode::BAD_REQUEST, "self_transfer"),
            LedgerError::BalanceOverflow => (StatusCode::UNPROCESSABLE_ENTITY, "balance_overflow"),
            LedgerError::InsufficientFunds => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds")
            }
            LedgerError::DuplicateAccount(_) => (StatusCode::CONFLICT, "duplicate_account"),
        };
        tracing::debug!(code, "request rejected");
        (
            status,
            Json(json!({
                "error": code,
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

pub fn router(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/authenticate", post(authenticate))
        .route("/deposit", post(deposit))
        .route("/bank-transfer", post(bank_transfer))
        .with_state(ledger)
}

async fn read_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bank API running" }))
}

async fn authenticate(
    State(ledger): State<SharedLedger>,
    Json(body): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let snapshot = ledger.authenticate(&body.name, &body.pin_number)?;
    Ok(Json(AuthResponse {
        name: snapshot.identifier,
        bank_balance: snapshot.balance,
    }))
}

async fn deposit(
    State(ledger): State<SharedLedger>,
    Json(body): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let bank_balance = ledger.deposit(&body.name, body.amount)?;
    tracing::info!(account = %body.name, amount = %body.amount, "deposit committed");
    Ok(Json(DepositResponse { bank_balance }))
}

async fn bank_transfer(
    State(ledger): State<SharedLedger>,
    Json(body): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let receipt = ledger.transfer(
        &body.sender_name,
        &body.sender_pin,
        &body.recipient_name,
        body.amount,
    )?;
    tracing::info!(
        sender = %body.sender_name,
        recipient = %body.recipient_name,
        amount = %body.amount,
        "transfer committed"
    );
    Ok(Json(TransferResponse {
        message: "Transfer successful",
        sender_new_balance: receipt.sender_balance,
        recipient_new_balance: receipt.recipient_balance,
    }))
}
