//! Payment HTTP handlers

use crate::{
    auth::middleware::Identity,
    error::AppError,
    middleware::AppState,
    models::payment::{PaymentReceipt, PaymentRequest},
    receipt,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentReceipt>), AppError> {
    let Json(req) = payload?;
    req.check()?;

    tracing::debug!(user_id = identity.user_id, "Processing payment");
    let receipt = state.payment_service.process(&req);

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Process the payment and return its receipt as a PDF
pub async fn payment_receipt(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.check()?;

    tracing::debug!(user_id = identity.user_id, "Generating payment receipt");
    let outcome = state.payment_service.process(&req);
    let pdf = receipt::render_receipt(&outcome, &req)?;

    Ok((
        StatusCode::CREATED,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"receipt-{}.pdf\"", outcome.transaction_id),
            ),
        ],
        pdf,
    ))
}
