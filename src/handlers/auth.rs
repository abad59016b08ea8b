//! Auth HTTP handlers: signin, signup, username availability, current user

use crate::{
    auth::middleware::Identity,
    error::AppError,
    middleware::AppState,
    models::{
        auth::{MessageResponse, SigninRequest, SigninResponse},
        user::{SignupRequest, UserResponse},
    },
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

pub async fn signin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, AppError> {
    let Json(req) = payload?;

    let response = state
        .auth_service
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(Json(response))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(req) = payload?;

    state.auth_service.register(req).await?;

    Ok(Json(MessageResponse::new("User registered successfully!")))
}

/// `true` when the username is still available
pub async fn check_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<bool>, AppError> {
    let exists = state.auth_service.username_exists(&username).await?;
    Ok(Json(!exists))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<UserResponse>, AppError> {
    let (account, profile) = state.auth_service.account(identity.user_id).await?;

    Ok(Json(UserResponse {
        id: account.id,
        username: account.username,
        role: account.role,
        profile,
    }))
}
