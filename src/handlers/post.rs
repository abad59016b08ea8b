//! Post HTTP handlers

use crate::{
    auth::{middleware::Identity, policy},
    error::AppError,
    middleware::AppState,
    models::post::{ApproveQuery, CreatePostRequest, Page, Post, SearchQuery, UpdatePostRequest},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Approved posts only
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.post_service.list_approved().await?))
}

/// Unapproved posts answer 404 unless the caller is their author or an admin.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    viewer: Option<Identity>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, AppError> {
    let post = state.post_service.get(id).await?;
    if !policy::can_view_post(viewer.as_ref(), &post) {
        return Err(AppError::not_found("Post"));
    }

    Ok(Json(post))
}

pub async fn list_posts_by_author(
    State(state): State<Arc<AppState>>,
    viewer: Option<Identity>,
    Path(author_id): Path<i64>,
) -> Result<Json<Vec<Post>>, AppError> {
    let include_unapproved = policy::can_view_unapproved_by(viewer.as_ref(), author_id);

    Ok(Json(
        state
            .post_service
            .list_by_author(author_id, include_unapproved)
            .await?,
    ))
}

pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    viewer: Option<Identity>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<Post>>, AppError> {
    let include_unapproved = policy::can_search_unapproved(viewer.as_ref());

    Ok(Json(state.post_service.search(&query, include_unapproved).await?))
}

/// Moderation queue. The route is publicly reachable, so the identity is
/// checked here.
pub async fn list_pending_posts(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Vec<Post>>, AppError> {
    policy::require(
        policy::can_view_pending_posts(&identity),
        &identity,
        "view pending posts",
    )?;

    Ok(Json(state.post_service.list_pending().await?))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    policy::require(policy::can_create_post(&identity), &identity, "create post")?;

    let Json(req) = payload?;
    let author_id = policy::post_author(&identity, req.author_id);
    let post = state.post_service.create(author_id, req).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>, AppError> {
    let post = state.post_service.get(id).await?;
    policy::require(policy::can_modify_post(&identity, &post), &identity, "update post")?;

    let Json(req) = payload?;
    Ok(Json(state.post_service.update(id, req).await?))
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let post = state.post_service.get(id).await?;
    policy::require(policy::can_modify_post(&identity, &post), &identity, "delete post")?;

    state.post_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn approve_post(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> Result<Json<Post>, AppError> {
    policy::require(policy::can_approve_post(&identity), &identity, "approve post")?;

    Ok(Json(state.post_service.set_approved(id, query.approved).await?))
}
