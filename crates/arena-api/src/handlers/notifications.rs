//! Notification handlers

use axum::{extract::State, Json};
use arena_service::dto::{CountResponse, NotificationResponse};
use arena_service::NotificationService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Latest notifications; marks them all read
///
/// GET /notifications
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.list(auth.user().id).await?))
}

/// GET /notifications/unread-count
pub async fn unread_count(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<CountResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.unread_count(auth.user().id).await?))
}
