//! Administration handlers

use axum::{
    extract::{Path, State},
    Json,
};
use arena_service::dto::MessageResponse;
use arena_service::AdminService;

use crate::extractors::{AuthUser, CheckinIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// DELETE /admin/checkins/{checkin_id}
pub async fn delete_checkin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CheckinIdPath>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.delete_checkin(&auth.0, path.checkin_id()?).await?))
}
