//! Dashboard handler

use axum::{extract::State, Json};
use arena_service::dto::DashboardResponse;
use arena_service::DashboardService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DashboardResponse>> {
    let service = DashboardService::new(state.service_context());
    Ok(Json(service.overview(auth.user()).await?))
}
