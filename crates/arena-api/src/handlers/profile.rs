//! Profile and achievement handlers

use axum::{extract::State, Json};
use arena_service::dto::{AchievementsResponse, CurrentUserResponse, ProfileResponse, UpdateProfileRequest};
use arena_service::{AchievementService, ProfileService};

use crate::extractors::{AuthUser, FormOrJson, PhotoUpload, ResponseMode};
use crate::response::{ApiResult, Negotiated};
use crate::state::AppState;

const PROFILE_PAGE: &str = "/profile";

/// GET /profile
pub async fn overview(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    Ok(Json(service.overview(auth.user()).await?))
}

/// PATCH /profile
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    FormOrJson(request): FormOrJson<UpdateProfileRequest>,
) -> ApiResult<Negotiated<CurrentUserResponse>> {
    let service = ProfileService::new(state.service_context());
    let user = service.update(auth.user(), request).await?;
    Ok(Negotiated::new(mode, PROFILE_PAGE, user))
}

/// POST /profile/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    PhotoUpload(file): PhotoUpload,
) -> ApiResult<Negotiated<CurrentUserResponse>> {
    let service = ProfileService::new(state.service_context());
    let user = service.upload_photo(auth.user(), file).await?;
    Ok(Negotiated::new(mode, PROFILE_PAGE, user))
}

/// DELETE /profile/photo
pub async fn remove_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
) -> ApiResult<Negotiated<CurrentUserResponse>> {
    let service = ProfileService::new(state.service_context());
    let user = service.remove_photo(auth.user()).await?;
    Ok(Negotiated::new(mode, PROFILE_PAGE, user))
}

/// GET /achievements
pub async fn achievements(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<AchievementsResponse>> {
    let service = AchievementService::new(state.service_context());
    Ok(Json(service.list(auth.user().id).await?))
}
