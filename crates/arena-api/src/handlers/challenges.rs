//! Challenge handlers
//!
//! Templates, creation, joining, the challenge page, leaderboard and explore.

use axum::{
    extract::{Path, State},
    Json,
};
use arena_core::ChallengeTemplate;
use arena_service::dto::{
    ChallengeResponse, ChallengeViewResponse, CreateChallengeRequest, ExploreEntry,
    JoinChallengeRequest, LeaderboardEntry,
};
use arena_service::ChallengeService;

use crate::extractors::{AuthUser, ChallengeIdPath, FormOrJson, ResponseMode};
use crate::response::{ApiResult, Negotiated};
use crate::state::AppState;

fn challenge_page(challenge: &ChallengeResponse) -> String {
    format!("/challenges/{}", challenge.id)
}

/// GET /challenges/templates
pub async fn templates(State(state): State<AppState>, _auth: AuthUser) -> Json<&'static [ChallengeTemplate]> {
    Json(ChallengeService::new(state.service_context()).templates())
}

/// GET /challenges/explore
pub async fn explore(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<ExploreEntry>>> {
    let service = ChallengeService::new(state.service_context());
    Ok(Json(service.explore(auth.user()).await?))
}

/// POST /challenges
pub async fn create_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    FormOrJson(request): FormOrJson<CreateChallengeRequest>,
) -> ApiResult<Negotiated<ChallengeResponse>> {
    let service = ChallengeService::new(state.service_context());
    let challenge = service.create(auth.user(), request).await?;
    Ok(Negotiated::created(mode, challenge_page(&challenge), challenge))
}

/// POST /challenges/join
pub async fn join_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    FormOrJson(request): FormOrJson<JoinChallengeRequest>,
) -> ApiResult<Negotiated<ChallengeResponse>> {
    let service = ChallengeService::new(state.service_context());
    let challenge = service.join(auth.user(), request).await?;
    Ok(Negotiated::new(mode, challenge_page(&challenge), challenge))
}

/// GET /challenges/{challenge_id}
pub async fn view_challenge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChallengeIdPath>,
) -> ApiResult<Json<ChallengeViewResponse>> {
    let service = ChallengeService::new(state.service_context());
    Ok(Json(service.view(auth.user(), path.challenge_id()?).await?))
}

/// GET /challenges/{challenge_id}/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChallengeIdPath>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let service = ChallengeService::new(state.service_context());
    Ok(Json(service.leaderboard(auth.user(), path.challenge_id()?).await?))
}
