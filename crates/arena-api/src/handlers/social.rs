//! Reaction, comment and nudge handlers

use axum::extract::{Path, State};
use arena_service::dto::{
    CommentRequest, CommentResponse, MessageResponse, ReactionRequest, ReactionToggleResponse,
};
use arena_service::SocialService;

use crate::extractors::{AuthUser, ChallengeIdPath, FormOrJson, NudgePath, ResponseMode};
use crate::response::{ApiResult, Negotiated};
use crate::state::AppState;

/// Toggle a reaction on a check-in
///
/// POST /challenges/{challenge_id}/reactions
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    Path(path): Path<ChallengeIdPath>,
    FormOrJson(request): FormOrJson<ReactionRequest>,
) -> ApiResult<Negotiated<ReactionToggleResponse>> {
    let challenge_id = path.challenge_id()?;
    let service = SocialService::new(state.service_context());
    let toggled = service.toggle_reaction(auth.user(), challenge_id, request).await?;
    Ok(Negotiated::new(mode, format!("/challenges/{challenge_id}"), toggled))
}

/// POST /challenges/{challenge_id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    Path(path): Path<ChallengeIdPath>,
    FormOrJson(request): FormOrJson<CommentRequest>,
) -> ApiResult<Negotiated<CommentResponse>> {
    let challenge_id = path.challenge_id()?;
    let service = SocialService::new(state.service_context());
    let comment = service.add_comment(auth.user(), challenge_id, request).await?;
    Ok(Negotiated::created(mode, format!("/challenges/{challenge_id}"), comment))
}

/// Nudge a member who has not checked in today
///
/// POST /challenges/{challenge_id}/nudges/{user_id}
pub async fn nudge(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    Path(path): Path<NudgePath>,
) -> ApiResult<Negotiated<MessageResponse>> {
    let challenge_id = path.challenge_id()?;
    let service = SocialService::new(state.service_context());
    let sent = service.nudge(auth.user(), challenge_id, path.user_id()?).await?;
    Ok(Negotiated::new(mode, format!("/challenges/{challenge_id}"), sent))
}
