//! Check-in handler

use axum::extract::{Path, State};
use arena_service::dto::CheckinResultResponse;
use arena_service::CheckinService;

use crate::extractors::{AuthUser, ChallengeIdPath, CheckinSubmission, ResponseMode};
use crate::response::{ApiResult, Negotiated};
use crate::state::AppState;

/// Record today's check-in, optionally with a photo
///
/// POST /challenges/{challenge_id}/checkins
pub async fn create_checkin(
    State(state): State<AppState>,
    auth: AuthUser,
    mode: ResponseMode,
    Path(path): Path<ChallengeIdPath>,
    submission: CheckinSubmission,
) -> ApiResult<Negotiated<CheckinResultResponse>> {
    let challenge_id = path.challenge_id()?;
    let service = CheckinService::new(state.service_context());
    let result = service
        .record(auth.user(), challenge_id, submission.request, submission.photo)
        .await?;
    Ok(Negotiated::created(mode, format!("/challenges/{challenge_id}"), result))
}
