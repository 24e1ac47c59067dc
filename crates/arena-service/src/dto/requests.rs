//! Request DTOs for API endpoints
//!
//! Browser forms post every value as a string, so numeric and boolean fields
//! accept either their JSON type or a string form (`"10"`, `"on"`, `""`).

use arena_core::Snowflake;
use serde::{Deserialize, Deserializer};
use validator::Validate;

// ============================================================================
// Lenient form values
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    String(String),
}

/// `10`, `"10"` and `" 10 "` parse; `""` and `null` are absent.
fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a whole number, got {s:?}"))),
    }
}

/// Checkbox semantics: `true`, `"on"`, `"true"`, `"1"` are set, anything else is not.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<BoolOrString>::deserialize(deserializer)? {
        Some(BoolOrString::Bool(b)) => b,
        Some(BoolOrString::String(s)) => matches!(s.trim(), "on" | "true" | "1"),
        None => false,
    })
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be at least 3 characters."))]
    pub username: String,

    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    pub password: String,

    #[validate(length(max = 50, message = "Display name is too long (50 character limit)."))]
    pub display_name: Option<String>,

    pub timezone: Option<String>,
}

/// Login with a username or an e-mail address
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub login_id: String,

    pub password: String,

    pub timezone: Option<String>,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Query string the identity provider redirects back with
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// ============================================================================
// Challenge Requests
// ============================================================================

/// Create challenge request. Omitted scoring fields take the template's
/// values when `template` names one, otherwise the defaults.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct CreateChallengeRequest {
    pub name: String,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "flag")]
    pub is_public: bool,

    #[serde(default, deserialize_with = "optional_number")]
    #[validate(range(min = 1, max = 1000, message = "Points per check-in must be between 1 and 1000."))]
    pub points_per_checkin: Option<i64>,

    #[serde(default, deserialize_with = "optional_number")]
    #[validate(range(min = 0, max = 1000, message = "Streak bonus must be between 0 and 1000."))]
    pub streak_bonus: Option<i64>,

    #[serde(default, deserialize_with = "optional_number")]
    #[validate(range(min = 0, max = 1000, message = "Penalty must be between 0 and 1000."))]
    pub penalty_per_miss: Option<i64>,

    pub verification_type: Option<String>,

    /// `YYYY-MM-DD`, blank for open-ended challenges
    pub end_date: Option<String>,

    #[serde(default, deserialize_with = "optional_number")]
    #[validate(range(min = 1, message = "Milestone target must be at least 1."))]
    pub milestone_target: Option<i64>,

    pub template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinChallengeRequest {
    #[serde(alias = "code")]
    pub join_code: String,
}

// ============================================================================
// Check-in Requests
// ============================================================================

/// Text fields of a check-in submission
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CheckinRequest {
    pub note: Option<String>,
    pub client_timezone: Option<String>,
    pub client_date: Option<String>,
}

/// A file part from a multipart form
#[derive(Clone, Default)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ============================================================================
// Social Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRequest {
    pub checkin_id: Snowflake,
    pub reaction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub message: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    pub timezone: String,
}
