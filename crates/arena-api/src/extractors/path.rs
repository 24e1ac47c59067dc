//! Path parameter extractors
//!
//! Snowflake ids arrive as strings; these parse them with a 400 on failure.

use arena_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(value: &str, name: &str) -> Result<Snowflake, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with challenge_id
#[derive(Debug, Deserialize)]
pub struct ChallengeIdPath {
    pub challenge_id: String,
}

impl ChallengeIdPath {
    /// Parse challenge_id as Snowflake
    pub fn challenge_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.challenge_id, "challenge_id")
    }
}

/// Path parameters for a nudge: the challenge and the member being nudged
#[derive(Debug, Deserialize)]
pub struct NudgePath {
    pub challenge_id: String,
    pub user_id: String,
}

impl NudgePath {
    pub fn challenge_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.challenge_id, "challenge_id")
    }

    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckinIdPath {
    pub checkin_id: String,
}

impl CheckinIdPath {
    pub fn checkin_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.checkin_id, "checkin_id")
    }
}
