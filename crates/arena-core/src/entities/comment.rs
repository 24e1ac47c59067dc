//! Comment entity - challenge discussion

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub challenge_id: Snowflake,
    pub user_id: Snowflake,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub const MAX_LEN: usize = 500;

    /// Create a comment from raw input; the message is trimmed and must be 1..=500 chars.
    pub fn new(
        id: Snowflake,
        challenge_id: Snowflake,
        user_id: Snowflake,
        message: &str,
    ) -> Result<Self, DomainError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::ValidationError(
                "Comment cannot be empty.".to_string(),
            ));
        }
        if message.chars().count() > Self::MAX_LEN {
            return Err(DomainError::ContentTooLong { max: Self::MAX_LEN });
        }
        Ok(Self {
            id,
            challenge_id,
            user_id,
            message: message.to_string(),
            created_at: Utc::now(),
        })
    }
}
