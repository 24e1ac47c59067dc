//! Nudge entity - a reminder from one member to another

use chrono::{DateTime, NaiveDate, Utc};

use crate::value_objects::Snowflake;

/// One per (challenge, sender, receiver, date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nudge {
    pub id: Snowflake,
    pub challenge_id: Snowflake,
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    pub nudge_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Nudge {
    pub fn new(
        id: Snowflake,
        challenge_id: Snowflake,
        sender_id: Snowflake,
        receiver_id: Snowflake,
        nudge_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            challenge_id,
            sender_id,
            receiver_id,
            nudge_date,
            created_at: Utc::now(),
        }
    }
}
