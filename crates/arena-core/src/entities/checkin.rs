//! Check-in entity - one day's proof of compliance

use chrono::{DateTime, NaiveDate, Utc};

use crate::value_objects::Snowflake;

/// Check-in. One per (challenge, user, date); never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkin {
    pub id: Snowflake,
    pub challenge_id: Snowflake,
    pub user_id: Snowflake,
    pub checkin_date: NaiveDate,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Checkin {
    pub const MAX_NOTE_LEN: usize = 1000;

    pub fn new(
        id: Snowflake,
        challenge_id: Snowflake,
        user_id: Snowflake,
        checkin_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            challenge_id,
            user_id,
            checkin_date,
            note: None,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }
}
