//! Reaction database model

use sqlx::FromRow;

/// Aggregated reaction count for one check-in (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCountModel {
    pub checkin_id: i64,
    pub reaction: String,
    pub count: i64,
    pub user_reacted: bool,
}
