//! User entity <-> model mapper

use arena_core::entities::User;
use arena_core::value_objects::{Snowflake, UserTimezone};

use crate::models::UserModel;

/// Convert UserModel to User entity. Unknown stored zones fall back to UTC.
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            display_name: model.display_name,
            google_id: model.google_id,
            profile_photo: model.profile_photo,
            timezone: UserTimezone::parse_or_utc(Some(&model.timezone)),
            total_points: model.total_points,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
