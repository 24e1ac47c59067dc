//! Check-in, comment and notification entity <-> model mappers

use arena_core::entities::{Checkin, Comment, Notification, NotificationKind};
use arena_core::value_objects::Snowflake;

use crate::models::{CheckinModel, CommentModel, NotificationModel};

impl From<CheckinModel> for Checkin {
    fn from(model: CheckinModel) -> Self {
        Checkin {
            id: Snowflake::new(model.id),
            challenge_id: Snowflake::new(model.challenge_id),
            user_id: Snowflake::new(model.user_id),
            checkin_date: model.checkin_date,
            note: model.note,
            photo_url: model.photo_url,
            created_at: model.created_at,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            challenge_id: Snowflake::new(model.challenge_id),
            user_id: Snowflake::new(model.user_id),
            message: model.message,
            created_at: model.created_at,
        }
    }
}

/// Unknown stored kinds read back as general challenge activity
impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            kind: NotificationKind::parse(&model.kind).unwrap_or(NotificationKind::ChallengeActivity),
            title: model.title,
            message: model.message,
            link: model.link,
            is_read: model.is_read,
            created_at: model.created_at,
        }
    }
}
