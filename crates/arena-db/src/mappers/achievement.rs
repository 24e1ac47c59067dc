//! Achievement entity <-> model mappers

use arena_core::entities::{
    Achievement, AchievementStats, ConditionType, ReactionKind, ReactionSummary, UserAchievement,
};
use arena_core::value_objects::Snowflake;

use crate::models::{
    AchievementModel, AchievementStatsModel, ReactionCountModel, UserAchievementModel,
};

/// Convert an achievement row. Rows with an unknown condition are skipped.
pub fn achievement_from_model(model: AchievementModel) -> Option<Achievement> {
    let condition = ConditionType::parse(&model.condition_type)?;
    Some(Achievement {
        id: Snowflake::new(model.id),
        name: model.name,
        description: model.description,
        icon: model.icon,
        condition,
        threshold: model.condition_value,
    })
}

/// Convert a reaction count row. Rows with an unknown reaction are skipped.
pub fn reaction_summary_from_model(model: ReactionCountModel) -> Option<ReactionSummary> {
    let kind = ReactionKind::parse(&model.reaction).ok()?;
    Some(ReactionSummary {
        checkin_id: Snowflake::new(model.checkin_id),
        kind,
        count: model.count,
        user_reacted: model.user_reacted,
    })
}

impl From<UserAchievementModel> for UserAchievement {
    fn from(model: UserAchievementModel) -> Self {
        UserAchievement {
            user_id: Snowflake::new(model.user_id),
            achievement_id: Snowflake::new(model.achievement_id),
            earned_at: model.earned_at,
        }
    }
}

impl From<AchievementStatsModel> for AchievementStats {
    fn from(model: AchievementStatsModel) -> Self {
        AchievementStats {
            total_checkins: model.total_checkins,
            best_streak: model.best_streak,
            total_points: model.total_points,
            challenges_joined: model.challenges_joined,
            challenges_created: model.challenges_created,
            photo_checkins: model.photo_checkins,
        }
    }
}
