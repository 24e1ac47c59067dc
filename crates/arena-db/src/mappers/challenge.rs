//! Challenge and membership entity <-> model mappers

use arena_core::entities::{Challenge, Membership, VerificationType};
use arena_core::value_objects::{JoinCode, Snowflake};

use crate::models::{ChallengeModel, MembershipModel};

impl From<ChallengeModel> for Challenge {
    fn from(model: ChallengeModel) -> Self {
        Challenge {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            creator_id: Snowflake::new(model.creator_id),
            join_code: JoinCode::from_stored(model.join_code),
            is_public: model.is_public,
            points_per_checkin: model.points_per_checkin,
            penalty_per_miss: model.penalty_per_miss,
            streak_bonus: model.streak_bonus,
            verification_type: VerificationType::parse_lenient(&model.verification_type),
            end_date: model.end_date,
            milestone_target: model.milestone_target,
            is_completed: model.is_completed,
            winner_id: model.winner_id.map(Snowflake::new),
            created_at: model.created_at,
        }
    }
}

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            id: Snowflake::new(model.id),
            challenge_id: Snowflake::new(model.challenge_id),
            user_id: Snowflake::new(model.user_id),
            points: model.points,
            current_streak: model.current_streak,
            best_streak: model.best_streak,
            streak_freezes: model.streak_freezes,
            freezes_used: model.freezes_used,
            joined_at: model.joined_at,
        }
    }
}
