//! Challenge lifecycle: completing challenges whose end date has passed
//!
//! There is no scheduler. Completion is checked lazily whenever a member
//! opens the dashboard or a challenge page, judged against that member's
//! own calendar date.

use arena_core::rules::select_winner;
use arena_core::{Challenge, Notification, Snowflake, User};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Lifecycle service
pub struct LifecycleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LifecycleService<'a> {
    /// Create a new LifecycleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Complete every challenge of `user` that is past its end date in the
    /// user's timezone. Returns the ids that this call completed.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn check_completed(&self, user: &User) -> ServiceResult<Vec<Snowflake>> {
        let today = user.timezone.today(self.ctx.now());
        let due: Vec<Challenge> = self
            .ctx
            .challenge_repo()
            .list_for_member(user.id)
            .await?
            .into_iter()
            .filter(|c| c.is_due_for_completion(today))
            .collect();

        let mut completed = Vec::new();
        for challenge in &due {
            if self.complete(challenge).await? {
                completed.push(challenge.id);
            }
        }
        Ok(completed)
    }

    /// Pick the winner and notify every member. Returns `false` when another
    /// request completed the challenge first.
    #[instrument(skip(self, challenge), fields(challenge_id = %challenge.id))]
    pub async fn complete(&self, challenge: &Challenge) -> ServiceResult<bool> {
        let members = self
            .ctx
            .membership_repo()
            .list_by_challenge(challenge.id)
            .await?;

        let winner = select_winner(&members);
        let winner_name = match winner {
            Some(w) => self
                .ctx
                .user_repo()
                .find_by_id(w.user_id)
                .await?
                .map(|u| u.display_name),
            None => None,
        };
        let summary = winner.map(|w| (winner_name.as_deref().unwrap_or("Unknown"), w.points));

        let notifications: Vec<Notification> = members
            .iter()
            .map(|m| Notification::challenge_ended(self.ctx.generate_id(), m.user_id, challenge, summary))
            .collect();

        let done = self
            .ctx
            .challenge_repo()
            .complete(challenge.id, winner.map(|w| w.user_id), &notifications)
            .await?;

        if done {
            info!(
                winner_id = ?winner.map(|w| w.user_id),
                members = members.len(),
                "Challenge completed"
            );
        }
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;
    use arena_core::NotificationKind;
    use chrono::Duration;

    #[tokio::test]
    async fn test_past_end_date_completes_once() {
        let (ctx, store) = context();
        let owner = store.add_user("olga");
        let rival = store.add_user("pete");
        let challenge = store.add_challenge(&owner, |c| {
            c.end_date = Some(chrono::Utc::now().date_naive() - Duration::days(3));
        });
        store.add_member(&challenge, &rival, |m| m.points = 40);
        store.update_membership(challenge.id, owner.id, |m| m.points = 25);

        let service = LifecycleService::new(&ctx);
        let completed = service.check_completed(&owner).await.unwrap();
        assert_eq!(completed, vec![challenge.id]);

        let stored = store.challenge(challenge.id);
        assert!(stored.is_completed);
        assert_eq!(stored.winner_id, Some(rival.id));

        for user in [&owner, &rival] {
            let notes = store.notifications_for(user.id);
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].kind, NotificationKind::ChallengeCompleted);
            assert!(notes[0].message.contains("pete won with 40 points"));
        }

        // the second visit finds nothing left to do
        assert!(service.check_completed(&rival).await.unwrap().is_empty());
        assert_eq!(store.notifications_for(owner.id).len(), 1);
    }

    #[tokio::test]
    async fn test_end_date_today_is_still_open() {
        let (ctx, store) = context();
        let owner = store.add_user("quinn");
        let challenge = store.add_challenge(&owner, |c| {
            c.end_date = Some(chrono::Utc::now().date_naive());
        });

        assert!(LifecycleService::new(&ctx)
            .check_completed(&owner)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.challenge(challenge.id).is_completed);
    }
}
