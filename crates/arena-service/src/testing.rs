//! In-memory repositories and stub ports for service tests
//!
//! `MemoryStore` implements every repository trait over plain vectors and
//! emulates the unique constraints and transactional guards the PostgreSQL
//! implementations rely on.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use arena_cache::MemorySessionStore;
use arena_common::{AdminConfig, JwtService};
use arena_core::traits::{
    AchievementRepository, ChallengeRepository, CheckinRepository, CommentRepository,
    ExternalIdentity, IdentityProvider, ImageHost, MembershipRepository, NotificationRepository,
    NudgeRepository, PortResult, ReactionRepository, RepoResult, UserRepository,
};
use arena_core::{
    Achievement, AchievementStats, Challenge, Checkin, CheckinReaction, Comment, ConditionType,
    DomainError, HostedImage, ImageUpload, JoinCode, Membership, Notification, Nudge,
    ReactionKind, ReactionSummary, ReactionToggle, Snowflake, SnowflakeGenerator, UploadTarget,
    User, UserAchievement,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::services::{ServiceContext, ServiceContextBuilder};

/// Smallest byte string that passes the PNG signature check
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

// ============================================================================
// Context builders
// ============================================================================

pub fn context() -> (ServiceContext, Arc<MemoryStore>) {
    build(None, None)
}

pub fn context_with_images(host: StubImageHost) -> (ServiceContext, Arc<MemoryStore>) {
    build(Some(Arc::new(host)), None)
}

pub fn context_with_identity(provider: StubIdentityProvider) -> (ServiceContext, Arc<MemoryStore>) {
    build(None, Some(Arc::new(provider)))
}

fn build(
    image_host: Option<Arc<dyn ImageHost>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
) -> (ServiceContext, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let ctx = ServiceContextBuilder::new()
        .user_repo(store.clone())
        .challenge_repo(store.clone())
        .membership_repo(store.clone())
        .checkin_repo(store.clone())
        .reaction_repo(store.clone())
        .comment_repo(store.clone())
        .nudge_repo(store.clone())
        .notification_repo(store.clone())
        .achievement_repo(store.clone())
        .session_store(Arc::new(MemorySessionStore::new()))
        .image_host(image_host)
        .identity_provider(identity_provider)
        .jwt_service(Arc::new(JwtService::new(
            "test-secret-key-that-is-long-enough-for-hs256",
            900,
            604_800,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .admin(AdminConfig {
            usernames: vec!["root".to_string()],
        })
        .build()
        .unwrap();
    (ctx, store)
}

/// The nine achievements the production migration seeds
pub fn seed_catalog(store: &MemoryStore) {
    let rows = [
        (1, "First Check-in", ConditionType::TotalCheckins, 1),
        (2, "Week Warrior", ConditionType::Streak, 7),
        (3, "Month Master", ConditionType::Streak, 30),
        (4, "Unstoppable", ConditionType::Streak, 50),
        (5, "Centurion", ConditionType::TotalPoints, 100),
        (6, "Point Machine", ConditionType::TotalPoints, 500),
        (7, "Social Butterfly", ConditionType::ChallengesJoined, 3),
        (8, "Challenge Creator", ConditionType::ChallengesCreated, 1),
        (9, "Photographer", ConditionType::PhotoCheckins, 10),
    ];
    store.inner.lock().catalog = rows
        .into_iter()
        .map(|(id, name, condition, threshold)| Achievement {
            id: Snowflake::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            icon: "&#9989;".to_string(),
            condition,
            threshold,
        })
        .collect();
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    challenges: Vec<Challenge>,
    memberships: Vec<Membership>,
    checkins: Vec<Checkin>,
    reactions: Vec<CheckinReaction>,
    comments: Vec<Comment>,
    nudges: Vec<Nudge>,
    notifications: Vec<Notification>,
    catalog: Vec<Achievement>,
    earned: Vec<UserAchievement>,
    pinned_stats: HashMap<Snowflake, AchievementStats>,
}

pub struct MemoryStore {
    inner: Mutex<Tables>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Tables::default()),
            next_id: AtomicI64::new(1_000),
        }
    }
}

impl MemoryStore {
    fn id(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // === Fixtures ===

    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(self.id(), username, Some(&format!("{username}@test.io")));
        self.inner.lock().users.push(user.clone());
        user
    }

    pub fn user(&self, id: Snowflake) -> User {
        self.inner.lock().users.iter().find(|u| u.id == id).cloned().unwrap()
    }

    pub fn update_user(&self, id: Snowflake, f: impl FnOnce(&mut User)) {
        let mut tables = self.inner.lock();
        f(tables.users.iter_mut().find(|u| u.id == id).unwrap());
    }

    /// A challenge plus its owner's membership
    pub fn add_challenge(&self, owner: &User, f: impl FnOnce(&mut Challenge)) -> Challenge {
        let mut challenge = Challenge::new(self.id(), "Challenge".to_string(), owner.id, JoinCode::generate());
        f(&mut challenge);
        let membership = Membership::new(self.id(), challenge.id, owner.id);
        let mut tables = self.inner.lock();
        tables.challenges.push(challenge.clone());
        tables.memberships.push(membership);
        challenge
    }

    pub fn challenge(&self, id: Snowflake) -> Challenge {
        self.inner.lock().challenges.iter().find(|c| c.id == id).cloned().unwrap()
    }

    pub fn add_member(&self, challenge: &Challenge, user: &User, f: impl FnOnce(&mut Membership)) -> Membership {
        let mut membership = Membership::new(self.id(), challenge.id, user.id);
        f(&mut membership);
        self.inner.lock().memberships.push(membership.clone());
        membership
    }

    pub fn membership(&self, challenge_id: Snowflake, user_id: Snowflake) -> Option<Membership> {
        self.inner
            .lock()
            .memberships
            .iter()
            .find(|m| m.challenge_id == challenge_id && m.user_id == user_id)
            .cloned()
    }

    pub fn update_membership(&self, challenge_id: Snowflake, user_id: Snowflake, f: impl FnOnce(&mut Membership)) {
        let mut tables = self.inner.lock();
        f(tables
            .memberships
            .iter_mut()
            .find(|m| m.challenge_id == challenge_id && m.user_id == user_id)
            .unwrap());
    }

    /// A bare check-in row; membership and points are left untouched
    pub fn add_checkin(&self, challenge: &Challenge, user: &User, date: NaiveDate, f: impl FnOnce(&mut Checkin)) -> Checkin {
        let mut checkin = Checkin::new(self.id(), challenge.id, user.id, date);
        f(&mut checkin);
        self.inner.lock().checkins.push(checkin.clone());
        checkin
    }

    pub fn checkin_count(&self) -> usize {
        self.inner.lock().checkins.len()
    }

    /// In insertion order
    pub fn checkins_for(&self, user_id: Snowflake) -> Vec<Checkin> {
        self.inner
            .lock()
            .checkins
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn add_notification(&self, notification: Notification) {
        self.inner.lock().notifications.push(notification);
    }

    /// Newest first
    pub fn notifications_for(&self, user_id: Snowflake) -> Vec<Notification> {
        newest_first(
            self.inner
                .lock()
                .notifications
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect(),
            |n| (n.created_at, n.id),
        )
    }

    /// Pin the statistics reported for a user instead of deriving them
    pub fn set_stats(&self, user_id: Snowflake, f: impl FnOnce(&mut AchievementStats)) {
        let mut stats = AchievementStats::default();
        f(&mut stats);
        self.inner.lock().pinned_stats.insert(user_id, stats);
    }

    pub fn catalog_len(&self) -> usize {
        self.inner.lock().catalog.len()
    }
}

fn newest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

fn take<T>(rows: Vec<T>, limit: i64) -> Vec<T> {
    rows.into_iter().take(usize::try_from(limit).unwrap_or(0)).collect()
}

// ============================================================================
// Repositories
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.inner.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        Ok(self.inner.lock().users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username = username.to_lowercase();
        Ok(self.inner.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .inner
            .lock()
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email.as_str()))
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> RepoResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .users
            .iter()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let username = username.to_lowercase();
        Ok(self.inner.lock().users.iter().any(|u| u.username == username))
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if user.email.is_some() && tables.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *row = user.clone();
        Ok(())
    }
}

#[async_trait]
impl ChallengeRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Challenge>> {
        Ok(self.inner.lock().challenges.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Challenge>> {
        Ok(self.inner.lock().challenges.iter().find(|c| &c.join_code == code).cloned())
    }

    async fn create_with_owner(&self, challenge: &Challenge, owner: &Membership) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        if tables.challenges.iter().any(|c| c.join_code == challenge.join_code) {
            return Err(DomainError::JoinCodeExists);
        }
        tables.challenges.push(challenge.clone());
        tables.memberships.push(owner.clone());
        Ok(())
    }

    async fn list_explorable(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Challenge>> {
        let tables = self.inner.lock();
        let joined: HashSet<Snowflake> = tables
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.challenge_id)
            .collect();
        let rows = tables
            .challenges
            .iter()
            .filter(|c| c.is_public && !c.is_completed && !joined.contains(&c.id))
            .cloned()
            .collect();
        Ok(take(newest_first(rows, |c: &Challenge| (c.created_at, c.id)), limit))
    }

    async fn list_for_member(&self, user_id: Snowflake) -> RepoResult<Vec<Challenge>> {
        let tables = self.inner.lock();
        let joined: HashSet<Snowflake> = tables
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.challenge_id)
            .collect();
        Ok(tables.challenges.iter().filter(|c| joined.contains(&c.id)).cloned().collect())
    }

    async fn complete(
        &self,
        challenge_id: Snowflake,
        winner_id: Option<Snowflake>,
        notifications: &[Notification],
    ) -> RepoResult<bool> {
        let mut tables = self.inner.lock();
        let challenge = tables
            .challenges
            .iter_mut()
            .find(|c| c.id == challenge_id)
            .ok_or(DomainError::ChallengeNotFound(challenge_id))?;
        if challenge.is_completed {
            return Ok(false);
        }
        challenge.is_completed = true;
        challenge.winner_id = winner_id;
        tables.notifications.extend_from_slice(notifications);
        Ok(true)
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>> {
        Ok(self.membership(challenge_id, user_id))
    }

    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        if tables
            .memberships
            .iter()
            .any(|m| m.challenge_id == membership.challenge_id && m.user_id == membership.user_id)
        {
            return Err(DomainError::AlreadyMember);
        }
        tables.memberships.push(membership.clone());
        Ok(())
    }

    async fn list_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<Vec<Membership>> {
        Ok(self
            .inner
            .lock()
            .memberships
            .iter()
            .filter(|m| m.challenge_id == challenge_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Membership>> {
        Ok(self.inner.lock().memberships.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn count_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .inner
            .lock()
            .memberships
            .iter()
            .filter(|m| m.challenge_id == challenge_id)
            .count() as i64)
    }
}

#[async_trait]
impl CheckinRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Checkin>> {
        Ok(self.inner.lock().checkins.iter().find(|c| c.id == id).cloned())
    }

    async fn find_on(&self, challenge_id: Snowflake, user_id: Snowflake, date: NaiveDate) -> RepoResult<Option<Checkin>> {
        Ok(self
            .inner
            .lock()
            .checkins
            .iter()
            .find(|c| c.challenge_id == challenge_id && c.user_id == user_id && c.checkin_date == date)
            .cloned())
    }

    async fn record(&self, checkin: &Checkin, before: &Membership, after: &Membership) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        if tables.checkins.iter().any(|c| {
            c.challenge_id == checkin.challenge_id
                && c.user_id == checkin.user_id
                && c.checkin_date == checkin.checkin_date
        }) {
            return Err(DomainError::AlreadyCheckedIn);
        }

        let row = tables
            .memberships
            .iter_mut()
            .find(|m| m.id == before.id)
            .filter(|m| **m == *before)
            .ok_or(DomainError::StaleMembership)?;
        *row = after.clone();

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == checkin.user_id)
            .ok_or(DomainError::UserNotFound(checkin.user_id))?;
        user.total_points += after.points - before.points;

        tables.checkins.push(checkin.clone());
        Ok(())
    }

    async fn recent_by_challenge(&self, challenge_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>> {
        let rows = self
            .inner
            .lock()
            .checkins
            .iter()
            .filter(|c| c.challenge_id == challenge_id)
            .cloned()
            .collect();
        Ok(take(newest_first(rows, |c: &Checkin| (c.created_at, c.id)), limit))
    }

    async fn recent_by_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>> {
        let rows = self.checkins_for(user_id);
        Ok(take(newest_first(rows, |c: &Checkin| (c.created_at, c.id)), limit))
    }

    async fn users_checked_in_on(&self, challenge_id: Snowflake, date: NaiveDate) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .inner
            .lock()
            .checkins
            .iter()
            .filter(|c| c.challenge_id == challenge_id && c.checkin_date == date)
            .map(|c| c.user_id)
            .collect())
    }

    async fn count_for_member(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .inner
            .lock()
            .checkins
            .iter()
            .filter(|c| c.challenge_id == challenge_id && c.user_id == user_id)
            .count() as i64)
    }

    async fn count_by_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        Ok(self.checkins_for(user_id).len() as i64)
    }

    async fn daily_counts(&self, user_id: Snowflake, since: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>> {
        let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for checkin in self.checkins_for(user_id).iter().filter(|c| c.checkin_date >= since) {
            *counts.entry(checkin.checkin_date).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn delete_with_reactions(&self, id: Snowflake) -> RepoResult<bool> {
        let mut tables = self.inner.lock();
        let before = tables.checkins.len();
        tables.checkins.retain(|c| c.id != id);
        if tables.checkins.len() == before {
            return Ok(false);
        }
        tables.reactions.retain(|r| r.checkin_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn toggle(&self, checkin_id: Snowflake, user_id: Snowflake, kind: ReactionKind) -> RepoResult<ReactionToggle> {
        let mut tables = self.inner.lock();
        let existing = tables
            .reactions
            .iter()
            .position(|r| r.checkin_id == checkin_id && r.user_id == user_id && r.kind == kind);
        let added = match existing {
            Some(index) => {
                tables.reactions.remove(index);
                false
            }
            None => {
                tables.reactions.push(CheckinReaction::new(checkin_id, user_id, kind));
                true
            }
        };
        let count = tables
            .reactions
            .iter()
            .filter(|r| r.checkin_id == checkin_id && r.kind == kind)
            .count() as i64;
        Ok(ReactionToggle { added, count })
    }

    async fn summaries(&self, checkin_ids: &[Snowflake], viewer: Snowflake) -> RepoResult<Vec<ReactionSummary>> {
        let tables = self.inner.lock();
        let mut summaries = Vec::new();
        for &checkin_id in checkin_ids {
            for kind in ReactionKind::ALL {
                let rows: Vec<&CheckinReaction> = tables
                    .reactions
                    .iter()
                    .filter(|r| r.checkin_id == checkin_id && r.kind == kind)
                    .collect();
                if !rows.is_empty() {
                    summaries.push(ReactionSummary {
                        checkin_id,
                        kind,
                        count: rows.len() as i64,
                        user_reacted: rows.iter().any(|r| r.user_id == viewer),
                    });
                }
            }
        }
        Ok(summaries)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.inner.lock().comments.push(comment.clone());
        Ok(())
    }

    async fn recent_by_challenge(&self, challenge_id: Snowflake, limit: i64) -> RepoResult<Vec<Comment>> {
        let rows = self
            .inner
            .lock()
            .comments
            .iter()
            .filter(|c| c.challenge_id == challenge_id)
            .cloned()
            .collect();
        Ok(take(newest_first(rows, |c: &Comment| (c.created_at, c.id)), limit))
    }
}

#[async_trait]
impl NudgeRepository for MemoryStore {
    async fn create_with_notification(&self, nudge: &Nudge, notification: &Notification) -> RepoResult<()> {
        let mut tables = self.inner.lock();
        if tables.nudges.iter().any(|n| {
            n.challenge_id == nudge.challenge_id
                && n.sender_id == nudge.sender_id
                && n.receiver_id == nudge.receiver_id
                && n.nudge_date == nudge.nudge_date
        }) {
            return Err(DomainError::AlreadyNudged);
        }
        tables.nudges.push(nudge.clone());
        tables.notifications.push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        self.add_notification(notification.clone());
        Ok(())
    }

    async fn list_recent(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Notification>> {
        Ok(take(self.notifications_for(user_id), limit))
    }

    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64> {
        let mut marked = 0;
        for n in self.inner.lock().notifications.iter_mut() {
            if n.user_id == user_id && !n.is_read {
                n.is_read = true;
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .inner
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }
}

#[async_trait]
impl AchievementRepository for MemoryStore {
    async fn list_all(&self) -> RepoResult<Vec<Achievement>> {
        let mut catalog = self.inner.lock().catalog.clone();
        catalog.sort_by_key(|a| (a.threshold, a.id));
        Ok(catalog)
    }

    async fn earned_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserAchievement>> {
        Ok(self.inner.lock().earned.iter().filter(|e| e.user_id == user_id).cloned().collect())
    }

    async fn user_stats(&self, user_id: Snowflake) -> RepoResult<AchievementStats> {
        let tables = self.inner.lock();
        if let Some(stats) = tables.pinned_stats.get(&user_id) {
            return Ok(*stats);
        }
        let memberships: Vec<&Membership> = tables.memberships.iter().filter(|m| m.user_id == user_id).collect();
        let checkins: Vec<&Checkin> = tables.checkins.iter().filter(|c| c.user_id == user_id).collect();
        Ok(AchievementStats {
            total_checkins: checkins.len() as i64,
            best_streak: memberships.iter().map(|m| i64::from(m.best_streak)).max().unwrap_or(0),
            total_points: memberships.iter().map(|m| m.points).sum(),
            challenges_joined: memberships.len() as i64,
            challenges_created: tables.challenges.iter().filter(|c| c.creator_id == user_id).count() as i64,
            photo_checkins: checkins.iter().filter(|c| c.has_photo()).count() as i64,
        })
    }

    async fn award(&self, award: &UserAchievement, notification: &Notification) -> RepoResult<bool> {
        let mut tables = self.inner.lock();
        if tables
            .earned
            .iter()
            .any(|e| e.user_id == award.user_id && e.achievement_id == award.achievement_id)
        {
            return Ok(false);
        }
        tables.earned.push(award.clone());
        tables.notifications.push(notification.clone());
        Ok(true)
    }
}

// ============================================================================
// Stub ports
// ============================================================================

/// Image host that "stores" everything under a fake delivery URL
#[derive(Clone, Default)]
pub struct StubImageHost {
    uploads: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
    fail: bool,
}

impl StubImageHost {
    /// Every upload fails as if the host were unreachable
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for StubImageHost {
    async fn upload(&self, image: &ImageUpload, target: &UploadTarget) -> PortResult<HostedImage> {
        if self.fail {
            return Err(DomainError::UpstreamError("connection refused".to_string()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let public_id = target.qualified_id();
        let ext = image.format.mime_type().trim_start_matches("image/");
        Ok(HostedImage {
            url: format!("https://res.cloudinary.com/demo/image/upload/v1/{public_id}.{ext}"),
            public_id,
        })
    }

    async fn delete(&self, _public_id: &str) -> PortResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

/// Identity provider that always returns the same profile
pub struct StubIdentityProvider {
    identity: ExternalIdentity,
}

impl StubIdentityProvider {
    pub fn new(subject: &str, email: Option<&str>, name: Option<&str>) -> Self {
        Self {
            identity: ExternalIdentity {
                subject: subject.to_string(),
                email: email.map(str::to_string),
                name: name.map(str::to_string),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/auth?state={state}")
    }

    async fn exchange_code(&self, _code: &str) -> PortResult<ExternalIdentity> {
        Ok(self.identity.clone())
    }
}
