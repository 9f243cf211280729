use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::db::prelude::*;
use crate::db::seed;

/// Operations the API layer needs from a backing store.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self) -> User;
    async fn update_user(&self, patch: UserPatch) -> User;
    async fn get_activities(&self) -> Vec<Activity>;
    async fn get_daily_challenges(&self) -> Vec<Challenge>;
    async fn complete_challenge(&self, id: ChallengeId) -> StoreResult<Challenge>;
    async fn get_badges(&self) -> Vec<Badge>;
    async fn get_leaderboard(&self) -> Vec<LeaderboardEntry>;
}

#[derive(Debug)]
struct Tables {
    user: User,
    activities: Vec<Activity>,
    challenges: Vec<Challenge>,
    badges: Vec<Badge>,
    leaderboard: Vec<LeaderboardEntry>,
}

/// In-process store holding every table behind one lock.
#[derive(Debug)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    /// Builds a store populated with the sample data, generating activity history backwards
    /// from `anchor`.
    pub fn seeded(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                user: seed::user(),
                activities: seed::activities(seed, anchor),
                challenges: seed::challenges(),
                badges: seed::badges(),
                leaderboard: seed::leaderboard(),
            }),
        }
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self) -> User {
        self.tables.read().await.user.clone()
    }

    #[instrument(skip(self))]
    async fn update_user(&self, patch: UserPatch) -> User {
        let mut tables = self.tables.write().await;
        tables.user.apply(patch);

        tracing::debug!(user_id = %tables.user.id, "user profile updated");
        tables.user.clone()
    }

    async fn get_activities(&self) -> Vec<Activity> {
        self.tables.read().await.activities.clone()
    }

    async fn get_daily_challenges(&self) -> Vec<Challenge> {
        self.tables.read().await.challenges.clone()
    }

    #[instrument(skip(self))]
    async fn complete_challenge(&self, id: ChallengeId) -> StoreResult<Challenge> {
        let mut tables = self.tables.write().await;
        let challenge = tables
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ChallengeNotFound(id))?;

        if challenge.is_completed {
            tracing::debug!(%id, "challenge already completed");
        } else {
            challenge.is_completed = true;
            tracing::info!(%id, title = %challenge.title, "challenge completed");
        }

        Ok(challenge.clone())
    }

    async fn get_badges(&self) -> Vec<Badge> {
        self.tables.read().await.badges.clone()
    }

    async fn get_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.tables.read().await.leaderboard.clone()
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn storage() -> MemStorage {
        MemStorage::seeded(42, Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_update_user_merges_patch() {
        let store = storage();
        let before = store.get_user().await;

        let patch = UserPatch {
            target_band: Some("7.5".to_string()),
            weaknesses: Some(Some(vec!["Cohesion".to_string()])),
            ..Default::default()
        };
        let updated = store.update_user(patch).await;

        assert_eq!(updated.target_band, "7.5");
        assert_eq!(updated.weaknesses, Some(vec!["Cohesion".to_string()]));
        assert_eq!(updated.name, before.name);
        assert_eq!(updated.current_streak, before.current_streak);
        assert_eq!(store.get_user().await, updated);
    }

    #[tokio::test]
    async fn test_empty_patch_is_noop() {
        let store = storage();
        let before = store.get_user().await;
        assert_eq!(store.update_user(UserPatch::default()).await, before);
    }

    #[tokio::test]
    async fn test_complete_challenge() {
        let store = storage();

        let completed = store.complete_challenge(ChallengeId(2)).await.unwrap();
        assert!(completed.is_completed);
        assert_eq!(completed.id, ChallengeId(2));

        let challenges = store.get_daily_challenges().await;
        assert!(!challenges[0].is_completed);
        assert!(challenges[1].is_completed);

        // second completion is idempotent
        let again = store.complete_challenge(ChallengeId(2)).await.unwrap();
        assert_eq!(again, completed);
    }

    #[tokio::test]
    async fn test_complete_unknown_challenge() {
        let store = storage();
        let err = store.complete_challenge(ChallengeId(404)).await.unwrap_err();
        assert!(matches!(err, StoreError::ChallengeNotFound(ChallengeId(404))));
        assert!(store.get_daily_challenges().await.iter().all(|c| !c.is_completed));
    }

    #[tokio::test]
    async fn test_listings_stable_across_calls() {
        let store = storage();

        let badges = store.get_badges().await;
        let board = store.get_leaderboard().await;
        let activities = store.get_activities().await;

        store.complete_challenge(ChallengeId(1)).await.unwrap();
        store.update_user(UserPatch::default()).await;

        assert_eq!(store.get_badges().await, badges);
        assert_eq!(store.get_leaderboard().await, board);
        assert_eq!(store.get_activities().await, activities);
    }
}
