//! Sample data loaded into [`MemStorage`](crate::db::storage::MemStorage) at startup.
//!
//! Everything here is fixed except the activity heatmap, which is drawn from a seeded
//! [`StdRng`] so that the same seed and anchor always reproduce the same history.

use chrono::{DateTime, Days, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::models::activity::{Activity, ActivityKind, MAX_INTENSITY};
use crate::db::models::badge::{Badge, BadgeCategory};
use crate::db::models::challenge::{Challenge, ChallengeId, Difficulty, Skill};
use crate::db::models::leaderboard::LeaderboardEntry;
use crate::db::models::user::{User, UserId};

pub const CURRENT_USER_ID: UserId = UserId(1);

/// Number of days of heatmap history generated behind the anchor.
pub const HISTORY_DAYS: u64 = 365;

/// Chance that any given day in the history has an activity.
const ACTIVE_DAY_PROBABILITY: f64 = 0.7;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

pub fn avatar_url(seed: &str) -> String {
    format!("{AVATAR_BASE_URL}?seed={seed}")
}

pub fn user() -> User {
    User {
        id: CURRENT_USER_ID,
        name: "Alex Chen".to_string(),
        email: "alex@example.com".to_string(),
        target_band: "8.0".to_string(),
        current_streak: Some(12),
        momentum_score: Some(84),
        avatar: Some(avatar_url("Alex")),
        weaknesses: Some(vec![
            "Writing Task 2".to_string(),
            "Speaking Fluency".to_string(),
        ]),
        strengths: Some(vec!["Listening".to_string(), "Reading".to_string()]),
    }
}

/// Generates the heatmap history, most recent day first.
///
/// Day `i` (counting back from `anchor`) produces an activity with id `i` roughly 70% of the
/// time; skipped days leave gaps in the id sequence.
pub fn activities(seed: u64, anchor: DateTime<Utc>) -> Vec<Activity> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut activities = Vec::new();

    for offset in 0..HISTORY_DAYS {
        let Some(date) = anchor.checked_sub_days(Days::new(offset)) else {
            continue;
        };

        if !rng.random_bool(ACTIVE_DAY_PROBABILITY) {
            continue;
        }

        activities.push(Activity {
            id: offset as i32,
            user_id: CURRENT_USER_ID,
            date,
            intensity: rng.random_range(0..=MAX_INTENSITY),
            kind: ActivityKind::Practice,
            score: Some(rng.random_range(0..100)),
        });
    }

    tracing::debug!(seed, count = activities.len(), "generated activity history");
    activities
}

pub fn challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: ChallengeId(1),
            title: "Advanced Vocabulary Construction".to_string(),
            skill: Skill::Writing,
            difficulty: Difficulty::Hard,
            estimated_time: 15,
            is_completed: false,
            is_ai_tailored: true,
        },
        Challenge {
            id: ChallengeId(2),
            title: "Quick-fire Speaking Part 2".to_string(),
            skill: Skill::Speaking,
            difficulty: Difficulty::Medium,
            estimated_time: 10,
            is_completed: false,
            is_ai_tailored: true,
        },
    ]
}

pub fn badges() -> Vec<Badge> {
    vec![
        Badge {
            id: 1,
            name: "7 Day Streak".to_string(),
            description: "Maintained a 7-day learning streak".to_string(),
            icon: "🔥".to_string(),
            category: BadgeCategory::Streak,
            is_unlocked: true,
            progress: 7,
            target: 7,
        },
        Badge {
            id: 2,
            name: "30 Day Streak".to_string(),
            description: "Maintain a 30-day learning streak".to_string(),
            icon: "🏆".to_string(),
            category: BadgeCategory::Streak,
            is_unlocked: false,
            progress: 12,
            target: 30,
        },
        Badge {
            id: 3,
            name: "Grammar Guru".to_string(),
            description: "Score 90%+ in 5 grammar tests".to_string(),
            icon: "📚".to_string(),
            category: BadgeCategory::Score,
            is_unlocked: false,
            progress: 3,
            target: 5,
        },
    ]
}

/// Leaderboard rows in rank order.
pub fn leaderboard() -> Vec<LeaderboardEntry> {
    [
        ("Sarah J.", "Sarah", 9850, 98),
        ("Mike T.", "Mike", 9720, 95),
        ("Alex Chen", "Alex", 9680, 84),
        ("Emma W.", "Emma", 8540, 78),
        ("David L.", "David", 8200, 72),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, avatar_seed, score, momentum), rank)| LeaderboardEntry {
        id: rank,
        name: name.to_string(),
        rank,
        score,
        momentum,
        avatar: Some(avatar_url(avatar_seed)),
    })
    .collect()
}
