use thiserror::Error;

use crate::db::models::challenge::ChallengeId;

pub mod models;
pub mod seed;
pub mod storage;

pub mod prelude {
    pub use crate::db::models::activity::Activity;
    pub use crate::db::models::badge::Badge;
    pub use crate::db::models::challenge::{Challenge, ChallengeId};
    pub use crate::db::models::leaderboard::LeaderboardEntry;
    pub use crate::db::models::user::{User, UserPatch};

    pub use crate::db::storage::{MemStorage, Storage};
    pub use crate::db::{StoreError, StoreResult};
}

pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("challenge '{0}' not found")]
    ChallengeNotFound(ChallengeId),
}
