use core::fmt;

use serde::{Deserialize, Serialize};

use super::{non_null, nullable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single "current user" profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub target_band: String,
    pub current_streak: Option<i32>,
    pub momentum_score: Option<i32>,
    pub avatar: Option<String>,
    pub weaknesses: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
}

/// Partial update payload for [`User`].
///
/// Required columns reject `null`; nullable columns are double-wrapped so that
/// `{"avatar": null}` clears the avatar while a missing `avatar` key leaves it alone. Unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub target_band: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_streak: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub momentum_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub avatar: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub weaknesses: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Option<Option<Vec<String>>>,
}

impl User {
    /// Merges every provided field of `patch` over `self`.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(target_band) = patch.target_band {
            self.target_band = target_band;
        }
        if let Some(current_streak) = patch.current_streak {
            self.current_streak = current_streak;
        }
        if let Some(momentum_score) = patch.momentum_score {
            self.momentum_score = momentum_score;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(weaknesses) = patch.weaknesses {
            self.weaknesses = weaknesses;
        }
        if let Some(strengths) = patch.strengths {
            self.strengths = strengths;
        }
    }
}
