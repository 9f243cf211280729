use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: i32,
    pub name: String,
    pub rank: i32,
    pub score: i32,
    pub momentum: i32,
    pub avatar: Option<String>,
}
