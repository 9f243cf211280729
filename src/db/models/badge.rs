use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Streak,
    Score,
    Activity,
}

/// Achievement badge; `progress` counts towards `target` but is never clamped to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    pub is_unlocked: bool,
    pub progress: i32,
    pub target: i32,
}
