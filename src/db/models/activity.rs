use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::millis;
use super::user::UserId;

/// Highest heatmap intensity bucket; intensities run `0..=MAX_INTENSITY`.
pub const MAX_INTENSITY: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Practice,
    Test,
    Challenge,
}

/// A single heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub user_id: UserId,
    #[serde(serialize_with = "millis")]
    pub date: DateTime<Utc>,
    pub intensity: u8,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub score: Option<i32>,
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_date_has_millisecond_precision() {
        let date = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let activity = Activity {
            id: 0,
            user_id: UserId(1),
            date,
            intensity: 2,
            kind: ActivityKind::Practice,
            score: None,
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["date"], "2026-02-01T08:00:00.123Z");

        let parsed: Activity = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.date.timestamp_millis(), date.timestamp_millis());
    }
}
