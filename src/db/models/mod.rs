use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub mod activity;
pub mod badge;
pub mod challenge;
pub mod leaderboard;
pub mod user;

/// Keeps an explicit `null` distinct from a missing key.
///
/// Pair with `#[serde(default)]` so that an absent key lands as `None` and `null` lands as
/// `Some(None)`.
pub(crate) fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Rejects `null` for keys that map onto non-nullable columns.
pub(crate) fn non_null<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

/// Writes timestamps as RFC 3339 with millisecond precision and a `Z` suffix
/// (`2026-02-01T08:00:00.000Z`).
pub(crate) fn millis<S>(date: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    ser.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
