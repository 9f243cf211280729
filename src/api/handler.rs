use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::analysis::AnalysisResponse;
use crate::api::contract;
use crate::api::extract::Validated;
use crate::api::server::{AppState, JsonResult, RouteError};
use crate::db::prelude::*;

#[instrument(skip(state))]
pub async fn get_user(State(state): State<Arc<AppState>>) -> Json<User> {
    Json(state.storage.get_user().await)
}

#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Validated(patch): Validated<UserPatch>,
) -> JsonResult<User> {
    Ok(Json(state.storage.update_user(patch).await))
}

#[instrument(skip(state))]
pub async fn list_activities(State(state): State<Arc<AppState>>) -> Json<Vec<Activity>> {
    Json(state.storage.get_activities().await)
}

#[instrument(skip(state))]
pub async fn daily_challenges(State(state): State<Arc<AppState>>) -> Json<Vec<Challenge>> {
    Json(state.storage.get_daily_challenges().await)
}

/// The id is read from its leading integer (`1abc` names challenge 1); an id with no leading
/// integer can't name any challenge, so it is reported as not found.
#[instrument(skip(state))]
pub async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> JsonResult<Challenge> {
    let challenge_id = leading_int(&id)
        .map(ChallengeId::from)
        .ok_or_else(|| RouteError::ChallengeNotFound(id.clone()))?;

    let challenge = state.storage.complete_challenge(challenge_id).await?;
    tracing::info!(
        url = %contract::CHALLENGES_COMPLETE.url(&[("id", challenge.id)]),
        title = %challenge.title,
        "challenge completed"
    );

    Ok(Json(challenge))
}

#[instrument(skip(state))]
pub async fn list_badges(State(state): State<Arc<AppState>>) -> Json<Vec<Badge>> {
    Json(state.storage.get_badges().await)
}

#[instrument(skip(state))]
pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.storage.get_leaderboard().await)
}

/// The upload body is never inspected.
#[instrument(skip(state))]
pub async fn upload_test(State(state): State<Arc<AppState>>) -> Json<AnalysisResponse> {
    Json(state.analyzer.analyze().await)
}

/// Integer prefix of `raw`: leading whitespace and one sign are skipped, a `0x` prefix switches
/// to hex, and parsing stops at the first non-digit.
fn leading_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };

    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let magnitude = i64::from_str_radix(body.get(..end).filter(|d| !d.is_empty())?, radix).ok()?;

    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("2"), Some(2));
        assert_eq!(leading_int("1abc"), Some(1));
        assert_eq!(leading_int("  7 "), Some(7));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("+4x"), Some(4));
        assert_eq!(leading_int("0x1f"), Some(31));
        assert_eq!(leading_int("1e3"), Some(1));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("0x"), None);
        assert_eq!(leading_int("99999999999"), None);
    }
}
