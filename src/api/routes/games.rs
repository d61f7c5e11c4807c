use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::api::routes::{load_games, WindowParams};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchId, MatchRecord, NewGame};
use crate::storage;

#[derive(Debug, Serialize)]
pub struct GameListResponse {
    pub games: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: usize,
}

/// List games newest first, optionally restricted to a year or date range.
pub async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<GameListResponse>, ApiError> {
    let games = load_games(&state, params.window())?;
    Ok(Json(GameListResponse { games }))
}

pub async fn create_game(
    State(state): State<AppState>,
    Json(body): Json<NewGame>,
) -> Result<(StatusCode, Json<MatchRecord>), ApiError> {
    let record = body.into_record(Utc::now())?;

    let _guard = state.write_lock.lock().await;
    storage::append_game(&state.storage, &record)?;
    info!(
        "Recorded game {} ({} beat {})",
        record.id,
        record.winning_key(),
        record.losing_key()
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete one game. Games at or past the delete window are locked.
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchRecord>, ApiError> {
    let id: MatchId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Game '{}' not found", id)))?;
    let _guard = state.write_lock.lock().await;

    let game = storage::read_games_where(&state.storage, |g| g.id == id)?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("Game '{}' not found", id)))?;

    let age_days = (Utc::now() - game.created_at).num_days();
    if age_days >= state.stats.delete_window_days {
        return Err(ApiError::Forbidden(format!(
            "Games older than {} days cannot be deleted",
            state.stats.delete_window_days
        )));
    }

    let removed = storage::remove_game(&state.storage, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Game '{}' not found", id)))?;
    info!("Deleted game {}", removed.id);

    Ok(Json(removed))
}

/// Delete every game.
pub async fn clear_games(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let deleted = storage::clear_games(&state.storage)?;
    info!("Cleared {} games", deleted);
    Ok(Json(ClearResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::routes::test_support::*;
    use crate::models::PlayerId;
    use chrono::{Duration, TimeZone};

    fn game_days_ago(days: i64) -> MatchRecord {
        MatchRecord::new(
            [PlayerId::Jab, PlayerId::Kyu],
            [PlayerId::Ji, PlayerId::Meo],
            Utc::now() - Duration::days(days),
        )
    }

    #[tokio::test]
    async fn test_create_and_list_games() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());

        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/games",
            r#"{"winningTeam":["잡","큐"],"losingTeam":["지","머"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["winningTeam"], serde_json::json!(["잡", "큐"]));
        assert!(json["id"].is_string());

        let (status, json) = get_json(build_router(state), "/api/games").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["games"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_game_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());

        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/games",
            r#"{"winningTeam":["잡","잡"],"losingTeam":["지","머"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, _) = post_json(
            build_router(state.clone()),
            "/api/games",
            r#"{"winningTeam":["잡","X"],"losingTeam":["지","머"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(build_router(state.clone()), "/api/games", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Nothing was written
        assert!(storage::read_games(&state.storage).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_games_by_year_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        let w = [PlayerId::Jab, PlayerId::Kyu];
        let l = [PlayerId::Ji, PlayerId::Woong];
        seed_games(
            &state,
            &[
                MatchRecord::new(w, l, Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()),
                MatchRecord::new(w, l, Utc.with_ymd_and_hms(2025, 2, 1, 3, 0, 0).unwrap()),
                MatchRecord::new(w, l, Utc.with_ymd_and_hms(2025, 5, 1, 3, 0, 0).unwrap()),
            ],
        );

        let (status, json) = get_json(build_router(state), "/api/games?year=2025").await;
        assert_eq!(status, StatusCode::OK);
        let games = json["games"].as_array().unwrap();
        assert_eq!(games.len(), 2);
        assert!(games[0]["createdAt"].as_str().unwrap().starts_with("2025-05-01"));
        assert!(games[1]["createdAt"].as_str().unwrap().starts_with("2025-02-01"));
    }

    #[tokio::test]
    async fn test_delete_recent_game() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        let game = game_days_ago(1);
        seed_games(&state, &[game.clone()]);

        let uri = format!("/api/games/{}", game.id);
        let (status, json) = delete_json(build_router(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], game.id.as_str());
        assert!(storage::read_games(&state.storage).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_old_game_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        let game = game_days_ago(30);
        seed_games(&state, &[game.clone()]);

        let uri = format!("/api/games/{}", game.id);
        let (status, json) = delete_json(build_router(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "FORBIDDEN");
        assert_eq!(storage::read_games(&state.storage).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_game() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());

        let (status, _) = delete_json(build_router(state.clone()), "/api/games/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            delete_json(build_router(state), "/api/games/0123456789abcdef").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_games() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        seed_games(&state, &[game_days_ago(1), game_days_ago(40)]);

        let (status, json) = delete_json(build_router(state.clone()), "/api/games").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], 2);
        assert!(storage::read_games(&state.storage).unwrap().is_empty());
    }
}
