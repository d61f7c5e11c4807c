use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::api::routes::load_games;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{recap, Recap};
use crate::models::TimeWindow;

/// Year-in-review for one local calendar year.
pub async fn get_recap(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Recap>, ApiError> {
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid year '{}'", year)))?;
    let window = TimeWindow::for_year(year)
        .ok_or_else(|| ApiError::BadRequest(format!("Year {} is out of range", year)))?;

    let games = load_games(&state, Some(window))?;
    debug!("Building {} recap from {} games", year, games.len());

    recap(&games, year)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No games recorded in {}", year)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::*;
    use crate::calculate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_recap_for_year() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        seed_games(
            &state,
            &games(&[([A, B], [C, D]), ([A, B], [C, E]), ([C, D], [A, E])]),
        );

        let (status, json) = get_json(build_router(state), "/api/recap/2025").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["year"], 2025);
        assert_eq!(json["totalGames"], 3);
        assert_eq!(json["totalSessions"], 1);
    }

    #[tokio::test]
    async fn test_recap_empty_year_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());
        seed_games(&state, &games(&[([A, B], [C, D])]));

        let (status, json) = get_json(build_router(state), "/api/recap/2019").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_recap_bad_year() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path());

        let (status, _) = get_json(build_router(state), "/api/recap/twenty").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
