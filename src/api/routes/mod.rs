pub mod dashboard;
pub mod games;
pub mod penalties;
pub mod recap;
pub mod stats;

use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchRecord, PenaltyRecord, TimeWindow};
use crate::storage::{read_games, read_games_where, read_penalties, read_penalties_where};

/// `?year=` or `?startDate=&endDate=` (local calendar dates).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowParams {
    pub year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WindowParams {
    /// A year wins over a date range; unparseable values mean no filter.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::from_params(
            self.year.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

/// Games inside `window` (all games when `None`), newest first.
pub(crate) fn load_games(
    state: &AppState,
    window: Option<TimeWindow>,
) -> Result<Vec<MatchRecord>, ApiError> {
    let mut games = match window {
        Some(w) => read_games_where(&state.storage, |g| w.contains(g.created_at))?,
        None => read_games(&state.storage)?,
    };
    games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(games)
}

/// Penalties inside `window` (all when `None`), newest first.
pub(crate) fn load_penalties(
    state: &AppState,
    window: Option<TimeWindow>,
) -> Result<Vec<PenaltyRecord>, ApiError> {
    let mut penalties = match window {
        Some(w) => read_penalties_where(&state.storage, |p| w.contains(p.created_at))?,
        None => read_penalties(&state.storage)?,
    };
    penalties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(penalties)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::models::{MatchRecord, PenaltyRecord};
    use crate::storage::{append_game, append_penalty};

    pub fn setup_test_state(dir: &std::path::Path) -> AppState {
        let config = AppConfig {
            data_dir: dir.to_path_buf(),
            ..AppConfig::default()
        };
        AppState::new(&config)
    }

    pub fn seed_games(state: &AppState, games: &[MatchRecord]) {
        for g in games {
            append_game(&state.storage, g).unwrap();
        }
    }

    pub fn seed_penalties(state: &AppState, penalties: &[PenaltyRecord]) {
        for p in penalties {
            append_penalty(&state.storage, p).unwrap();
        }
    }

    async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::api::build_router;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(dir.path()));

        let (status, _) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_window_params() {
        let params = super::WindowParams {
            year: Some("2025".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
        };
        let w = params.window().unwrap();
        assert_eq!(w, crate::models::TimeWindow::for_year(2025).unwrap());

        let params = super::WindowParams {
            year: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(params.window().is_none());
    }
}
