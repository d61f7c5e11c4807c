use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::api::routes::{load_penalties, WindowParams};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewPenalty, PenaltyId, PenaltyRecord};
use crate::storage;

#[derive(Debug, Serialize)]
pub struct PenaltyListResponse {
    pub penalties: Vec<PenaltyRecord>,
}

pub async fn list_penalties(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<PenaltyListResponse>, ApiError> {
    let penalties = load_penalties(&state, params.window())?;
    Ok(Json(PenaltyListResponse { penalties }))
}

pub async fn create_penalty(
    State(state): State<AppState>,
    Json(body): Json<NewPenalty>,
) -> Result<(StatusCode, Json<PenaltyRecord>), ApiError> {
    let record = body.into_record(Utc::now())?;

    let _guard = state.write_lock.lock().await;
    storage::append_penalty(&state.storage, &record)?;
    info!("Recorded penalty {} for {}", record.id, record.player);

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_penalty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PenaltyRecord>, ApiError> {
    let id: PenaltyId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Penalty '{}' not found", id)))?;
    let _guard = state.write_lock.lock().await;

    let removed = storage::remove_penalty(&state.storage, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Penalty '{}' not found", id)))?;
    info!("Deleted penalty {}", removed.id);

    Ok(Json(removed))
}
