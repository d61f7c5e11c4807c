use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::routes::load_games;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{detect_events, top_events, DashboardEvent};
use crate::models::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventView {
    /// One rotating banner
    #[default]
    Banner,
    Carousel,
}

impl FromStr for EventView {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banner" => Ok(EventView::Banner),
            "carousel" => Ok(EventView::Carousel),
            other => Err(ApiError::BadRequest(format!("Unknown view '{}'", other))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsParams {
    pub view: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub view: EventView,
    pub events: Vec<DashboardEvent>,
}

/// Top dashboard events, sized for the requested view.
pub async fn get_events(
    State(state): State<AppState>,
    Query(params): Query<EventsParams>,
) -> Result<Json<EventsResponse>, ApiError> {
    let view = match params.view.as_deref() {
        Some(v) => v.parse()?,
        None => EventView::default(),
    };
    let limit = match view {
        EventView::Banner => state.stats.banner_event_limit,
        EventView::Carousel => state.stats.carousel_event_limit,
    };

    let window = TimeWindow::from_params(params.year.as_deref(), None, None);
    let games = load_games(&state, window)?;
    let events = top_events(detect_events(&games), limit);

    Ok(Json(EventsResponse { view, events }))
}
