use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::api::routes::{load_games, load_penalties, WindowParams};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    player_tallies, rank_by_win_rate, rank_by_wins, rank_up_conditions, team_tallies,
    RankUpCondition,
};
use crate::models::{available_years, round_rate, PlayerId, TeamKey, Tally, ROSTER};
use crate::storage;

#[derive(Debug, Serialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWinrateRow {
    pub rank: u32,
    pub player: PlayerId,
    pub display_name: &'static str,
    pub winrate: f64,
    pub wins: u32,
    pub total: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWinrateRow {
    pub rank: u32,
    pub team: &'static str,
    pub team_key: TeamKey,
    pub winrate: f64,
    pub wins: u32,
    pub total: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWinsRow {
    pub rank: u32,
    pub player: PlayerId,
    pub display_name: &'static str,
    pub wins: u32,
    pub winrate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_games: usize,
    pub player_winrates: Vec<PlayerWinrateRow>,
    pub team_winrates: Vec<TeamWinrateRow>,
    pub player_wins: Vec<PlayerWinsRow>,
    pub penalty_counts: BTreeMap<PlayerId, u32>,
}

#[derive(Debug, Serialize)]
pub struct RankUpResponse {
    pub conditions: Vec<RankUpCondition>,
}

fn rate(tally: &Tally) -> f64 {
    round_rate(tally.win_rate())
}

/// Years that have at least one game, newest first.
pub async fn list_years(State(state): State<AppState>) -> Result<Json<YearsResponse>, ApiError> {
    let games = storage::read_games(&state.storage)?;
    let years = available_years(games.iter().map(|g| g.created_at));
    Ok(Json(YearsResponse { years }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let window = params.window();
    let games = load_games(&state, window)?;
    let penalties = load_penalties(&state, window)?;
    debug!(
        "Computing stats over {} games and {} penalties",
        games.len(),
        penalties.len()
    );

    let players = player_tallies(&games);
    let teams = team_tallies(&games);

    let player_winrates = rank_by_win_rate(players.clone())
        .into_iter()
        .map(|row| PlayerWinrateRow {
            rank: row.rank,
            player: row.entity,
            display_name: row.entity.display_name(),
            winrate: rate(&row.tally),
            wins: row.tally.wins,
            total: row.tally.total,
        })
        .collect();

    let team_winrates = rank_by_win_rate(teams)
        .into_iter()
        .map(|row| TeamWinrateRow {
            rank: row.rank,
            team: row.entity.display_name(),
            team_key: row.entity,
            winrate: rate(&row.tally),
            wins: row.tally.wins,
            total: row.tally.total,
        })
        .collect();

    let player_wins = rank_by_wins(players)
        .into_iter()
        .map(|row| PlayerWinsRow {
            rank: row.rank,
            player: row.entity,
            display_name: row.entity.display_name(),
            wins: row.tally.wins,
            winrate: rate(&row.tally),
        })
        .collect();

    let mut penalty_counts: BTreeMap<PlayerId, u32> = ROSTER.iter().map(|p| (*p, 0)).collect();
    for p in &penalties {
        *penalty_counts.entry(p.player).or_default() += 1;
    }

    Ok(Json(StatsResponse {
        total_games: games.len(),
        player_winrates,
        team_winrates,
        player_wins,
        penalty_counts,
    }))
}

/// What every player below first place needs to move up one spot.
pub async fn get_rank_up(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<RankUpResponse>, ApiError> {
    let games = load_games(&state, params.window())?;
    let ranking = rank_by_win_rate(player_tallies(&games));
    let conditions = rank_up_conditions(&ranking, state.stats.rank_up_search_cap);
    Ok(Json(RankUpResponse { conditions }))
}
