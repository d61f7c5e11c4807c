//! Session (meetup) segmentation.
//!
//! Games are grouped into sessions: a new session starts whenever more than
//! [`SESSION_GAP_DAYS`] pass between two consecutive games.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::{chronological, player_tallies, rank_by_win_rate, rank_of};
use crate::models::{local_date, MatchId, MatchRecord, PlayerId, ROSTER, ROSTER_SIZE};

/// Gap between consecutive games that starts a new session.
pub const SESSION_GAP_DAYS: i64 = 7;

/// Rank given to a player with no games in the ranked scope.
pub const ABSENT_RANK: u32 = ROSTER_SIZE as u32;

/// One session of consecutive play.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 1-based position in chronological order
    pub index: usize,

    /// Local year and month of the first game
    pub year: i32,
    pub month: u32,

    /// Local calendar dates of the first and last game (inclusive)
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Ranks from this session's games only
    pub session_ranks: BTreeMap<PlayerId, u32>,

    /// Ranks from every game up to and including this session
    pub cumulative_ranks: BTreeMap<PlayerId, u32>,

    pub matches: Vec<MatchRecord>,
}

impl Session {
    pub fn cumulative_rank(&self, player: PlayerId) -> u32 {
        self.cumulative_ranks
            .get(&player)
            .copied()
            .unwrap_or(ABSENT_RANK)
    }

    pub fn session_rank(&self, player: PlayerId) -> u32 {
        self.session_ranks.get(&player).copied().unwrap_or(ABSENT_RANK)
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.matches.iter().any(|m| &m.id == id)
    }
}

/// Split chronologically sorted games wherever the gap to the previous game
/// exceeds the session gap. A gap of exactly the session gap stays together.
pub fn split_sessions<'a>(sorted: &[&'a MatchRecord]) -> Vec<Vec<&'a MatchRecord>> {
    let gap = Duration::days(SESSION_GAP_DAYS);
    let mut sessions = Vec::new();
    let mut current: Vec<&'a MatchRecord> = Vec::new();

    for m in sorted {
        if let Some(prev) = current.last() {
            if m.created_at - prev.created_at > gap {
                sessions.push(std::mem::take(&mut current));
            }
        }
        current.push(*m);
    }

    if !current.is_empty() {
        sessions.push(current);
    }
    sessions
}

/// Ranks of every roster member over `matches`. Players with no games there
/// get [`ABSENT_RANK`].
pub fn roster_ranks<'a, I>(matches: I) -> BTreeMap<PlayerId, u32>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let tallies = player_tallies(matches);
    let ranking = rank_by_win_rate(
        tallies
            .iter()
            .filter(|(_, t)| t.total > 0)
            .map(|(p, t)| (*p, *t)),
    );

    ROSTER
        .iter()
        .map(|p| (*p, rank_of(&ranking, p).unwrap_or(ABSENT_RANK)))
        .collect()
}

/// Group games into sessions with per-session and cumulative ranks.
/// Input order does not matter.
pub fn segment_sessions(matches: &[MatchRecord]) -> Vec<Session> {
    let sorted = chronological(matches);
    let groups = split_sessions(&sorted);

    let mut sessions = Vec::with_capacity(groups.len());
    let mut cumulative: Vec<&MatchRecord> = Vec::with_capacity(sorted.len());

    for (i, group) in groups.into_iter().enumerate() {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let start_date = local_date(first.created_at);
        let end_date = local_date(last.created_at);

        cumulative.extend(group.iter().copied());

        sessions.push(Session {
            index: i + 1,
            year: start_date.year(),
            month: start_date.month(),
            start_date,
            end_date,
            session_ranks: roster_ranks(group.iter().copied()),
            cumulative_ranks: roster_ranks(cumulative.iter().copied()),
            matches: group.into_iter().cloned().collect(),
        });
    }

    debug!(
        "Segmented {} games into {} sessions",
        matches.len(),
        sessions.len()
    );
    sessions
}

/// 1-based index of the session holding the game, or 0 if none does.
pub fn session_index_of(sessions: &[Session], id: &MatchId) -> usize {
    sessions
        .iter()
        .find(|s| s.contains(id))
        .map(|s| s.index)
        .unwrap_or(0)
}
