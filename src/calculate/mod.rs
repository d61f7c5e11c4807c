//! Statistics calculation engine.
//!
//! Computes derived metrics from recorded games:
//! - Player and team tallies, win-rate rankings
//! - Current and longest streaks
//! - Session (meetup) segmentation and rank movement across sessions
//! - Minimal rank-up conditions
//! - Dashboard events and the yearly recap
//!
//! Everything here is pure: inputs are borrowed record slices, outputs are
//! freshly built values.

pub mod events;
pub mod rank_change;
pub mod rank_up;
pub mod ranking;
pub mod recap;
pub mod session;
pub mod streak;

pub use events::*;
pub use rank_change::*;
pub use rank_up::*;
pub use ranking::*;
pub use recap::*;
pub use session::*;
pub use streak::*;

use crate::models::{MatchRecord, PlayerId, PlayerTallies, TeamKey, TeamTallies, Tally, ROSTER};

/// Fold games into per-player tallies. Every roster member is present,
/// starting from 0/0.
pub fn player_tallies<'a, I>(matches: I) -> PlayerTallies
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut tallies: PlayerTallies = ROSTER.iter().map(|p| (*p, Tally::default())).collect();

    for m in matches {
        for p in &m.winning_team {
            tallies.entry(*p).or_default().record_win();
        }
        for p in &m.losing_team {
            tallies.entry(*p).or_default().record_loss();
        }
    }

    tallies
}

/// Fold games into per-team tallies. A team appears only once it has played.
pub fn team_tallies<'a, I>(matches: I) -> TeamTallies
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut tallies = TeamTallies::new();

    for m in matches {
        tallies.entry(m.winning_key()).or_default().record_win();
        tallies.entry(m.losing_key()).or_default().record_loss();
    }

    tallies
}

/// Player and team tallies in one call.
pub fn aggregate(matches: &[MatchRecord]) -> (PlayerTallies, TeamTallies) {
    (player_tallies(matches), team_tallies(matches))
}

/// Games ordered oldest first. Games with equal timestamps keep input order.
pub fn chronological(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| m.created_at);
    sorted
}

/// The games a player took part in, oldest first, with whether they won.
pub fn player_history<'a>(player: PlayerId, sorted: &[&'a MatchRecord]) -> Vec<(&'a MatchRecord, bool)> {
    sorted
        .iter()
        .filter_map(|m| m.outcome_for(player).map(|won| (*m, won)))
        .collect()
}

/// The games a team played together, oldest first, with whether it won.
pub fn team_history<'a>(team: TeamKey, sorted: &[&'a MatchRecord]) -> Vec<(&'a MatchRecord, bool)> {
    sorted
        .iter()
        .filter_map(|m| m.team_outcome(team).map(|won| (*m, won)))
        .collect()
}

/// Just the win/loss flags of a history.
pub fn outcomes(history: &[(&MatchRecord, bool)]) -> Vec<bool> {
    history.iter().map(|(_, won)| *won).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::models::{MatchRecord, PlayerId};

    pub use PlayerId::{Ji as C, Jab as A, Kyu as B, Meo as D, Woong as E};

    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    /// A game `minutes` after the base time.
    pub fn game_at(w: [PlayerId; 2], l: [PlayerId; 2], minutes: i64) -> MatchRecord {
        MatchRecord::new(w, l, base_time() + Duration::minutes(minutes))
    }

    /// Games one minute apart, in the given order.
    pub fn games(specs: &[([PlayerId; 2], [PlayerId; 2])]) -> Vec<MatchRecord> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (w, l))| game_at(*w, *l, i as i64))
            .collect()
    }
}
