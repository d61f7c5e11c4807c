//! Year-in-review summary.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::{
    chronological, max_streaks, outcomes, player_history, player_tallies, rank_by_win_rate,
    rank_changes, segment_sessions, session_index_of, team_history, team_tallies, RankChangeReport,
    Session,
};
use crate::models::{local_month, round_rate, MatchRecord, PlayerId, TeamKey, Tally, ROSTER};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub display_name: &'static str,
    pub winrate: f64,
    pub wins: u32,
    pub total: u32,
}

impl PlayerSummary {
    fn new(player: PlayerId, tally: Tally) -> Self {
        Self {
            player,
            display_name: player.display_name(),
            winrate: round_rate(tally.win_rate()),
            wins: tally.wins,
            total: tally.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team: &'static str,
    pub team_key: TeamKey,
    pub winrate: f64,
    pub wins: u32,
    pub total: u32,
}

impl TeamSummary {
    fn new(team: TeamKey, tally: Tally) -> Self {
        Self {
            team: team.display_name(),
            team_key: team,
            winrate: round_rate(tally.win_rate()),
            wins: tally.wins,
            total: tally.total,
        }
    }
}

/// Longest runs of one entity, with the 1-based session in which each
/// maximum was first reached (0 when there is none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord<K> {
    pub entity: K,
    pub max_win_streak: u32,
    pub max_lose_streak: u32,
    pub max_win_streak_session: usize,
    pub max_lose_streak_session: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recap {
    pub year: i32,
    pub total_games: usize,
    pub total_sessions: usize,
    pub best_player: Option<PlayerSummary>,
    pub worst_player: Option<PlayerSummary>,
    pub best_team: Option<TeamSummary>,
    pub max_win_streak_player: Option<StreakRecord<PlayerId>>,
    pub max_lose_streak_player: Option<StreakRecord<PlayerId>>,
    pub max_win_streak_team: Option<StreakRecord<TeamKey>>,
    pub max_lose_streak_team: Option<StreakRecord<TeamKey>>,
    pub player_streaks: Vec<StreakRecord<PlayerId>>,
    pub team_streaks: Vec<StreakRecord<TeamKey>>,
    pub rank_changes: RankChangeReport,
    pub sessions: Vec<Session>,
    pub most_played_team: Option<TeamSummary>,
    /// Games per local month (1-12); months without games are absent
    pub monthly_games: BTreeMap<u32, u32>,
    pub most_active_month: Option<MonthCount>,
}

/// Summarize one year's games. `matches` should already be limited to the
/// year; returns `None` when there are none.
pub fn recap(matches: &[MatchRecord], year: i32) -> Option<Recap> {
    if matches.is_empty() {
        return None;
    }

    let sorted = chronological(matches);
    let players = player_tallies(sorted.iter().copied());
    let teams = team_tallies(sorted.iter().copied());
    let player_ranking = rank_by_win_rate(players.iter().map(|(p, t)| (*p, *t)));
    let team_ranking = rank_by_win_rate(teams.iter().map(|(k, t)| (*k, *t)));
    let sessions = segment_sessions(matches);

    let streak_record = |history: Vec<(&MatchRecord, bool)>| {
        let flags = outcomes(&history);
        let max = max_streaks(&flags);
        let session_at = |at: Option<usize>| {
            at.map(|i| session_index_of(&sessions, &history[i].0.id))
                .unwrap_or(0)
        };
        (max, session_at(max.max_win_at), session_at(max.max_lose_at))
    };

    let player_streaks: Vec<StreakRecord<PlayerId>> = ROSTER
        .iter()
        .map(|&player| {
            let (max, win_session, lose_session) = streak_record(player_history(player, &sorted));
            StreakRecord {
                entity: player,
                max_win_streak: max.max_win,
                max_lose_streak: max.max_lose,
                max_win_streak_session: win_session,
                max_lose_streak_session: lose_session,
            }
        })
        .collect();

    let team_streaks: Vec<StreakRecord<TeamKey>> = teams
        .keys()
        .map(|&team| {
            let (max, win_session, lose_session) = streak_record(team_history(team, &sorted));
            StreakRecord {
                entity: team,
                max_win_streak: max.max_win,
                max_lose_streak: max.max_lose,
                max_win_streak_session: win_session,
                max_lose_streak_session: lose_session,
            }
        })
        .collect();

    let mut most_played: Vec<(TeamKey, Tally)> = teams.iter().map(|(k, t)| (*k, *t)).collect();
    most_played.sort_by(|a, b| b.1.total.cmp(&a.1.total));

    let mut monthly_games: BTreeMap<u32, u32> = BTreeMap::new();
    for m in &sorted {
        *monthly_games.entry(local_month(m.created_at)).or_default() += 1;
    }

    debug!(
        "Built {} recap from {} games in {} sessions",
        year,
        matches.len(),
        sessions.len()
    );

    Some(Recap {
        year,
        total_games: matches.len(),
        total_sessions: sessions.len(),
        best_player: player_ranking
            .first()
            .map(|r| PlayerSummary::new(r.entity, r.tally)),
        worst_player: player_ranking
            .last()
            .map(|r| PlayerSummary::new(r.entity, r.tally)),
        best_team: team_ranking
            .first()
            .map(|r| TeamSummary::new(r.entity, r.tally)),
        max_win_streak_player: first_max(&player_streaks, |s| s.max_win_streak),
        max_lose_streak_player: first_max(&player_streaks, |s| s.max_lose_streak),
        max_win_streak_team: first_max(&team_streaks, |s| s.max_win_streak),
        max_lose_streak_team: first_max(&team_streaks, |s| s.max_lose_streak),
        player_streaks,
        team_streaks,
        rank_changes: rank_changes(&sessions),
        most_played_team: most_played
            .first()
            .map(|(team, tally)| TeamSummary::new(*team, *tally)),
        most_active_month: most_active_month(&monthly_games),
        monthly_games,
        sessions,
    })
}

/// The first record holding the largest value.
fn first_max<K: Copy>(
    records: &[StreakRecord<K>],
    value: impl Fn(&StreakRecord<K>) -> u32,
) -> Option<StreakRecord<K>> {
    let mut best: Option<&StreakRecord<K>> = None;
    for r in records {
        if best.map_or(true, |b| value(r) > value(b)) {
            best = Some(r);
        }
    }
    best.copied()
}

/// Busiest month; the earliest month wins a tie.
fn most_active_month(monthly: &BTreeMap<u32, u32>) -> Option<MonthCount> {
    let mut best: Option<MonthCount> = None;
    for (&month, &count) in monthly {
        if best.map_or(true, |b| count > b.count) {
            best = Some(MonthCount { month, count });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_support::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const DAY: i64 = 60 * 24;

    fn year_of_games() -> Vec<MatchRecord> {
        vec![
            // Session 1 (March)
            game_at([A, B], [C, D], 0),
            game_at([A, B], [C, D], 1),
            game_at([A, B], [C, E], 2),
            // Session 2 (March, ten days later)
            game_at([C, D], [A, B], 10 * DAY),
            game_at([C, E], [A, D], 10 * DAY + 1),
            // Session 3 (April)
            game_at([A, B], [D, E], 40 * DAY),
        ]
    }

    #[test]
    fn test_recap_none_without_games() {
        assert!(recap(&[], 2025).is_none());
    }

    #[test]
    fn test_recap_totals_and_leaders() {
        let r = recap(&year_of_games(), 2025).unwrap();
        assert_eq!(r.year, 2025);
        assert_eq!(r.total_games, 6);
        assert_eq!(r.total_sessions, 3);
        assert_eq!(r.sessions.len(), 3);

        // B 4/5, A 4/6, C 2/5, E 1/3, D 1/5
        let best = r.best_player.unwrap();
        assert_eq!(best.player, B);
        assert_eq!(best.winrate, 80.0);
        assert_eq!(r.worst_player.unwrap().player, D);

        // A+B 4/5 ahead of C+E 1/2
        let best_team = r.best_team.unwrap();
        assert_eq!(best_team.team_key, TeamKey::new(A, B));
        assert_eq!(best_team.winrate, 80.0);

        let most_played = r.most_played_team.unwrap();
        assert_eq!(most_played.team_key, TeamKey::new(A, B));
        assert_eq!((most_played.wins, most_played.total), (4, 5));
    }

    #[test]
    fn test_recap_streaks_and_sessions() {
        let r = recap(&year_of_games(), 2025).unwrap();

        let a = r.player_streaks.iter().find(|s| s.entity == A).unwrap();
        assert_eq!(a.max_win_streak, 3);
        assert_eq!(a.max_win_streak_session, 1);
        assert_eq!(a.max_lose_streak, 2);
        assert_eq!(a.max_lose_streak_session, 2);

        // A reaches three straight wins before anyone else
        let top = r.max_win_streak_player.unwrap();
        assert_eq!((top.entity, top.max_win_streak), (A, 3));

        // C opens with three losses
        let worst = r.max_lose_streak_player.unwrap();
        assert_eq!((worst.entity, worst.max_lose_streak), (C, 3));
        assert_eq!(worst.max_lose_streak_session, 1);

        let team = r.max_win_streak_team.unwrap();
        assert_eq!(team.entity, TeamKey::new(A, B));
        assert_eq!(team.max_win_streak, 3);

        // Players without games report zero sessions
        let e_only = recap(&[game_at([A, B], [C, D], 0)], 2025).unwrap();
        let e = e_only.player_streaks.iter().find(|s| s.entity == E).unwrap();
        assert_eq!((e.max_win_streak, e.max_win_streak_session), (0, 0));
    }

    #[test]
    fn test_recap_months() {
        let r = recap(&year_of_games(), 2025).unwrap();
        assert_eq!(r.monthly_games, BTreeMap::from([(3, 5), (4, 1)]));
        assert_eq!(r.most_active_month, Some(MonthCount { month: 3, count: 5 }));
    }

    #[test]
    fn test_month_uses_local_calendar() {
        // 20:00 UTC on Jan 31 is Feb 1 local
        let ts = Utc.with_ymd_and_hms(2025, 1, 31, 20, 0, 0).unwrap();
        let games = vec![
            MatchRecord::new([A, B], [C, D], ts),
            MatchRecord::new([A, B], [C, D], ts - Duration::hours(12)),
        ];
        let r = recap(&games, 2025).unwrap();
        assert_eq!(r.monthly_games, BTreeMap::from([(1, 1), (2, 1)]));
        // Tie: the earlier month wins
        assert_eq!(r.most_active_month.unwrap().month, 1);
    }

    #[test]
    fn test_recap_serializes() {
        let r = recap(&year_of_games(), 2025).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["totalGames"], 6);
        assert_eq!(json["bestPlayer"]["player"], "큐");
        assert_eq!(json["monthlyGames"]["3"], 5);
        assert!(json["rankChanges"]["changes"]["잡"].is_object());
    }
}
