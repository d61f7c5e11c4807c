//! Rank movement across sessions.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Session;
use crate::models::{PlayerId, ROSTER};

/// A player's biggest single-step cumulative rank movement.
///
/// `change` is positive for a rise and negative for a fall. `best` and
/// `worst` are the ranks on either side of that step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankChange {
    pub best: u32,
    pub worst: u32,
    pub change: i32,
    pub best_session: Option<usize>,
    pub worst_session: Option<usize>,
    /// Cumulative rank after the first and last session
    pub early: u32,
    pub late: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankChangeReport {
    pub changes: BTreeMap<PlayerId, RankChange>,
    pub first_session: Option<usize>,
    pub last_session: Option<usize>,
}

/// Largest rise and largest fall between consecutive sessions, per player.
///
/// Rise and fall are tracked independently over the whole scan; the larger
/// magnitude is reported and a fall wins an exact tie. A player who never
/// moves reports the last/first ranks as best/worst.
pub fn rank_changes(sessions: &[Session]) -> RankChangeReport {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.start_date);

    let (Some(first), Some(last)) = (ordered.first().copied(), ordered.last().copied()) else {
        return RankChangeReport::default();
    };

    let changes = ROSTER
        .iter()
        .map(|&player| (player, player_change(player, &ordered, first, last)))
        .collect();

    RankChangeReport {
        changes,
        first_session: Some(first.index),
        last_session: Some(last.index),
    }
}

fn player_change(player: PlayerId, ordered: &[&Session], first: &Session, last: &Session) -> RankChange {
    let mut max_rise = 0i32;
    let mut max_fall = 0i32;
    let mut rise: Option<(&Session, &Session)> = None;
    let mut fall: Option<(&Session, &Session)> = None;

    for pair in ordered.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let delta = prev.cumulative_rank(player) as i32 - next.cumulative_rank(player) as i32;

        if delta > max_rise {
            max_rise = delta;
            rise = Some((prev, next));
        }
        if delta < max_fall {
            max_fall = delta;
            fall = Some((prev, next));
        }
    }

    let early = first.cumulative_rank(player);
    let late = last.cumulative_rank(player);

    match (fall, rise) {
        (Some((from, to)), _) if max_fall.abs() > max_rise => RankChange {
            best: from.cumulative_rank(player),
            worst: to.cumulative_rank(player),
            change: max_fall,
            best_session: Some(from.index),
            worst_session: Some(to.index),
            early,
            late,
        },
        (_, Some((from, to))) if max_rise > 0 => RankChange {
            best: to.cumulative_rank(player),
            worst: from.cumulative_rank(player),
            change: max_rise,
            best_session: Some(to.index),
            worst_session: Some(from.index),
            early,
            late,
        },
        _ => RankChange {
            best: late,
            worst: early,
            change: early as i32 - late as i32,
            best_session: Some(last.index),
            worst_session: Some(first.index),
            early,
            late,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::segment_sessions;
    use crate::calculate::test_support::*;
    use crate::models::MatchRecord;

    const DAY: i64 = 60 * 24;

    /// Three sessions ten days apart.
    fn three_sessions() -> Vec<MatchRecord> {
        vec![
            // Session 1: A,B 1/1; C,D 0/1; E absent
            game_at([A, B], [C, D], 0),
            // Session 2: cumulative B 1/1, E 1/1, A 1/2, C 1/2, D 0/2
            game_at([C, E], [A, D], 10 * DAY),
            // Session 3: cumulative E 3/3, C 2/3, B 1/3, D 1/3, A 1/4
            game_at([C, E], [A, B], 20 * DAY),
            game_at([D, E], [A, B], 20 * DAY + 1),
        ]
    }

    #[test]
    fn test_rise_and_fall() {
        let sessions = segment_sessions(&three_sessions());
        assert_eq!(sessions.len(), 3);

        // E cumulative ranks: 5 -> 1 -> 1
        assert_eq!(sessions[0].cumulative_rank(E), 5);
        assert_eq!(sessions[1].cumulative_rank(E), 1);

        let report = rank_changes(&sessions);
        assert_eq!(report.first_session, Some(1));
        assert_eq!(report.last_session, Some(3));

        let e = report.changes[&E];
        assert_eq!(e.change, 4);
        assert_eq!(e.best, 1);
        assert_eq!(e.worst, 5);
        assert_eq!(e.best_session, Some(2));
        assert_eq!(e.worst_session, Some(1));
        assert_eq!((e.early, e.late), (5, 1));

        // A cumulative ranks: 1 -> 3 -> 5; the first fall of 2 is kept
        let a = report.changes[&A];
        assert_eq!(a.change, -2);
        assert_eq!(a.best, 1);
        assert_eq!(a.worst, 3);
        assert_eq!(a.best_session, Some(1));
        assert_eq!(a.worst_session, Some(2));
    }

    /// A bare session carrying only cumulative ranks in roster order.
    fn ranked_session(index: usize, ranks: [u32; 5]) -> Session {
        let start_date = base_time().date_naive() + chrono::Duration::days(10 * index as i64);
        let cumulative_ranks: BTreeMap<PlayerId, u32> = ROSTER.iter().copied().zip(ranks).collect();
        Session {
            index,
            year: 2025,
            month: 3,
            start_date,
            end_date: start_date,
            session_ranks: cumulative_ranks.clone(),
            cumulative_ranks,
            matches: Vec::new(),
        }
    }

    #[test]
    fn test_rise_wins_tie() {
        // B: 1 -> 3 -> 1, a fall and a rise of equal size
        let sessions = vec![
            ranked_session(1, [2, 1, 3, 4, 5]),
            ranked_session(2, [1, 3, 2, 4, 5]),
            ranked_session(3, [2, 1, 3, 4, 5]),
        ];
        let b = rank_changes(&sessions).changes[&B];
        assert_eq!(b.change, 2);
        assert_eq!(b.best, 1);
        assert_eq!(b.worst, 3);
        assert_eq!(b.best_session, Some(3));
        assert_eq!(b.worst_session, Some(2));
    }

    #[test]
    fn test_larger_rise_beats_smaller_fall() {
        // D: 4 -> 5 -> 2
        let sessions = vec![
            ranked_session(1, [1, 2, 3, 4, 5]),
            ranked_session(2, [1, 2, 3, 5, 4]),
            ranked_session(3, [1, 3, 4, 2, 5]),
        ];
        let d = rank_changes(&sessions).changes[&D];
        assert_eq!(d.change, 3);
        assert_eq!(d.best, 2);
        assert_eq!(d.worst, 5);
        assert_eq!(d.best_session, Some(3));
        assert_eq!(d.worst_session, Some(2));
        assert_eq!((d.early, d.late), (4, 2));
    }

    #[test]
    fn test_sessions_ordered_by_start_date() {
        let sessions = vec![
            ranked_session(2, [1, 2, 3, 4, 5]),
            ranked_session(1, [5, 2, 3, 4, 1]),
        ];
        let report = rank_changes(&sessions);
        assert_eq!(report.first_session, Some(1));
        assert_eq!(report.last_session, Some(2));
        assert_eq!(report.changes[&A].change, 4);
    }

    #[test]
    fn test_single_session_has_no_movement() {
        let sessions = segment_sessions(&[game_at([A, B], [C, D], 0)]);
        let report = rank_changes(&sessions);
        let c = report.changes[&C];
        assert_eq!(c.change, 0);
        assert_eq!(c.best, c.late);
        assert_eq!(c.worst, c.early);
        assert_eq!(c.best_session, Some(1));
    }

    #[test]
    fn test_no_sessions() {
        let report = rank_changes(&[]);
        assert!(report.changes.is_empty());
        assert_eq!(report.first_session, None);
    }
}
