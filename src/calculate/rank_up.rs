//! Minimal rank-up conditions.
//!
//! For a player and the player ranked directly above, finds the fewest extra
//! games (own wins plus the target's losses) after which the player would
//! place above the target.

use serde::Serialize;

use super::{outranks, Ranked};
use crate::models::{round_rate, PlayerId, Tally};

/// Default bound on the number of extra games searched.
pub const RANK_UP_SEARCH_CAP: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankUpStatus {
    /// Already places above the target; nothing is required
    AlreadyAhead,
    Reachable,
    /// No split within the search cap works
    Infeasible,
}

/// A tally as shown next to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TallySnapshot {
    pub wins: u32,
    pub total: u32,
    pub winrate: f64,
}

impl From<Tally> for TallySnapshot {
    fn from(t: Tally) -> Self {
        Self {
            wins: t.wins,
            total: t.total,
            winrate: round_rate(t.win_rate()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub current: TallySnapshot,
    pub target: TallySnapshot,
}

impl Projection {
    fn new(current: Tally, target: Tally) -> Self {
        Self {
            current: current.into(),
            target: target.into(),
        }
    }
}

/// Result of the overtake search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overtake {
    pub status: RankUpStatus,
    pub required_wins: u32,
    pub required_target_losses: u32,
    pub before: Projection,
    pub after: Projection,
}

/// [`minimal_overtake_within`] with the default search cap.
pub fn minimal_overtake(current: Tally, target: Tally) -> Overtake {
    minimal_overtake_within(current, target, RANK_UP_SEARCH_CAP)
}

/// Search extra-game totals `0..=cap` in increasing order; within a total,
/// try the player's extra wins from 0 upward with the rest as target losses.
/// The first split where the player outranks the target is returned, so the
/// combined count is minimal and, among those, own wins are fewest.
pub fn minimal_overtake_within(current: Tally, target: Tally, cap: u32) -> Overtake {
    let before = Projection::new(current, target);

    if outranks(&current, &target) {
        return Overtake {
            status: RankUpStatus::AlreadyAhead,
            required_wins: 0,
            required_target_losses: 0,
            before,
            after: before,
        };
    }

    for extra in 0..=cap {
        for wins in 0..=extra {
            let losses = extra - wins;
            let current_after = current.with_extra_wins(wins);
            let target_after = target.with_extra_losses(losses);

            if outranks(&current_after, &target_after) {
                return Overtake {
                    status: RankUpStatus::Reachable,
                    required_wins: wins,
                    required_target_losses: losses,
                    before,
                    after: Projection::new(current_after, target_after),
                };
            }
        }
    }

    Overtake {
        status: RankUpStatus::Infeasible,
        required_wins: 0,
        required_target_losses: 0,
        before,
        after: before,
    }
}

/// What one player needs to pass the player ranked above.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankUpCondition {
    pub player: PlayerId,
    pub target_player: PlayerId,
    pub current_rank: u32,
    pub target_rank: u32,
    #[serde(flatten)]
    pub overtake: Overtake,
    pub description: String,
}

/// One condition per ranked player below rank 1. The target is the nearest
/// row above with a strictly better rank, so tied players share a target.
pub fn rank_up_conditions(ranking: &[Ranked<PlayerId>], cap: u32) -> Vec<RankUpCondition> {
    ranking
        .iter()
        .enumerate()
        .filter(|(_, row)| row.rank > 1)
        .filter_map(|(i, row)| {
            let target = ranking[..i].iter().rev().find(|above| above.rank < row.rank)?;
            let overtake = minimal_overtake_within(row.tally, target.tally, cap);
            Some(RankUpCondition {
                player: row.entity,
                target_player: target.entity,
                current_rank: row.rank,
                target_rank: target.rank,
                description: describe(row.entity, target.entity, &overtake),
                overtake,
            })
        })
        .collect()
}

fn describe(player: PlayerId, target: PlayerId, overtake: &Overtake) -> String {
    let player = player.display_name();
    let target = target.display_name();
    match overtake.status {
        RankUpStatus::AlreadyAhead => format!("{player} already places above {target}"),
        RankUpStatus::Infeasible => format!("{player} cannot pass {target} within the search limit"),
        RankUpStatus::Reachable => match (overtake.required_wins, overtake.required_target_losses) {
            (w, 0) => format!("{player} wins {w} more"),
            (0, l) => format!("{target} loses {l} more"),
            (w, l) => format!("{player} wins {w} more and {target} loses {l} more"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_support::*;
    use crate::calculate::{player_tallies, rank_by_win_rate};

    #[test]
    fn test_already_ahead() {
        let result = minimal_overtake(Tally::new(3, 4), Tally::new(1, 4));
        assert_eq!(result.status, RankUpStatus::AlreadyAhead);
        assert_eq!(result.required_wins, 0);
        assert_eq!(result.required_target_losses, 0);
        assert_eq!(result.before, result.after);
    }

    #[test]
    fn test_minimal_total_then_fewest_wins() {
        // No split of one or two extra games works; 2/4 vs 2/4 is a tie.
        // At three, 0+3 gives 1/3 vs 2/6 (behind on wins) and 1+2 passes.
        let result = minimal_overtake(Tally::new(1, 3), Tally::new(2, 3));
        assert_eq!(result.status, RankUpStatus::Reachable);
        assert_eq!(result.required_wins, 1);
        assert_eq!(result.required_target_losses, 2);
        assert_eq!(result.after.current.wins, 2);
        assert_eq!(result.after.current.total, 4);
        assert_eq!(result.after.target.total, 5);
        assert_eq!(result.after.current.winrate, 50.0);
        assert_eq!(result.after.target.winrate, 40.0);
    }

    #[test]
    fn test_equal_tallies_need_one_game() {
        let result = minimal_overtake(Tally::new(1, 2), Tally::new(1, 2));
        assert_eq!(result.status, RankUpStatus::Reachable);
        // 0 wins + 1 target loss: 1/2 vs 1/3
        assert_eq!((result.required_wins, result.required_target_losses), (0, 1));
    }

    #[test]
    fn test_infeasible_within_cap() {
        let result = minimal_overtake_within(Tally::new(0, 10), Tally::new(10, 10), 3);
        assert_eq!(result.status, RankUpStatus::Infeasible);
        assert_eq!(result.required_wins, 0);
        assert_eq!(result.required_target_losses, 0);
    }

    #[test]
    fn test_unplayed_player_against_perfect_record() {
        // 0/0 vs 1/1: one win only ties, target losses alone never help
        let result = minimal_overtake(Tally::new(0, 0), Tally::new(1, 1));
        assert_eq!(result.status, RankUpStatus::Reachable);
        assert_eq!((result.required_wins, result.required_target_losses), (1, 1));
    }

    #[test]
    fn test_conditions_for_scenario() {
        let matches = games(&[([A, B], [C, D]), ([A, B], [C, D]), ([C, D], [A, B])]);
        let ranking = rank_by_win_rate(player_tallies(&matches));
        let conditions = rank_up_conditions(&ranking, RANK_UP_SEARCH_CAP);

        // C and D (rank 3) target B; E (rank 5) targets D
        let pairs: Vec<(PlayerId, PlayerId)> =
            conditions.iter().map(|c| (c.player, c.target_player)).collect();
        assert_eq!(pairs, vec![(C, B), (D, B), (E, D)]);
        assert!(conditions.iter().all(|c| c.target_rank < c.current_rank));
        // A and B tie at 1, so nobody holds rank 2 and C reaches past it
        assert_eq!((conditions[0].current_rank, conditions[0].target_rank), (3, 1));

        let c = &conditions[0];
        assert_eq!(c.overtake.status, RankUpStatus::Reachable);
        assert!(c.description.contains(C.display_name()));
    }

    #[test]
    fn test_condition_serializes_flat() {
        let ranking = rank_by_win_rate(vec![(A, Tally::new(2, 2)), (B, Tally::new(1, 2))]);
        let conditions = rank_up_conditions(&ranking, RANK_UP_SEARCH_CAP);
        let json = serde_json::to_value(&conditions[0]).unwrap();
        assert_eq!(json["player"], "큐");
        assert_eq!(json["targetPlayer"], "잡");
        assert_eq!(json["status"], "reachable");
        assert!(json["requiredWins"].is_number());
        assert!(json["after"]["current"]["winrate"].is_number());
    }

    #[test]
    fn test_describe() {
        let losses_only = minimal_overtake(Tally::new(1, 2), Tally::new(1, 2));
        assert_eq!(describe(B, A, &losses_only), "채림 loses 1 more");

        let both = minimal_overtake(Tally::new(1, 3), Tally::new(2, 3));
        assert_eq!(describe(C, B, &both), "진호 wins 1 more and 순규 loses 2 more");

        let ahead = minimal_overtake(Tally::new(2, 2), Tally::new(1, 2));
        assert_eq!(describe(C, B, &ahead), "진호 already places above 순규");
    }
}
