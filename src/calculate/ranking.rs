//! Win-rate ordering and competition ranks.

use serde::Serialize;
use std::cmp::Ordering;

use crate::models::Tally;

/// Order two tallies by standing: `Less` means `a` places above `b`.
///
/// Higher win rate first, then more wins, then fewer losses. Win rates are
/// compared exactly as fractions, with 0/0 counting as a 0% rate.
pub fn compare_tallies(a: &Tally, b: &Tally) -> Ordering {
    let a_den = u64::from(a.total.max(1));
    let b_den = u64::from(b.total.max(1));
    let a_num = u64::from(a.wins) * b_den;
    let b_num = u64::from(b.wins) * a_den;

    b_num
        .cmp(&a_num)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses().cmp(&b.losses()))
}

/// Whether `a` strictly places above `b`.
pub fn outranks(a: &Tally, b: &Tally) -> bool {
    compare_tallies(a, b) == Ordering::Less
}

/// One row of a ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<K> {
    pub rank: u32,
    pub entity: K,
    pub tally: Tally,
}

/// Rank entities by [`compare_tallies`].
///
/// Uses competition ranking: an entity whose (rate, wins, losses) equals the
/// previous row's shares its rank; otherwise its rank is its 1-based position.
/// Ties keep input order.
pub fn rank_by_win_rate<K, I>(tallies: I) -> Vec<Ranked<K>>
where
    I: IntoIterator<Item = (K, Tally)>,
{
    let mut rows: Vec<(K, Tally)> = tallies.into_iter().collect();
    rows.sort_by(|a, b| compare_tallies(&a.1, &b.1));

    let mut ranked: Vec<Ranked<K>> = Vec::with_capacity(rows.len());
    for (i, (entity, tally)) in rows.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if compare_tallies(&prev.tally, &tally) == Ordering::Equal => prev.rank,
            _ => i as u32 + 1,
        };
        ranked.push(Ranked {
            rank,
            entity,
            tally,
        });
    }
    ranked
}

/// Rank entities by raw win count, higher win rate breaking ties.
/// Ranks are sequential positions with no sharing.
pub fn rank_by_wins<K, I>(tallies: I) -> Vec<Ranked<K>>
where
    I: IntoIterator<Item = (K, Tally)>,
{
    let mut rows: Vec<(K, Tally)> = tallies.into_iter().collect();
    rows.sort_by(|a, b| {
        b.1.wins.cmp(&a.1.wins).then_with(|| {
            b.1.win_rate()
                .partial_cmp(&a.1.win_rate())
                .unwrap_or(Ordering::Equal)
        })
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (entity, tally))| Ranked {
            rank: i as u32 + 1,
            entity,
            tally,
        })
        .collect()
}

/// Rank of `entity` in a ranking table.
pub fn rank_of<K: PartialEq>(ranking: &[Ranked<K>], entity: &K) -> Option<u32> {
    ranking.iter().find(|r| &r.entity == entity).map(|r| r.rank)
}
