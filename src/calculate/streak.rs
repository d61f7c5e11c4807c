//! Streaks over a chronological win/loss sequence.

use serde::Serialize;

/// The run of identical outcomes ending at the latest game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStreak {
    pub length: u32,
    pub is_win: bool,
}

/// Longest win and lose runs, with the index of the game at which each
/// maximum was first reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxStreaks {
    pub max_win: u32,
    pub max_win_at: Option<usize>,
    pub max_lose: u32,
    pub max_lose_at: Option<usize>,
}

/// Length and kind of the streak ending at the last outcome.
/// An empty history is a zero-length win streak.
pub fn current_streak(outcomes: &[bool]) -> CurrentStreak {
    let Some(&last) = outcomes.last() else {
        return CurrentStreak {
            length: 0,
            is_win: true,
        };
    };

    let length = outcomes.iter().rev().take_while(|&&o| o == last).count() as u32;
    CurrentStreak {
        length,
        is_win: last,
    }
}

/// Single forward pass; a later run only replaces a maximum if strictly longer.
pub fn max_streaks(outcomes: &[bool]) -> MaxStreaks {
    let mut result = MaxStreaks::default();
    let mut wins = 0u32;
    let mut losses = 0u32;

    for (i, &won) in outcomes.iter().enumerate() {
        if won {
            wins += 1;
            losses = 0;
            if wins > result.max_win {
                result.max_win = wins;
                result.max_win_at = Some(i);
            }
        } else {
            losses += 1;
            wins = 0;
            if losses > result.max_lose {
                result.max_lose = losses;
                result.max_lose_at = Some(i);
            }
        }
    }

    result
}

/// If the last game was a win, the number of consecutive losses right
/// before it; otherwise 0.
pub fn comeback_depth(outcomes: &[bool]) -> u32 {
    match outcomes.split_last() {
        Some((&true, earlier)) => earlier.iter().rev().take_while(|&&o| !o).count() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: bool = true;
    const L: bool = false;

    #[test]
    fn test_current_streak() {
        assert_eq!(
            current_streak(&[W, W, L, W, W, W]),
            CurrentStreak {
                length: 3,
                is_win: true
            }
        );
        assert_eq!(
            current_streak(&[W, L, L]),
            CurrentStreak {
                length: 2,
                is_win: false
            }
        );
        assert_eq!(current_streak(&[]).length, 0);
    }

    #[test]
    fn test_max_streaks() {
        let s = max_streaks(&[W, W, L, W, W, W]);
        assert_eq!(s.max_win, 3);
        assert_eq!(s.max_win_at, Some(5));
        assert_eq!(s.max_lose, 1);
        assert_eq!(s.max_lose_at, Some(2));
    }

    #[test]
    fn test_max_streak_ties_keep_earliest() {
        let s = max_streaks(&[W, W, L, L, W, W]);
        assert_eq!(s.max_win, 2);
        assert_eq!(s.max_win_at, Some(1));
        assert_eq!(s.max_lose, 2);
        assert_eq!(s.max_lose_at, Some(3));
    }

    #[test]
    fn test_max_streaks_empty() {
        assert_eq!(max_streaks(&[]), MaxStreaks::default());
    }

    #[test]
    fn test_comeback_depth() {
        assert_eq!(comeback_depth(&[W, L, L, L, L, L, W]), 5);
        assert_eq!(comeback_depth(&[L, L, W, W]), 0);
        assert_eq!(comeback_depth(&[L, L, L]), 0);
        assert_eq!(comeback_depth(&[W]), 0);
        assert_eq!(comeback_depth(&[]), 0);
    }
}
