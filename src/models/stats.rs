//! Derived statistics models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PlayerId, TeamKey};

/// Win and game counts for one player or team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub total: u32,
}

impl Tally {
    pub fn new(wins: u32, total: u32) -> Self {
        debug_assert!(wins <= total);
        Self { wins, total }
    }

    pub fn losses(&self) -> u32 {
        self.total.saturating_sub(self.wins)
    }

    /// Win rate as a percentage (0-100); 0 when no games were played.
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64 * 100.0
        }
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
        self.total += 1;
    }

    pub fn record_loss(&mut self) {
        self.total += 1;
    }

    /// This tally after `wins` more wins.
    pub fn with_extra_wins(self, wins: u32) -> Self {
        Self::new(self.wins + wins, self.total + wins)
    }

    /// This tally after `losses` more losses.
    pub fn with_extra_losses(self, losses: u32) -> Self {
        Self::new(self.wins, self.total + losses)
    }
}

/// Per-player tallies, always containing every roster member.
pub type PlayerTallies = BTreeMap<PlayerId, Tally>;

/// Per-team tallies, containing only teams that have played.
pub type TeamTallies = BTreeMap<TeamKey, Tally>;

/// Round a percentage to two decimals for display.
pub fn round_rate(rate: f64) -> f64 {
    (rate * 100.0).round() / 100.0
}
