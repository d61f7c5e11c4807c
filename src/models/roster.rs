//! The fixed five-player roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of players on the roster.
pub const ROSTER_SIZE: usize = 5;

/// One of the five roster members.
///
/// Declaration order is the roster order; `Ord` follows it, which is what
/// team keys and tie-stable ranking tables rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "잡")]
    Jab,
    #[serde(rename = "큐")]
    Kyu,
    #[serde(rename = "지")]
    Ji,
    #[serde(rename = "머")]
    Meo,
    #[serde(rename = "웅")]
    Woong,
}

/// All roster members in roster order.
pub const ROSTER: [PlayerId; ROSTER_SIZE] = [
    PlayerId::Jab,
    PlayerId::Kyu,
    PlayerId::Ji,
    PlayerId::Meo,
    PlayerId::Woong,
];

/// Returned when a token is not a roster member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid player: {0}")]
pub struct ParsePlayerError(pub String);

impl PlayerId {
    /// The stored token for this player.
    pub fn token(self) -> &'static str {
        match self {
            PlayerId::Jab => "잡",
            PlayerId::Kyu => "큐",
            PlayerId::Ji => "지",
            PlayerId::Meo => "머",
            PlayerId::Woong => "웅",
        }
    }

    /// Full name shown in the UI.
    pub fn display_name(self) -> &'static str {
        match self {
            PlayerId::Jab => "채림",
            PlayerId::Kyu => "순규",
            PlayerId::Ji => "진호",
            PlayerId::Meo => "희림",
            PlayerId::Woong => "재웅",
        }
    }

    /// Position in the roster order.
    pub fn roster_index(self) -> usize {
        self as usize
    }

    /// Whether `token` names a roster member.
    pub fn is_valid(token: &str) -> bool {
        token.parse::<PlayerId>().is_ok()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for PlayerId {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROSTER
            .iter()
            .copied()
            .find(|p| p.token() == s)
            .ok_or_else(|| ParsePlayerError(s.to_string()))
    }
}
