//! Canonical keys for two-player teams.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::PlayerId;

/// Returned when a string is not a valid team key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid team key: {0}")]
pub struct ParseTeamKeyError(pub String);

/// An unordered pair of distinct players, stored in roster order.
///
/// `TeamKey::new(a, b) == TeamKey::new(b, a)` always holds. The string form
/// is the two player tokens concatenated in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamKey {
    first: PlayerId,
    second: PlayerId,
}

/// Team names shown in the UI. Pairs are listed in roster order; a few names
/// put the second member first.
const TEAM_NAMES: [(PlayerId, PlayerId, &str); 10] = [
    (PlayerId::Jab, PlayerId::Kyu, "잡큐"),
    (PlayerId::Jab, PlayerId::Ji, "잡지"),
    (PlayerId::Jab, PlayerId::Meo, "잡머"),
    (PlayerId::Jab, PlayerId::Woong, "잡웅"),
    (PlayerId::Kyu, PlayerId::Ji, "지큐"),
    (PlayerId::Kyu, PlayerId::Meo, "머큐"),
    (PlayerId::Kyu, PlayerId::Woong, "웅큐"),
    (PlayerId::Ji, PlayerId::Meo, "지머"),
    (PlayerId::Ji, PlayerId::Woong, "지웅"),
    (PlayerId::Meo, PlayerId::Woong, "머웅"),
];

impl TeamKey {
    /// Build the canonical key for a pair, independent of argument order.
    ///
    /// The two players must be distinct.
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        debug_assert_ne!(a, b, "a team needs two distinct players");
        if a.roster_index() <= b.roster_index() {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Build the key from a two-element team array.
    pub fn from_pair(pair: &[PlayerId; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }

    /// Both members in roster order.
    pub fn players(&self) -> [PlayerId; 2] {
        [self.first, self.second]
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.first == player || self.second == player
    }

    /// Name shown in the UI.
    pub fn display_name(&self) -> &'static str {
        TEAM_NAMES
            .iter()
            .find(|(a, b, _)| *a == self.first && *b == self.second)
            .map(|(_, _, name)| *name)
            .unwrap_or("")
    }

    /// Members ordered as they appear in the display name.
    pub fn display_order(&self) -> [PlayerId; 2] {
        let name = self.display_name();
        if name.starts_with(self.second.token()) {
            [self.second, self.first]
        } else {
            [self.first, self.second]
        }
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first.token(), self.second.token())
    }
}

impl FromStr for TeamKey {
    type Err = ParseTeamKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTeamKeyError(s.to_string());
        let mut chars = s.chars();
        let (Some(a), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        let a: PlayerId = a.to_string().parse().map_err(|_| err())?;
        let b: PlayerId = b.to_string().parse().map_err(|_| err())?;
        if a == b {
            return Err(err());
        }
        Ok(Self::new(a, b))
    }
}

impl Serialize for TeamKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TeamKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
