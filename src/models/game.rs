//! Recorded 2v2 match results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{MatchId, PlayerId, TeamKey, ValidationError};

/// One finished game. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Unique identifier (derived from teams + timestamp)
    pub id: MatchId,

    /// The two winners
    pub winning_team: [PlayerId; 2],

    /// The two losers
    pub losing_team: [PlayerId; 2],

    /// When the game was recorded
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Create a new MatchRecord with auto-generated ID.
    pub fn new(
        winning_team: [PlayerId; 2],
        losing_team: [PlayerId; 2],
        created_at: DateTime<Utc>,
    ) -> Self {
        let id = MatchId::for_match(
            TeamKey::from_pair(&winning_team),
            TeamKey::from_pair(&losing_team),
            created_at,
        );

        Self {
            id,
            winning_team,
            losing_team,
            created_at,
        }
    }

    pub fn winning_key(&self) -> TeamKey {
        TeamKey::from_pair(&self.winning_team)
    }

    pub fn losing_key(&self) -> TeamKey {
        TeamKey::from_pair(&self.losing_team)
    }

    /// `Some(true)` if the player won, `Some(false)` if they lost,
    /// `None` if they sat this game out.
    pub fn outcome_for(&self, player: PlayerId) -> Option<bool> {
        if self.winning_team.contains(&player) {
            Some(true)
        } else if self.losing_team.contains(&player) {
            Some(false)
        } else {
            None
        }
    }

    /// Same as [`outcome_for`](Self::outcome_for) for a team.
    pub fn team_outcome(&self, team: TeamKey) -> Option<bool> {
        if self.winning_key() == team {
            Some(true)
        } else if self.losing_key() == team {
            Some(false)
        } else {
            None
        }
    }
}

/// A game as submitted by a client, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    #[serde(default)]
    pub winning_team: Option<Vec<String>>,
    #[serde(default)]
    pub losing_team: Option<Vec<String>>,
}

impl NewGame {
    pub fn new(winning_team: Vec<String>, losing_team: Vec<String>) -> Self {
        Self {
            winning_team: Some(winning_team),
            losing_team: Some(losing_team),
        }
    }

    /// Check team sizes, overlap and roster membership, in that order.
    pub fn validate(&self) -> Result<([PlayerId; 2], [PlayerId; 2]), ValidationError> {
        let (Some(winners), Some(losers)) = (&self.winning_team, &self.losing_team) else {
            return Err(ValidationError::MissingTeams);
        };

        if winners.len() != 2 || losers.len() != 2 {
            return Err(ValidationError::TeamSize);
        }

        let unique: HashSet<&str> = winners.iter().chain(losers).map(String::as_str).collect();
        if unique.len() != 4 {
            return Err(ValidationError::DuplicatePlayer);
        }

        let parse = |token: &String| {
            token
                .parse::<PlayerId>()
                .map_err(|_| ValidationError::InvalidPlayer(token.clone()))
        };

        Ok((
            [parse(&winners[0])?, parse(&winners[1])?],
            [parse(&losers[0])?, parse(&losers[1])?],
        ))
    }

    /// Validate and stamp the game with `created_at`.
    pub fn into_record(self, created_at: DateTime<Utc>) -> Result<MatchRecord, ValidationError> {
        let (winners, losers) = self.validate()?;
        Ok(MatchRecord::new(winners, losers, created_at))
    }
}
