//! Content-derived record identifiers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{PlayerId, TeamKey};

const ID_LEN: usize = 16;

/// Returned when a string cannot be a record id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed record id: {0}")]
pub struct ParseRecordIdError(pub String);

/// Identifier of a stored game or penalty: the first 16 hex characters of a
/// SHA-256 over the record's identifying fields.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Game record ids.
pub type MatchId = RecordId;

/// Penalty record ids.
pub type PenaltyId = RecordId;

fn stamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl RecordId {
    fn digest(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let mut hex = hex::encode(hasher.finalize());
        hex.truncate(ID_LEN);
        Self(hex)
    }

    /// Id of a game. Swapping the members within a team gives the same id;
    /// swapping winners and losers does not.
    pub fn for_match(winners: TeamKey, losers: TeamKey, created_at: DateTime<Utc>) -> Self {
        Self::digest(&[
            &winners.to_string(),
            &losers.to_string(),
            &stamp(created_at),
        ])
    }

    /// Id of a penalty.
    pub fn for_penalty(player: PlayerId, reason: Option<&str>, created_at: DateTime<Utc>) -> Self {
        Self::digest(&[
            "penalty",
            player.token(),
            reason.unwrap_or(""),
            &stamp(created_at),
        ])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    /// Accepts exactly 16 lowercase hex characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == ID_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(ParseRecordIdError(s.to_string()))
        }
    }
}
