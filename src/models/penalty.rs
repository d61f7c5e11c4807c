//! Penalty records. Display-only; they never feed the statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PenaltyId, PlayerId, ValidationError, MAX_REASON_CHARS};

/// A penalty given to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyRecord {
    pub id: PenaltyId,
    pub player: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PenaltyRecord {
    pub fn new(player: PlayerId, reason: Option<String>, created_at: DateTime<Utc>) -> Self {
        let id = PenaltyId::for_penalty(player, reason.as_deref(), created_at);
        Self {
            id,
            player,
            reason,
            created_at,
        }
    }
}

/// A penalty as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPenalty {
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewPenalty {
    /// Validate and stamp the penalty with `created_at`.
    ///
    /// A blank reason is stored as no reason.
    pub fn into_record(self, created_at: DateTime<Utc>) -> Result<PenaltyRecord, ValidationError> {
        let token = self
            .player
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPlayer)?;
        let player: PlayerId = token
            .parse()
            .map_err(|_| ValidationError::InvalidPlayer(token.clone()))?;

        let reason = self
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if reason
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_REASON_CHARS)
        {
            return Err(ValidationError::ReasonTooLong);
        }

        Ok(PenaltyRecord::new(player, reason, created_at))
    }
}
