//! Write-path validation errors.

use thiserror::Error;

/// Maximum length of a penalty reason, in characters.
pub const MAX_REASON_CHARS: usize = 200;

/// Why a submitted game or penalty was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("winning and losing teams are both required")]
    MissingTeams,

    #[error("each team must have exactly 2 players")]
    TeamSize,

    #[error("a player appears more than once across the two teams")]
    DuplicatePlayer,

    #[error("invalid player: {0}")]
    InvalidPlayer(String),

    #[error("player is required")]
    MissingPlayer,

    #[error("reason must be at most {MAX_REASON_CHARS} characters")]
    ReasonTooLong,
}
