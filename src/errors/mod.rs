use thiserror::Error;

use crate::domain::{BracketId, MatchId, PlayerId, ReportId};
use crate::scoring::ValidationError;

/// Failures surfaced by intake and director actions
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Sender has no pending or in-progress match
    #[error("No active match found for this sender")]
    NoActiveMatch { player_id: Option<PlayerId> },

    /// Another writer completed the match first
    #[error("Match {match_id} already recorded")]
    MatchAlreadyRecorded { match_id: MatchId },

    #[error("Score report {report_id} was already {status}")]
    ReportAlreadyResolved {
        report_id: ReportId,
        status: &'static str,
    },

    #[error("Round {round} of bracket {bracket_id} is not complete")]
    RoundIncomplete { bracket_id: BracketId, round: u32 },

    #[error("Invalid score: {0}")]
    InvalidScore(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Caller contract violation, rejected before any mutation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TournamentError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        TournamentError::NotFound { entity, id }
    }

    /// Whether the failure is meant to reach the person who sent the report
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TournamentError::NoActiveMatch { .. } | TournamentError::MatchAlreadyRecorded { .. }
        )
    }
}

impl From<rusqlite::Error> for TournamentError {
    fn from(err: rusqlite::Error) -> Self {
        TournamentError::Storage(err.into())
    }
}

impl From<r2d2::Error> for TournamentError {
    fn from(err: r2d2::Error) -> Self {
        TournamentError::Storage(anyhow::Error::new(err).context("Failed to get database connection from pool"))
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sender_facing_failures_are_user_facing() {
        assert!(TournamentError::NoActiveMatch { player_id: None }.is_user_facing());
        assert!(TournamentError::MatchAlreadyRecorded { match_id: 3 }.is_user_facing());
        assert!(!TournamentError::RoundIncomplete { bracket_id: 1, round: 2 }.is_user_facing());
        assert!(!TournamentError::InvalidInput("empty".into()).is_user_facing());
    }

    #[test]
    fn test_messages() {
        let err = TournamentError::MatchAlreadyRecorded { match_id: 7 };
        assert_eq!(err.to_string(), "Match 7 already recorded");
        let err = TournamentError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, TournamentError::Storage(_)));
    }
}
