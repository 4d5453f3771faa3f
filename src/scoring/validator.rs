use serde::Serialize;
use thiserror::Error;

/// Why a score cannot be the result of a race-to-N match.
/// Each rule reports its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    #[error("both scores are required")]
    MissingScore,

    #[error("scores cannot be negative")]
    NegativeScore,

    #[error("neither score equals the race to {race_to}")]
    NoWinningScore { race_to: i32 },

    #[error("both scores equal the race to {race_to}")]
    BothReachedRace { race_to: i32 },

    #[error("losing score must be below the race to {race_to}")]
    LoserOverRace { race_to: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Player1,
    Player2,
}

/// A score that satisfies the race rule, with the side that reached it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedScore {
    pub player1_score: i32,
    pub player2_score: i32,
    pub winning_side: Side,
}

pub fn validate(
    player1_score: Option<i32>,
    player2_score: Option<i32>,
    match_length: i32,
) -> Result<ValidatedScore, ValidationError> {
    let (Some(p1), Some(p2)) = (player1_score, player2_score) else {
        return Err(ValidationError::MissingScore);
    };

    if p1 < 0 || p2 < 0 {
        return Err(ValidationError::NegativeScore);
    }

    let winning_side = match (p1 == match_length, p2 == match_length) {
        (true, true) => return Err(ValidationError::BothReachedRace { race_to: match_length }),
        (false, false) => return Err(ValidationError::NoWinningScore { race_to: match_length }),
        (true, false) => Side::Player1,
        (false, true) => Side::Player2,
    };

    let losing_score = match winning_side {
        Side::Player1 => p2,
        Side::Player2 => p1,
    };
    if losing_score >= match_length {
        return Err(ValidationError::LoserOverRace { race_to: match_length });
    }

    Ok(ValidatedScore {
        player1_score: p1,
        player2_score: p2,
        winning_side,
    })
}
