use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PlayerId = i64;
pub type DivisionId = i64;
pub type BracketId = i64;
pub type MatchId = i64;
pub type ReportId = i64;

/// Raised when a stored status string does not name a known variant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Tournament entrant. Referenced by id everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Tournament subdivision with its own race length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    /// Race-to-N: the winner of a match is the first side to reach this score
    pub match_length: i32,
    pub requires_clock: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Main,
    Consolation,
    LastChance,
}

impl BracketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketType::Main => "main",
            BracketType::Consolation => "consolation",
            BracketType::LastChance => "last_chance",
        }
    }
}

impl FromStr for BracketType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(BracketType::Main),
            "consolation" => Ok(BracketType::Consolation),
            "last_chance" => Ok(BracketType::LastChance),
            other => Err(UnknownVariant::new("bracket_type", other)),
        }
    }
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketStatus {
    Pending,
    InProgress,
    Completed,
}

impl BracketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketStatus::Pending => "pending",
            BracketStatus::InProgress => "in_progress",
            BracketStatus::Completed => "completed",
        }
    }
}

impl FromStr for BracketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BracketStatus::Pending),
            "in_progress" => Ok(BracketStatus::InProgress),
            "completed" => Ok(BracketStatus::Completed),
            other => Err(UnknownVariant::new("bracket_status", other)),
        }
    }
}

/// One elimination ladder inside a division
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub division_id: DivisionId,
    pub bracket_type: BracketType,
    pub current_round: u32,
    pub status: BracketStatus,
    /// Seed used for the round 1 draw, kept so a draw can be reproduced
    pub seed: Option<u64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
    Bye,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Bye => "bye",
        }
    }

    /// Whether the match still awaits a result
    pub fn is_active(&self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::InProgress)
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_active()
    }
}

impl FromStr for MatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "in_progress" => Ok(MatchStatus::InProgress),
            "completed" => Ok(MatchStatus::Completed),
            "bye" => Ok(MatchStatus::Bye),
            other => Err(UnknownVariant::new("match_status", other)),
        }
    }
}

/// Match as stored, keyed by (bracket_id, round_number, match_number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub bracket_id: BracketId,
    pub round_number: u32,
    pub match_number: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub table_number: Option<u32>,
    pub status: MatchStatus,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl Match {
    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1_id == Some(player_id) || self.player2_id == Some(player_id)
    }

    /// The side that did not win. Byes and undecided matches have no loser.
    pub fn loser_id(&self) -> Option<PlayerId> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        let winner = self.winner_id?;
        if self.player1_id == Some(winner) {
            self.player2_id
        } else if self.player2_id == Some(winner) {
            self.player1_id
        } else {
            None
        }
    }
}

/// Match produced by the bracket engine, before it is given an id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMatch {
    pub round_number: u32,
    pub match_number: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub table_number: Option<u32>,
    pub status: MatchStatus,
}

impl NewMatch {
    pub fn bye(round_number: u32, match_number: u32, player_id: PlayerId) -> Self {
        Self {
            round_number,
            match_number,
            player1_id: Some(player_id),
            player2_id: None,
            winner_id: Some(player_id),
            table_number: None,
            status: MatchStatus::Bye,
        }
    }

    pub fn pairing(
        round_number: u32,
        match_number: u32,
        player1_id: PlayerId,
        player2_id: PlayerId,
    ) -> Self {
        Self {
            round_number,
            match_number,
            player1_id: Some(player1_id),
            player2_id: Some(player2_id),
            winner_id: None,
            table_number: None,
            status: MatchStatus::Pending,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.status == MatchStatus::Bye
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
    NeedsClarification,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
            ReportStatus::NeedsClarification => "needs_clarification",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Approved | ReportStatus::Rejected)
    }
}

impl FromStr for ReportStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "approved" => Ok(ReportStatus::Approved),
            "rejected" => Ok(ReportStatus::Rejected),
            "needs_clarification" => Ok(ReportStatus::NeedsClarification),
            other => Err(UnknownVariant::new("report_status", other)),
        }
    }
}

/// How specific the text pattern that produced a parse was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseConfidence {
    High,
    Medium,
    Low,
}

impl ParseConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseConfidence::High => "high",
            ParseConfidence::Medium => "medium",
            ParseConfidence::Low => "low",
        }
    }
}

impl FromStr for ParseConfidence {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(ParseConfidence::High),
            "medium" => Ok(ParseConfidence::Medium),
            "low" => Ok(ParseConfidence::Low),
            other => Err(UnknownVariant::new("parse_confidence", other)),
        }
    }
}

/// A score submission for one match. Scores are oriented to the
/// match's player1/player2 sides, not to the order they appeared in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub id: ReportId,
    pub match_id: MatchId,
    pub raw_text: String,
    pub sender_phone: String,
    pub reporter_id: Option<PlayerId>,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub winner_id: Option<PlayerId>,
    pub parse_confidence: ParseConfidence,
    pub confidence_score: u8,
    pub status: ReportStatus,
    /// Parse or validation problem, or the director's rejection reason
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
}
