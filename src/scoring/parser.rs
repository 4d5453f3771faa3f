use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::domain::ParseConfidence;

const NAME: &str = r"[\p{L}][\p{L}'.\-]*(?:\s+[\p{L}][\p{L}'.\-]*)*?";
const SCORE: &str = r"\d{1,3}";
/// Punctuation and trailing chat after the last score, unless it starts
/// another number or score separator
const TAIL: &str = r"[.!,;]*(?:\s+(?:[^\d\s\-:].*)?)?$";

/// Which text pattern produced the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScorePattern {
    /// "John 9 Sarah 4"
    NamedScores,
    /// "Mike beat Lisa 9-2"
    NamedWinner,
    /// "9-4", "9:4", "9 4"
    BareScores,
    Unparsed,
}

impl ScorePattern {
    pub fn confidence(&self) -> ParseConfidence {
        match self {
            ScorePattern::NamedScores | ScorePattern::NamedWinner => ParseConfidence::High,
            ScorePattern::BareScores => ParseConfidence::Medium,
            ScorePattern::Unparsed => ParseConfidence::Low,
        }
    }
}

/// Best guess at a score from free text. Sides are in text order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedScore {
    pub pattern: ScorePattern,
    pub player1_name: Option<String>,
    pub player1_score: Option<i32>,
    pub player2_name: Option<String>,
    pub player2_score: Option<i32>,
    pub winner_name: Option<String>,
    pub error: Option<String>,
}

impl ParsedScore {
    pub fn confidence(&self) -> ParseConfidence {
        self.pattern.confidence()
    }

    fn unparsed() -> Self {
        Self {
            pattern: ScorePattern::Unparsed,
            player1_name: None,
            player1_score: None,
            player2_name: None,
            player2_score: None,
            winner_name: None,
            error: Some("Could not parse score from message".to_string()),
        }
    }
}

/// Tiered free-text score reader. The first matching tier wins; tiers are
/// never merged.
pub struct ScoreTextParser {
    named_scores: Regex,
    named_winner: Regex,
    separated_scores: Regex,
    spaced_scores: Regex,
}

impl ScoreTextParser {
    pub fn new() -> Result<Self> {
        let named_scores = Regex::new(&format!(
            r"(?is)^\s*({NAME})\s*:?\s*({SCORE})(?:\s*[,;]\s*|\s+)({NAME})\s*:?\s*({SCORE}){TAIL}"
        ))
        .context("Failed to compile named scores regex")?;

        let named_winner = Regex::new(&format!(
            r"(?is)^\s*({NAME})\s+(?:defeated|def\.?|beats?)\s+({NAME})\s*,?\s*({SCORE})\s*[-:]\s*({SCORE}){TAIL}"
        ))
        .context("Failed to compile named winner regex")?;

        let separated_scores = Regex::new(&format!(r"\b({SCORE})\s*[-:]\s*({SCORE})\b"))
            .context("Failed to compile separated scores regex")?;

        let spaced_scores = Regex::new(&format!(r"\b({SCORE})\s+({SCORE})\b"))
            .context("Failed to compile spaced scores regex")?;

        Ok(Self {
            named_scores,
            named_winner,
            separated_scores,
            spaced_scores,
        })
    }

    /// Never fails: unreadable text comes back as a low-confidence parse
    pub fn parse(&self, text: &str) -> ParsedScore {
        self.parse_named_scores(text)
            .or_else(|| self.parse_named_winner(text))
            .or_else(|| self.parse_bare_scores(text))
            .unwrap_or_else(ParsedScore::unparsed)
    }

    fn parse_named_scores(&self, text: &str) -> Option<ParsedScore> {
        let caps = self.named_scores.captures(text)?;
        let first_name = name_at(&caps, 1);
        let first_score = score_at(&caps, 2)?;
        let second_name = name_at(&caps, 3);
        let second_score = score_at(&caps, 4)?;

        let winner_name = if first_score > second_score {
            Some(first_name.clone())
        } else if second_score > first_score {
            Some(second_name.clone())
        } else {
            None
        };

        Some(ParsedScore {
            pattern: ScorePattern::NamedScores,
            player1_name: Some(first_name),
            player1_score: Some(first_score),
            player2_name: Some(second_name),
            player2_score: Some(second_score),
            winner_name,
            error: None,
        })
    }

    fn parse_named_winner(&self, text: &str) -> Option<ParsedScore> {
        let caps = self.named_winner.captures(text)?;
        let winner = name_at(&caps, 1);
        let loser = name_at(&caps, 2);
        let a = score_at(&caps, 3)?;
        let b = score_at(&caps, 4)?;

        // The text names the winner, so the higher number is theirs
        Some(ParsedScore {
            pattern: ScorePattern::NamedWinner,
            player1_name: Some(winner.clone()),
            player1_score: Some(a.max(b)),
            player2_name: Some(loser),
            player2_score: Some(a.min(b)),
            winner_name: Some(winner),
            error: None,
        })
    }

    fn parse_bare_scores(&self, text: &str) -> Option<ParsedScore> {
        let caps = self
            .separated_scores
            .captures(text)
            .or_else(|| self.spaced_scores.captures(text))?;

        Some(ParsedScore {
            pattern: ScorePattern::BareScores,
            player1_name: None,
            player1_score: score_at(&caps, 1),
            player2_name: None,
            player2_score: score_at(&caps, 2),
            winner_name: None,
            error: None,
        })
    }
}

fn name_at(caps: &Captures, idx: usize) -> String {
    caps.get(idx)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn score_at(caps: &Captures, idx: usize) -> Option<i32> {
    caps.get(idx)?.as_str().parse().ok()
}
