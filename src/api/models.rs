use serde::{Deserialize, Serialize};

use crate::domain::{Bracket, Division, DivisionOverview, Match, ScoreReport};
use crate::services::progression::AdvanceOutcome;

/// Inbound SMS as forwarded by the gateway
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsRequest {
    pub from: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsReply {
    /// Text for the gateway to send back
    pub reply: String,
    pub report_id: Option<i64>,
    pub applied: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    #[serde(default)]
    pub correction: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub from_round: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMatchRequest {
    pub table_number: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub id: i64,
    pub match_id: i64,
    pub raw_text: String,
    pub sender_phone: String,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub winner_id: Option<i64>,
    pub confidence: String,
    pub confidence_score: u8,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<ScoreReport> for ReportItem {
    fn from(report: ScoreReport) -> Self {
        Self {
            id: report.id,
            match_id: report.match_id,
            raw_text: report.raw_text,
            sender_phone: report.sender_phone,
            player1_score: report.player1_score,
            player2_score: report.player2_score,
            winner_id: report.winner_id,
            confidence: report.parse_confidence.as_str().to_string(),
            confidence_score: report.confidence_score,
            status: report.status.as_str().to_string(),
            notes: report.notes,
            created_at: report.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    pub id: i64,
    pub bracket_id: i64,
    pub round_number: u32,
    pub match_number: u32,
    pub player1_id: Option<i64>,
    pub player2_id: Option<i64>,
    pub player1_name: Option<String>,
    pub player2_name: Option<String>,
    pub winner_id: Option<i64>,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub table_number: Option<u32>,
    pub status: String,
}

impl From<Match> for MatchItem {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            bracket_id: m.bracket_id,
            round_number: m.round_number,
            match_number: m.match_number,
            player1_id: m.player1_id,
            player2_id: m.player2_id,
            player1_name: None,
            player2_name: None,
            winner_id: m.winner_id,
            player1_score: m.player1_score,
            player2_score: m.player2_score,
            table_number: m.table_number,
            status: m.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub report: ReportItem,
    pub match_record: MatchItem,
    pub correction: bool,
    pub advance: Option<AdvanceResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub outcome: String,
    pub bracket_id: i64,
    pub round: u32,
    pub created: Vec<MatchItem>,
    pub consolation: Vec<MatchItem>,
    pub winner_id: Option<i64>,
}

impl From<AdvanceOutcome> for AdvanceResponse {
    fn from(outcome: AdvanceOutcome) -> Self {
        let items = |matches: Vec<Match>| matches.into_iter().map(MatchItem::from).collect();
        match outcome {
            AdvanceOutcome::Advanced {
                bracket_id,
                round,
                created,
                consolation,
            } => Self {
                outcome: "advanced".to_string(),
                bracket_id,
                round,
                created: items(created),
                consolation: items(consolation),
                winner_id: None,
            },
            AdvanceOutcome::AlreadyAdvanced {
                bracket_id,
                current_round,
            } => Self {
                outcome: "already_advanced".to_string(),
                bracket_id,
                round: current_round,
                created: Vec::new(),
                consolation: Vec::new(),
                winner_id: None,
            },
            AdvanceOutcome::Completed { bracket_id, winner_id } => Self {
                outcome: "completed".to_string(),
                bracket_id,
                round: 0,
                created: Vec::new(),
                consolation: Vec::new(),
                winner_id,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketItem {
    pub id: i64,
    pub bracket_type: String,
    pub current_round: u32,
    pub status: String,
    pub seed: Option<String>,
    pub winner_id: Option<i64>,
    pub matches: Vec<MatchItem>,
}

impl BracketItem {
    fn new(bracket: Bracket, matches: Vec<MatchItem>, winner_id: Option<i64>) -> Self {
        Self {
            id: bracket.id,
            bracket_type: bracket.bracket_type.as_str().to_string(),
            current_round: bracket.current_round,
            status: bracket.status.as_str().to_string(),
            // u64 seeds overflow JSON number precision
            seed: bracket.seed.map(|s| s.to_string()),
            winner_id,
            matches,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub id: i64,
    pub name: String,
    pub match_length: i32,
    pub requires_clock: bool,
    pub player_count: usize,
    pub brackets: Vec<BracketItem>,
}

impl From<DivisionOverview> for DivisionResponse {
    fn from(overview: DivisionOverview) -> Self {
        let brackets = overview
            .brackets
            .iter()
            .map(|view| {
                let matches = view
                    .matches
                    .iter()
                    .map(|m| MatchItem {
                        player1_name: m.player1_id.map(|_| overview.player_name(m.player1_id).to_string()),
                        player2_name: m.player2_id.map(|_| overview.player_name(m.player2_id).to_string()),
                        ..MatchItem::from(m.clone())
                    })
                    .collect();
                BracketItem::new(view.bracket.clone(), matches, view.winner_id)
            })
            .collect();

        Self {
            id: overview.division.id,
            name: overview.division.name.clone(),
            match_length: overview.division.match_length,
            requires_clock: overview.division.requires_clock,
            player_count: overview.players.len(),
            brackets,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionItem {
    pub id: i64,
    pub name: String,
    pub match_length: i32,
    pub requires_clock: bool,
}

impl From<Division> for DivisionItem {
    fn from(division: Division) -> Self {
        Self {
            id: division.id,
            name: division.name,
            match_length: division.match_length,
            requires_clock: division.requires_clock,
        }
    }
}
