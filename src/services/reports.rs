use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use super::progression::{AdvanceOutcome, advance_if_complete, log_outcome};
use crate::config::AppConfig;
use crate::config::BracketSettings;
use crate::database::{self, DbPool, brackets, matches, players, reports};
use crate::database::matches::MatchResult;
use crate::database::rows::now;
use crate::domain::{Match, MatchContext, MatchStatus, Player, PlayerId, ReportId, ReportStatus, ScoreReport, Sender};
use crate::errors::{TournamentError, TournamentResult};
use crate::scoring::{Side, ValidatedScore, validate};
use crate::workflow::{Notifier, ReportAction, ReportIntake, messages, transition};

/// What intake did with an inbound message
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub report: ScoreReport,
    pub applied: bool,
    /// Reply for the sender
    pub message: String,
    pub advance: Option<AdvanceOutcome>,
}

/// Result of a director approval
#[derive(Debug, Clone, Serialize)]
pub struct Approval {
    pub report: ScoreReport,
    pub match_record: Match,
    pub correction: bool,
    pub advance: Option<AdvanceOutcome>,
}

/// Score report intake and director review on top of the store.
///
/// Every operation runs in one IMMEDIATE transaction on one pooled
/// connection; notifications go out only after commit.
pub struct ReportService {
    pool: DbPool,
    intake: ReportIntake,
    bracket: BracketSettings,
    notifier: Arc<dyn Notifier>,
}

impl ReportService {
    pub fn new(pool: DbPool, config: &AppConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self {
            pool,
            intake: ReportIntake::new(config.reports.clone())?,
            bracket: config.bracket.clone(),
            notifier,
        })
    }

    pub fn submit(&self, sender_phone: &str, raw_text: &str) -> TournamentResult<Submission> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let sender = Sender {
            phone: sender_phone.to_string(),
            player: players::find_by_phone(&tx, sender_phone)?,
        };
        let Some(player_id) = sender.player_id() else {
            warn!("Report from unknown number {}", sender_phone);
            return Err(TournamentError::NoActiveMatch { player_id: None });
        };

        let candidates = matches::list_active_contexts(&tx, player_id)?;
        let draft = self.intake.submit(&sender, raw_text, &candidates)?;
        let stored = reports::insert_report(&tx, &draft)?;

        if !draft.assessment.auto_apply {
            tx.commit()?;
            info!(
                "Report {} queued for match {} (trust {})",
                stored.id, stored.match_id, stored.confidence_score
            );
            return Ok(Submission {
                report: stored,
                applied: false,
                message: messages::queued(),
                advance: None,
            });
        }

        let score = draft
            .assessment
            .validation
            .map_err(TournamentError::InvalidScore)?;
        let completed = complete(&tx, &draft.target, &score)?;
        let report = resolve(&tx, stored.id, ReportStatus::Approved, None)?;
        let advance = advance_if_complete(&tx, &self.bracket, completed.bracket_id, completed.round_number)?;
        tx.commit()?;

        info!("Report {} auto-applied to match {}", report.id, completed.id);
        if let Some(outcome) = &advance {
            log_outcome(outcome);
        }

        let message = approved_message(&draft.target, &completed);
        self.notifier.on_report_resolved(&report, &message);

        Ok(Submission {
            report,
            applied: true,
            message,
            advance,
        })
    }

    /// Director approval. Override scores replace the parsed ones; either
    /// way the scores must satisfy the division's race rule.
    pub fn approve(&self, report_id: ReportId, override_scores: Option<(i32, i32)>) -> TournamentResult<Approval> {
        self.approve_report(report_id, override_scores, false)
    }

    /// Approval that overwrites an already recorded result. Only allowed
    /// while the match's bracket is still on that round.
    pub fn approve_correction(
        &self,
        report_id: ReportId,
        override_scores: Option<(i32, i32)>,
    ) -> TournamentResult<Approval> {
        self.approve_report(report_id, override_scores, true)
    }

    fn approve_report(
        &self,
        report_id: ReportId,
        override_scores: Option<(i32, i32)>,
        correction: bool,
    ) -> TournamentResult<Approval> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = find_report(&tx, report_id)?;
        transition(report.id, report.status, ReportAction::Approve)?;
        let ctx = matches::load_context(&tx, report.match_id)?
            .ok_or_else(|| TournamentError::not_found("Match", report.match_id))?;

        let (player1_score, player2_score) = match override_scores {
            Some((a, b)) => (Some(a), Some(b)),
            None => (report.player1_score, report.player2_score),
        };
        let score = validate(player1_score, player2_score, ctx.match_length)?;

        let match_record = if correction {
            correct(&tx, &ctx, &score)?
        } else {
            complete(&tx, &ctx, &score)?
        };

        reports::update_scores(&tx, report.id, score.player1_score, score.player2_score, winner_of(&ctx, &score)?)?;
        let report = resolve(&tx, report.id, ReportStatus::Approved, None)?;
        let advance = if correction {
            None
        } else {
            advance_if_complete(&tx, &self.bracket, match_record.bracket_id, match_record.round_number)?
        };
        tx.commit()?;

        info!(
            "Report {} approved by director{}",
            report.id,
            if correction { " as a correction" } else { "" }
        );
        if let Some(outcome) = &advance {
            log_outcome(outcome);
        }
        self.notifier
            .on_report_resolved(&report, &approved_message(&ctx, &match_record));

        Ok(Approval {
            report,
            match_record,
            correction,
            advance,
        })
    }

    pub fn reject(&self, report_id: ReportId, reason: Option<&str>) -> TournamentResult<ScoreReport> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = find_report(&tx, report_id)?;
        transition(report.id, report.status, ReportAction::Reject)?;
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let report = resolve(&tx, report.id, ReportStatus::Rejected, reason)?;
        tx.commit()?;

        info!("Report {} rejected", report.id);
        self.notifier
            .on_report_resolved(&report, &messages::rejected(reason));
        Ok(report)
    }

    pub fn request_clarification(&self, report_id: ReportId) -> TournamentResult<ScoreReport> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = find_report(&tx, report_id)?;
        transition(report.id, report.status, ReportAction::RequestClarification)?;
        let ctx = matches::load_context(&tx, report.match_id)?
            .ok_or_else(|| TournamentError::not_found("Match", report.match_id))?;
        let report = reports::request_clarification(&tx, report.id)?.ok_or_else(|| already_resolved(&report))?;
        tx.commit()?;

        let name = |p: &Option<Player>| p.as_ref().map(|p| p.name.clone()).unwrap_or_default();
        let message = messages::needs_clarification(&name(&ctx.player1), &name(&ctx.player2), ctx.match_length);
        info!("Report {} needs clarification", report.id);
        self.notifier.on_clarification_requested(&report, &message);
        Ok(report)
    }

    /// Reports waiting on the director
    pub fn open_reports(&self) -> TournamentResult<Vec<ScoreReport>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(reports::list_open(&conn)?)
    }
}

fn find_report(conn: &Connection, report_id: ReportId) -> TournamentResult<ScoreReport> {
    reports::find_by_id(conn, report_id)?.ok_or_else(|| TournamentError::not_found("Score report", report_id))
}

fn already_resolved(report: &ScoreReport) -> TournamentError {
    TournamentError::ReportAlreadyResolved {
        report_id: report.id,
        status: report.status.as_str(),
    }
}

fn resolve(
    conn: &Connection,
    report_id: ReportId,
    status: ReportStatus,
    notes: Option<&str>,
) -> TournamentResult<ScoreReport> {
    match reports::resolve(conn, report_id, status, notes)? {
        Some(report) => Ok(report),
        None => Err(already_resolved(&find_report(conn, report_id)?)),
    }
}

fn winner_of(ctx: &MatchContext, score: &ValidatedScore) -> TournamentResult<PlayerId> {
    let winner = match score.winning_side {
        Side::Player1 => ctx.record.player1_id,
        Side::Player2 => ctx.record.player2_id,
    };
    winner.ok_or_else(|| TournamentError::InvalidInput(format!("Match {} has an empty slot", ctx.record.id)))
}

fn result_for(ctx: &MatchContext, score: &ValidatedScore) -> TournamentResult<MatchResult> {
    Ok(MatchResult {
        player1_score: score.player1_score,
        player2_score: score.player2_score,
        winner_id: winner_of(ctx, score)?,
        completed_at: now(),
    })
}

/// Guarded completion; losing the race surfaces as MatchAlreadyRecorded
fn complete(conn: &Connection, ctx: &MatchContext, score: &ValidatedScore) -> TournamentResult<Match> {
    let match_id = ctx.record.id;
    if !matches::complete_match(conn, match_id, &result_for(ctx, score)?)? {
        warn!("Match {} was already recorded", match_id);
        return Err(TournamentError::MatchAlreadyRecorded { match_id });
    }
    matches::find_by_id(conn, match_id)?.ok_or_else(|| TournamentError::not_found("Match", match_id))
}

/// Completed matches may be corrected until their bracket leaves the round
fn correct(conn: &Connection, ctx: &MatchContext, score: &ValidatedScore) -> TournamentResult<Match> {
    let match_id = ctx.record.id;
    if ctx.record.status != MatchStatus::Completed {
        return Err(TournamentError::InvalidInput(format!(
            "Match {} has no result to correct",
            match_id
        )));
    }
    let bracket = brackets::find_by_id(conn, ctx.record.bracket_id)?
        .ok_or_else(|| TournamentError::not_found("Bracket", ctx.record.bracket_id))?;

    if bracket.current_round != ctx.record.round_number
        || !matches::correct_result(conn, match_id, &result_for(ctx, score)?)?
    {
        warn!("Match {} can no longer be corrected", match_id);
        return Err(TournamentError::MatchAlreadyRecorded { match_id });
    }
    matches::find_by_id(conn, match_id)?.ok_or_else(|| TournamentError::not_found("Match", match_id))
}

fn approved_message(ctx: &MatchContext, completed: &Match) -> String {
    let winner_name = completed
        .winner_id
        .and_then(|id| ctx.participant_name(id))
        .unwrap_or("Winner");
    let (p1, p2) = (
        completed.player1_score.unwrap_or_default(),
        completed.player2_score.unwrap_or_default(),
    );
    let (winner_score, loser_score) = if completed.winner_id == completed.player1_id {
        (p1, p2)
    } else {
        (p2, p1)
    };
    messages::approved(winner_name, winner_score, loser_score)
}
