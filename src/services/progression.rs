use log::{debug, info};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::bracket::{
    assign_tables, generate_next_round, is_bracket_complete, is_round_complete, matches_in_round, next_match_number,
    route_losers, winner,
};
use crate::config::BracketSettings;
use crate::database::{self, DbPool, brackets, matches};
use crate::domain::{Bracket, BracketId, BracketStatus, BracketType, DivisionId, Match, MatchId, MatchStatus, PlayerId};
use crate::errors::{TournamentError, TournamentResult};

/// Consolation play starts at this round, fed by main round-1 losers
const CONSOLATION_FIRST_ROUND: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    Advanced {
        bracket_id: BracketId,
        round: u32,
        created: Vec<Match>,
        /// Matches opened in the consolation bracket by the same step
        consolation: Vec<Match>,
    },
    /// The bracket had already moved past the requested round
    AlreadyAdvanced { bracket_id: BracketId, current_round: u32 },
    Completed {
        bracket_id: BracketId,
        winner_id: Option<PlayerId>,
    },
}

pub struct ProgressionService {
    pool: DbPool,
    settings: BracketSettings,
}

impl ProgressionService {
    pub fn new(pool: DbPool, settings: BracketSettings) -> Self {
        Self { pool, settings }
    }

    /// Director-triggered advancement. `from_round` pins the round the
    /// caller believes is current, so a repeated call becomes a no-op.
    pub fn advance_round(&self, bracket_id: BracketId, from_round: Option<u32>) -> TournamentResult<AdvanceOutcome> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = advance_bracket(&tx, &self.settings, bracket_id, from_round)?;
        tx.commit()?;

        log_outcome(&outcome);
        Ok(outcome)
    }

    /// Puts a pending match in play, optionally moving it to another table
    pub fn start_match(&self, match_id: MatchId, table_number: Option<u32>) -> TournamentResult<Match> {
        let conn = database::get_connection(&self.pool)?;

        if !matches::start_match(&conn, match_id, table_number)? {
            let current = matches::find_by_id(&conn, match_id)?
                .ok_or_else(|| TournamentError::not_found("Match", match_id))?;
            return Err(match current.status {
                MatchStatus::InProgress => TournamentError::InvalidInput(format!("Match {} is already in progress", match_id)),
                _ => TournamentError::MatchAlreadyRecorded { match_id },
            });
        }

        let started = matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| TournamentError::not_found("Match", match_id))?;
        info!("Match {} started at table {:?}", match_id, started.table_number);
        Ok(started)
    }
}

/// Runs advancement for the round that `match_round` belongs to, if that
/// round just became complete. Called inside the completing transaction.
pub(crate) fn advance_if_complete(
    conn: &Connection,
    settings: &BracketSettings,
    bracket_id: BracketId,
    match_round: u32,
) -> TournamentResult<Option<AdvanceOutcome>> {
    if !settings.auto_advance {
        return Ok(None);
    }

    let all = matches::list_by_bracket(conn, bracket_id)?;
    if !is_round_complete(&all, match_round) {
        debug!("Bracket {} round {} still open", bracket_id, match_round);
        return Ok(None);
    }

    advance_bracket(conn, settings, bracket_id, Some(match_round)).map(Some)
}

pub(crate) fn advance_bracket(
    conn: &Connection,
    settings: &BracketSettings,
    bracket_id: BracketId,
    from_round: Option<u32>,
) -> TournamentResult<AdvanceOutcome> {
    let bracket = brackets::find_by_id(conn, bracket_id)?
        .ok_or_else(|| TournamentError::not_found("Bracket", bracket_id))?;
    let round = from_round.unwrap_or(bracket.current_round);

    if bracket.current_round > round || bracket.status == BracketStatus::Completed {
        return Ok(AdvanceOutcome::AlreadyAdvanced {
            bracket_id,
            current_round: bracket.current_round,
        });
    }
    if bracket.current_round < round {
        return Err(TournamentError::InvalidInput(format!(
            "Bracket {} is still in round {}",
            bracket_id, bracket.current_round
        )));
    }

    let all = matches::list_by_bracket(conn, bracket_id)?;
    if !is_round_complete(&all, round) {
        // Without a pinned round, a freshly generated round means the last
        // advancement already happened
        if from_round.is_none() && is_fresh_round(&all, round) {
            return Ok(AdvanceOutcome::AlreadyAdvanced {
                bracket_id,
                current_round: bracket.current_round,
            });
        }
        return Err(TournamentError::RoundIncomplete { bracket_id, round });
    }

    if is_bracket_complete(&all) {
        brackets::set_status(conn, bracket_id, BracketStatus::Completed)?;
        return Ok(AdvanceOutcome::Completed {
            bracket_id,
            winner_id: winner(&all),
        });
    }

    let resolved = matches_in_round(&all, round);
    let mut next = generate_next_round(&resolved, round + 1, next_match_number(&all, round + 1));
    let first_table = first_free_table(conn, settings, bracket.division_id)?;
    assign_tables(&mut next, first_table);

    if !brackets::advance_round(conn, bracket_id, round, round + 1)? {
        return Ok(AdvanceOutcome::AlreadyAdvanced {
            bracket_id,
            current_round: round + 1,
        });
    }
    let created = matches::insert_matches(conn, bracket_id, &next)?;

    let consolation = if opens_consolation(settings, &bracket, round) {
        open_consolation(conn, settings, &bracket, &resolved)?
    } else {
        Vec::new()
    };

    Ok(AdvanceOutcome::Advanced {
        bracket_id,
        round: round + 1,
        created,
        consolation,
    })
}

/// The previous round is resolved and nothing in `round` has been played yet
fn is_fresh_round(all: &[Match], round: u32) -> bool {
    round > 1
        && is_round_complete(all, round - 1)
        && matches_in_round(all, round)
            .iter()
            .all(|m| matches!(m.status, MatchStatus::Pending | MatchStatus::Bye))
}

fn opens_consolation(settings: &BracketSettings, bracket: &Bracket, round: u32) -> bool {
    settings.consolation_enabled && bracket.bracket_type == BracketType::Main && round == 1
}

/// Seeds the consolation bracket from main round-1 losers. A single loser
/// has nobody to play, so no bracket is opened for them.
fn open_consolation(
    conn: &Connection,
    settings: &BracketSettings,
    main: &Bracket,
    round1: &[Match],
) -> TournamentResult<Vec<Match>> {
    let loser_count = round1.iter().filter(|m| m.loser_id().is_some()).count();
    if loser_count < 2 {
        debug!("Only {} round-1 loser(s), consolation not opened", loser_count);
        return Ok(Vec::new());
    }

    let mut seeded = route_losers(round1, CONSOLATION_FIRST_ROUND, 1);
    let first_table = first_free_table(conn, settings, main.division_id)?;
    assign_tables(&mut seeded, first_table);

    let consolation = brackets::insert_bracket(
        conn,
        main.division_id,
        BracketType::Consolation,
        CONSOLATION_FIRST_ROUND,
        main.seed,
    )?;
    let created = matches::insert_matches(conn, consolation.id, &seeded)?;

    info!(
        "  → Consolation bracket {} opened with {} losers",
        consolation.id, loser_count
    );
    Ok(created)
}

fn first_free_table(
    conn: &Connection,
    settings: &BracketSettings,
    division_id: DivisionId,
) -> TournamentResult<u32> {
    let in_use = matches::max_active_table(conn, division_id)?;
    Ok(in_use.map_or(settings.starting_table, |t| t.saturating_add(1).max(settings.starting_table)))
}

pub(crate) fn log_outcome(outcome: &AdvanceOutcome) {
    match outcome {
        AdvanceOutcome::Advanced {
            bracket_id,
            round,
            created,
            consolation,
        } => info!(
            "Bracket {} advanced to round {} ({} matches, {} consolation)",
            bracket_id,
            round,
            created.len(),
            consolation.len()
        ),
        AdvanceOutcome::AlreadyAdvanced {
            bracket_id,
            current_round,
        } => info!("Bracket {} already at round {}, nothing to do", bracket_id, current_round),
        AdvanceOutcome::Completed { bracket_id, winner_id } => {
            info!("Bracket {} completed, winner {:?}", bracket_id, winner_id)
        }
    }
}
