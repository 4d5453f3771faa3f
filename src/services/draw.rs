use log::info;
use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::bracket::{generate_round1, random_seed, seeded_rng};
use crate::config::BracketSettings;
use crate::database::{self, DbPool, brackets, divisions, matches};
use crate::domain::{Bracket, BracketType, DivisionId, Match, PlayerId};
use crate::errors::{TournamentError, TournamentResult};

#[derive(Debug, Clone, Serialize)]
pub struct DrawOutcome {
    pub bracket: Bracket,
    pub matches: Vec<Match>,
}

/// Opens a division's main bracket from its entry list
pub struct DrawService {
    pool: DbPool,
    settings: BracketSettings,
}

impl DrawService {
    pub fn new(pool: DbPool, settings: BracketSettings) -> Self {
        Self { pool, settings }
    }

    /// Shuffles the entrants with `seed` (random when absent) and stores
    /// round 1. The seed is kept on the bracket so the draw can be replayed.
    pub fn draw_division(&self, division_id: DivisionId, seed: Option<u64>) -> TournamentResult<DrawOutcome> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let division = divisions::find_by_id(&tx, division_id)?
            .ok_or_else(|| TournamentError::not_found("Division", division_id))?;

        if brackets::find_by_type(&tx, division_id, BracketType::Main)?.is_some() {
            return Err(TournamentError::InvalidInput(format!(
                "Division '{}' has already been drawn",
                division.name
            )));
        }

        let entrants: Vec<PlayerId> = divisions::list_entrants(&tx, division_id)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if entrants.len() < 2 {
            return Err(TournamentError::InvalidInput(format!(
                "Division '{}' needs at least 2 entrants, has {}",
                division.name,
                entrants.len()
            )));
        }

        let seed = seed.unwrap_or_else(random_seed);
        let round1 = generate_round1(&entrants, self.settings.starting_table, &mut seeded_rng(seed));

        let bracket = brackets::insert_bracket(&tx, division_id, BracketType::Main, 1, Some(seed))?;
        let matches = matches::insert_matches(&tx, bracket.id, &round1)?;
        tx.commit()?;

        info!(
            "Drew '{}': {} entrants, {} round-1 matches, seed {}",
            division.name,
            entrants.len(),
            matches.len(),
            seed
        );
        Ok(DrawOutcome { bracket, matches })
    }
}
