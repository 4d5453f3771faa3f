use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::players;
use super::rows::{now, text_enum};
use crate::domain::{BracketId, DivisionId, Match, MatchContext, MatchId, MatchStatus, NewMatch, PlayerId};

const INSERTED_COLUMNS: &str = "id, bracket_id, round_number, match_number, player1_id, player2_id, winner_id, player1_score, player2_score, table_number, status, created_at, completed_at";
const MATCH_COLUMNS: &str = "m.id, m.bracket_id, m.round_number, m.match_number, m.player1_id, m.player2_id, m.winner_id, m.player1_score, m.player2_score, m.table_number, m.status, m.created_at, m.completed_at";

/// Final result written onto a match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub player1_score: i32,
    pub player2_score: i32,
    pub winner_id: PlayerId,
    pub completed_at: NaiveDateTime,
}

pub fn insert_matches(conn: &Connection, bracket_id: BracketId, new_matches: &[NewMatch]) -> Result<Vec<Match>> {
    let sql = format!(
        "INSERT INTO matches (bracket_id, round_number, match_number, player1_id, player2_id, winner_id, table_number, status, created_at, completed_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING {INSERTED_COLUMNS}"
    );
    let created_at = now();

    new_matches
        .iter()
        .map(|m| {
            let completed_at = m.is_bye().then_some(created_at);
            conn.query_row(
                &sql,
                params![
                    bracket_id,
                    m.round_number,
                    m.match_number,
                    m.player1_id,
                    m.player2_id,
                    m.winner_id,
                    m.table_number,
                    m.status.as_str(),
                    created_at,
                    completed_at
                ],
                parse_match_row,
            )
            .with_context(|| format!("Failed to insert match {}/{}", m.round_number, m.match_number))
        })
        .collect()
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        bracket_id: row.get(1)?,
        round_number: row.get(2)?,
        match_number: row.get(3)?,
        player1_id: row.get(4)?,
        player2_id: row.get(5)?,
        winner_id: row.get(6)?,
        player1_score: row.get(7)?,
        player2_score: row.get(8)?,
        table_number: row.get(9)?,
        status: text_enum(row, 10)?,
        created_at: row.get(11)?,
        completed_at: row.get(12)?,
    })
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches m WHERE m.id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_bracket(conn: &Connection, bracket_id: BracketId) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches m WHERE m.bracket_id = ?1 ORDER BY m.round_number, m.match_number"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![bracket_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Pending and in-progress matches the player sits in, oldest first
pub fn list_active_contexts(conn: &Connection, player_id: PlayerId) -> Result<Vec<MatchContext>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS}, d.match_length, b.bracket_type FROM matches m JOIN brackets b ON b.id = m.bracket_id JOIN divisions d ON d.id = b.division_id WHERE (m.player1_id = ?1 OR m.player2_id = ?1) AND m.status IN ('pending', 'in_progress') ORDER BY m.created_at, m.id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_context_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(record, match_length, bracket_type)| build_context(conn, record, match_length, bracket_type))
        .collect()
}

pub fn load_context(conn: &Connection, match_id: MatchId) -> Result<Option<MatchContext>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS}, d.match_length, b.bracket_type FROM matches m JOIN brackets b ON b.id = m.bracket_id JOIN divisions d ON d.id = b.division_id WHERE m.id = ?1"
    );

    let row = conn
        .query_row(&sql, params![match_id], parse_context_row)
        .optional()
        .context("Failed to load match context")?;

    row.map(|(record, match_length, bracket_type)| build_context(conn, record, match_length, bracket_type))
        .transpose()
}

type ContextRow = (Match, i32, crate::domain::BracketType);

fn parse_context_row(row: &rusqlite::Row) -> rusqlite::Result<ContextRow> {
    Ok((parse_match_row(row)?, row.get(13)?, text_enum(row, 14)?))
}

fn build_context(
    conn: &Connection,
    record: Match,
    match_length: i32,
    bracket_type: crate::domain::BracketType,
) -> Result<MatchContext> {
    let player1 = record.player1_id.map(|id| players::find_by_id(conn, id)).transpose()?.flatten();
    let player2 = record.player2_id.map(|id| players::find_by_id(conn, id)).transpose()?.flatten();

    Ok(MatchContext {
        record,
        player1,
        player2,
        match_length,
        bracket_type,
    })
}

/// Highest table currently handed to an unfinished match in the division
pub fn max_active_table(conn: &Connection, division_id: DivisionId) -> Result<Option<u32>> {
    conn.query_row(
        "SELECT MAX(m.table_number) FROM matches m JOIN brackets b ON b.id = m.bracket_id WHERE b.division_id = ?1 AND m.status IN ('pending', 'in_progress')",
        params![division_id],
        |row| row.get(0),
    )
    .context("Failed to query tables in use")
}

/// Guarded pending/in_progress -> completed transition.
/// Returns false when the match was already resolved by someone else.
pub fn complete_match(conn: &Connection, id: MatchId, result: &MatchResult) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET player1_score = ?1, player2_score = ?2, winner_id = ?3, status = 'completed', completed_at = ?4 WHERE id = ?5 AND status IN ('pending', 'in_progress')",
            params![
                result.player1_score,
                result.player2_score,
                result.winner_id,
                result.completed_at,
                id
            ],
        )
        .context("Failed to complete match")?;

    Ok(changed == 1)
}

/// Overwrites the result of an already completed match
pub fn correct_result(conn: &Connection, id: MatchId, result: &MatchResult) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET player1_score = ?1, player2_score = ?2, winner_id = ?3, completed_at = ?4 WHERE id = ?5 AND status = 'completed'",
            params![
                result.player1_score,
                result.player2_score,
                result.winner_id,
                result.completed_at,
                id
            ],
        )
        .context("Failed to correct match result")?;

    Ok(changed == 1)
}

/// pending -> in_progress, optionally moving the match to another table
pub fn start_match(conn: &Connection, id: MatchId, table_number: Option<u32>) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE matches SET status = ?1, table_number = COALESCE(?2, table_number) WHERE id = ?3 AND status = 'pending'",
            params![MatchStatus::InProgress.as_str(), table_number, id],
        )
        .context("Failed to start match")?;

    Ok(changed == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{brackets, create_memory_pool, divisions, setup};
    use crate::domain::BracketType;

    #[test]
    fn test_complete_match_only_once() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        setup::ensure_schema(&conn).unwrap();

        let division = divisions::insert_division(&conn, "8-Ball", 5, false).unwrap();
        let a = players::upsert_player(&conn, "Ann", None, None).unwrap();
        let b = players::upsert_player(&conn, "Bob", None, None).unwrap();
        let bracket = brackets::insert_bracket(&conn, division.id, BracketType::Main, 1, Some(u64::MAX)).unwrap();
        assert_eq!(bracket.seed, Some(u64::MAX));

        let inserted = insert_matches(&conn, bracket.id, &[NewMatch::pairing(1, 1, a.id, b.id)]).unwrap();
        let id = inserted[0].id;

        assert!(start_match(&conn, id, Some(4)).unwrap());
        assert!(!start_match(&conn, id, None).unwrap());

        let result = MatchResult {
            player1_score: 5,
            player2_score: 2,
            winner_id: a.id,
            completed_at: now(),
        };
        assert!(complete_match(&conn, id, &result).unwrap());
        assert!(!complete_match(&conn, id, &result).unwrap());

        let stored = find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Completed);
        assert_eq!(stored.table_number, Some(4));
        assert_eq!(stored.winner_id, Some(a.id));
        assert!(list_active_contexts(&conn, a.id).unwrap().is_empty());
    }

    #[test]
    fn test_match_key_is_unique() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        setup::ensure_schema(&conn).unwrap();

        let division = divisions::insert_division(&conn, "8-Ball", 5, false).unwrap();
        let a = players::upsert_player(&conn, "Ann", None, None).unwrap();
        let bracket = brackets::insert_bracket(&conn, division.id, BracketType::Main, 1, None).unwrap();

        insert_matches(&conn, bracket.id, &[NewMatch::bye(1, 1, a.id)]).unwrap();
        assert!(insert_matches(&conn, bracket.id, &[NewMatch::bye(1, 1, a.id)]).is_err());
    }

    #[test]
    fn test_active_contexts_carry_players_and_race() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        setup::ensure_schema(&conn).unwrap();

        let division = divisions::insert_division(&conn, "9-Ball", 7, false).unwrap();
        let a = players::upsert_player(&conn, "Ann", None, None).unwrap();
        let b = players::upsert_player(&conn, "Bob", None, None).unwrap();
        let bracket = brackets::insert_bracket(&conn, division.id, BracketType::Consolation, 2, None).unwrap();
        let inserted = insert_matches(&conn, bracket.id, &[NewMatch::pairing(2, 1, a.id, b.id)]).unwrap();

        let contexts = list_active_contexts(&conn, b.id).unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].match_length, 7);
        assert_eq!(contexts[0].bracket_type, BracketType::Consolation);
        assert_eq!(contexts[0].player1.as_ref().unwrap().name, "Ann");

        let loaded = load_context(&conn, inserted[0].id).unwrap().unwrap();
        assert_eq!(loaded, contexts[0]);
    }
}
