use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::rows::{now, text_enum};
use crate::domain::{Bracket, BracketId, BracketStatus, BracketType, DivisionId};

const BRACKET_COLUMNS: &str = "id, division_id, bracket_type, current_round, status, seed, created_at";

pub fn insert_bracket(
    conn: &Connection,
    division_id: DivisionId,
    bracket_type: BracketType,
    current_round: u32,
    seed: Option<u64>,
) -> Result<Bracket> {
    let sql = format!(
        "INSERT INTO brackets (division_id, bracket_type, current_round, status, seed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {BRACKET_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            division_id,
            bracket_type.as_str(),
            current_round,
            BracketStatus::InProgress.as_str(),
            seed.map(|s| s as i64),
            now()
        ],
        parse_bracket_row,
    )
    .with_context(|| format!("Failed to insert {} bracket", bracket_type))
}

fn parse_bracket_row(row: &rusqlite::Row) -> rusqlite::Result<Bracket> {
    let seed: Option<i64> = row.get(5)?;
    Ok(Bracket {
        id: row.get(0)?,
        division_id: row.get(1)?,
        bracket_type: text_enum(row, 2)?,
        current_round: row.get(3)?,
        status: text_enum(row, 4)?,
        seed: seed.map(|s| s as u64),
        created_at: row.get(6)?,
    })
}

pub fn find_by_id(conn: &Connection, id: BracketId) -> Result<Option<Bracket>> {
    let sql = format!("SELECT {BRACKET_COLUMNS} FROM brackets WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_bracket_row)
        .optional()
        .context("Failed to query bracket by id")
}

pub fn find_by_type(
    conn: &Connection,
    division_id: DivisionId,
    bracket_type: BracketType,
) -> Result<Option<Bracket>> {
    let sql = format!("SELECT {BRACKET_COLUMNS} FROM brackets WHERE division_id = ?1 AND bracket_type = ?2");

    conn.query_row(&sql, params![division_id, bracket_type.as_str()], parse_bracket_row)
        .optional()
        .context("Failed to query bracket by type")
}

pub fn list_by_division(conn: &Connection, division_id: DivisionId) -> Result<Vec<Bracket>> {
    let sql = format!("SELECT {BRACKET_COLUMNS} FROM brackets WHERE division_id = ?1 ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![division_id], parse_bracket_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Compare-and-swap on the round counter. Returns false when another
/// writer already moved the bracket past `from_round`.
pub fn advance_round(conn: &Connection, id: BracketId, from_round: u32, to_round: u32) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE brackets SET current_round = ?1 WHERE id = ?2 AND current_round = ?3",
            params![to_round, id, from_round],
        )
        .context("Failed to advance bracket round")?;

    Ok(changed == 1)
}

pub fn set_status(conn: &Connection, id: BracketId, status: BracketStatus) -> Result<()> {
    conn.execute(
        "UPDATE brackets SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )
    .context("Failed to update bracket status")?;
    Ok(())
}
