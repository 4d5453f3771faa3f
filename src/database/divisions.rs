use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::players::parse_player_row;
use super::rows::now;
use crate::domain::{Division, DivisionId, Player, PlayerId};

const DIVISION_COLUMNS: &str = "id, name, match_length, requires_clock, created_at";

pub fn insert_division(
    conn: &Connection,
    name: &str,
    match_length: i32,
    requires_clock: bool,
) -> Result<Division> {
    let sql = format!(
        "INSERT INTO divisions (name, match_length, requires_clock, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING {DIVISION_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![name, match_length, requires_clock, now()],
        parse_division_row,
    )
    .context("Failed to insert division")
}

fn parse_division_row(row: &rusqlite::Row) -> rusqlite::Result<Division> {
    Ok(Division {
        id: row.get(0)?,
        name: row.get(1)?,
        match_length: row.get(2)?,
        requires_clock: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn find_by_id(conn: &Connection, id: DivisionId) -> Result<Option<Division>> {
    let sql = format!("SELECT {DIVISION_COLUMNS} FROM divisions WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_division_row)
        .optional()
        .context("Failed to query division by id")
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Division>> {
    let sql = format!("SELECT {DIVISION_COLUMNS} FROM divisions WHERE name = ?1");

    conn.query_row(&sql, params![name], parse_division_row)
        .optional()
        .context("Failed to query division by name")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Division>> {
    let sql = format!("SELECT {DIVISION_COLUMNS} FROM divisions ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_division_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn add_entry(conn: &Connection, division_id: DivisionId, player_id: PlayerId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO division_entries (division_id, player_id) VALUES (?1, ?2)",
        params![division_id, player_id],
    )
    .context("Failed to add division entry")?;
    Ok(())
}

/// Entrants in a stable order; the draw shuffles them afterwards
pub fn list_entrants(conn: &Connection, division_id: DivisionId) -> Result<Vec<Player>> {
    let sql = "SELECT p.id, p.name, p.phone, p.email, p.created_at FROM players p JOIN division_entries e ON e.player_id = p.id WHERE e.division_id = ?1 ORDER BY p.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![division_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
