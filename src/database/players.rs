use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::rows::now;
use crate::domain::{Player, PlayerId};

const PLAYER_COLUMNS: &str = "id, name, phone, email, created_at";

/// Players are matched on phone when one is given, so re-importing a
/// roster does not duplicate anyone.
pub fn upsert_player(
    conn: &Connection,
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<Player> {
    if let Some(existing) = phone.map(|p| find_by_phone(conn, p)).transpose()?.flatten() {
        if existing.email.is_none() && email.is_some() {
            return update_contact(conn, existing.id, phone, email);
        }
        return Ok(existing);
    }

    insert_new_player(conn, name, phone, email)
}

fn insert_new_player(
    conn: &Connection,
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, phone, email, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, phone, email, now()], parse_player_row)
        .context("Failed to insert new player")
}

/// Contact fields are the only mutable part of a player
pub fn update_contact(
    conn: &Connection,
    id: PlayerId,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<Player> {
    let sql = format!(
        "UPDATE players SET phone = ?1, email = ?2 WHERE id = ?3 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![phone, email, id], parse_player_row)
        .context("Failed to update player contact")
}

pub(crate) fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_phone(conn: &Connection, phone: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE phone = ?1");

    conn.query_row(&sql, params![phone], parse_player_row)
        .optional()
        .context("Failed to query player by phone")
}

/// Oldest player with exactly this name
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1 ORDER BY id LIMIT 1");

    conn.query_row(&sql, params![name], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}
