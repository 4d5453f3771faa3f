use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use serde::{Deserialize, Serialize};

use crate::database::{self, DbPool, divisions, players};
use crate::domain::{Division, PlayerId};

#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<RosterPlayer>,
    #[serde(default)]
    pub divisions: Vec<RosterDivision>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlayer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterDivision {
    pub name: String,
    pub match_length: i32,
    #[serde(default)]
    pub requires_clock: bool,
    /// Player phone numbers or names
    #[serde(default)]
    pub entrants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub players: usize,
    pub divisions: usize,
    pub entries: usize,
}

/// Loads players, divisions and entry lists from a JSON roster.
/// Re-running the same roster leaves the store unchanged.
pub struct ImportService {
    pool: DbPool,
}

impl ImportService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster {}", path.display()))?;
        let roster: Roster = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse roster {}", path.display()))?;
        self.import(&roster)
    }

    pub fn import(&self, roster: &Roster) -> Result<ImportSummary> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        let mut lookup: HashMap<String, PlayerId> = HashMap::new();
        for entry in &roster.players {
            let name = entry.name.trim();
            let player = match (entry.phone.as_deref(), players::find_by_name(&tx, name)?) {
                (None, Some(existing)) => existing,
                (phone, _) => players::upsert_player(&tx, name, phone, entry.email.as_deref())?,
            };
            if let Some(phone) = &player.phone {
                lookup.insert(phone.clone(), player.id);
            }
            lookup.insert(player.name.to_lowercase(), player.id);
            summary.players += 1;
        }
        info!("  → {} players loaded", summary.players);

        for entry in &roster.divisions {
            let division = find_or_create_division(&tx, entry)?;
            for key in &entry.entrants {
                let Some(&player_id) = lookup.get(key.trim()).or_else(|| lookup.get(&key.trim().to_lowercase())) else {
                    bail!("Entrant '{}' of division '{}' is not on the roster", key, entry.name);
                };
                divisions::add_entry(&tx, division.id, player_id)?;
                summary.entries += 1;
            }
            summary.divisions += 1;
        }

        tx.commit().context("Failed to commit roster import")?;
        info!(
            "Roster imported: {} players, {} divisions, {} entries",
            summary.players, summary.divisions, summary.entries
        );
        Ok(summary)
    }
}

fn find_or_create_division(conn: &rusqlite::Connection, entry: &RosterDivision) -> Result<Division> {
    if entry.match_length <= 0 {
        bail!("Division '{}' needs a positive match length", entry.name);
    }
    if let Some(existing) = divisions::find_by_name(conn, &entry.name)? {
        return Ok(existing);
    }
    divisions::insert_division(conn, &entry.name, entry.match_length, entry.requires_clock)
}
