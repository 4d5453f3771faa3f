use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const TABLES_IN_DROP_ORDER: [&str; 6] = [
    "score_reports",
    "matches",
    "brackets",
    "division_entries",
    "divisions",
    "players",
];

/// Creates any missing tables, leaving existing data alone
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    for (idx, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }
    Ok(())
}

pub fn reset_database(conn: &Connection) -> Result<()> {
    for table in TABLES_IN_DROP_ORDER {
        execute_sql(conn, &format!("DROP TABLE IF EXISTS {}", table))?;
    }
    ensure_schema(conn)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    #[test]
    fn test_schema_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        reset_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }
}
