use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::rows::{now, text_enum};
use crate::domain::{PlayerId, ReportId, ReportStatus, ScoreReport};
use crate::workflow::ReportDraft;

const REPORT_COLUMNS: &str = "id, match_id, raw_text, sender_phone, reporter_id, player1_score, player2_score, winner_id, parse_confidence, confidence_score, status, notes, created_at, resolved_at";

/// Stores a judged draft as a pending report
pub fn insert_report(conn: &Connection, draft: &ReportDraft) -> Result<ScoreReport> {
    let sql = format!(
        "INSERT INTO score_reports (match_id, raw_text, sender_phone, reporter_id, player1_score, player2_score, winner_id, parse_confidence, confidence_score, status, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) RETURNING {REPORT_COLUMNS}"
    );
    let assessment = &draft.assessment;

    conn.query_row(
        &sql,
        params![
            draft.target.record.id,
            draft.raw_text,
            draft.sender_phone,
            draft.reporter_id,
            assessment.player1_score,
            assessment.player2_score,
            assessment.winner_id,
            assessment.confidence().as_str(),
            assessment.trust,
            ReportStatus::Pending.as_str(),
            assessment.notes(),
            now()
        ],
        parse_report_row,
    )
    .context("Failed to insert score report")
}

fn parse_report_row(row: &rusqlite::Row) -> rusqlite::Result<ScoreReport> {
    Ok(ScoreReport {
        id: row.get(0)?,
        match_id: row.get(1)?,
        raw_text: row.get(2)?,
        sender_phone: row.get(3)?,
        reporter_id: row.get(4)?,
        player1_score: row.get(5)?,
        player2_score: row.get(6)?,
        winner_id: row.get(7)?,
        parse_confidence: text_enum(row, 8)?,
        confidence_score: row.get(9)?,
        status: text_enum(row, 10)?,
        notes: row.get(11)?,
        created_at: row.get(12)?,
        resolved_at: row.get(13)?,
    })
}

pub fn find_by_id(conn: &Connection, id: ReportId) -> Result<Option<ScoreReport>> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM score_reports WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_report_row)
        .optional()
        .context("Failed to query score report by id")
}

/// Reports waiting on the director, oldest first
pub fn list_open(conn: &Connection) -> Result<Vec<ScoreReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM score_reports WHERE status IN ('pending', 'needs_clarification') ORDER BY created_at, id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_report_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Guarded open -> approved/rejected transition. None when the report was
/// already resolved by another writer.
pub fn resolve(
    conn: &Connection,
    id: ReportId,
    status: ReportStatus,
    notes: Option<&str>,
) -> Result<Option<ScoreReport>> {
    let sql = format!(
        "UPDATE score_reports SET status = ?1, notes = COALESCE(?2, notes), resolved_at = ?3 WHERE id = ?4 AND status IN ('pending', 'needs_clarification') RETURNING {REPORT_COLUMNS}"
    );

    conn.query_row(&sql, params![status.as_str(), notes, now(), id], parse_report_row)
        .optional()
        .context("Failed to resolve score report")
}

pub fn request_clarification(conn: &Connection, id: ReportId) -> Result<Option<ScoreReport>> {
    let sql = format!(
        "UPDATE score_reports SET status = 'needs_clarification' WHERE id = ?1 AND status IN ('pending', 'needs_clarification') RETURNING {REPORT_COLUMNS}"
    );

    conn.query_row(&sql, params![id], parse_report_row)
        .optional()
        .context("Failed to flag score report for clarification")
}

/// Rewrites the scores a director settled on before approval
pub fn update_scores(
    conn: &Connection,
    id: ReportId,
    player1_score: i32,
    player2_score: i32,
    winner_id: PlayerId,
) -> Result<()> {
    conn.execute(
        "UPDATE score_reports SET player1_score = ?1, player2_score = ?2, winner_id = ?3 WHERE id = ?4",
        params![player1_score, player2_score, winner_id, id],
    )
    .context("Failed to update report scores")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportSettings;
    use crate::database::{brackets, create_memory_pool, divisions, matches, players, setup};
    use crate::domain::{BracketType, NewMatch, Sender};
    use crate::workflow::ReportIntake;

    #[test]
    fn test_report_resolves_once() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        setup::ensure_schema(&conn).unwrap();

        let division = divisions::insert_division(&conn, "8-Ball", 5, false).unwrap();
        let ann = players::upsert_player(&conn, "Ann Lee", Some("+1001"), None).unwrap();
        let bob = players::upsert_player(&conn, "Bob Ray", Some("+1002"), None).unwrap();
        let bracket = brackets::insert_bracket(&conn, division.id, BracketType::Main, 1, None).unwrap();
        matches::insert_matches(&conn, bracket.id, &[NewMatch::pairing(1, 1, ann.id, bob.id)]).unwrap();

        let candidates = matches::list_active_contexts(&conn, ann.id).unwrap();
        let sender = Sender {
            phone: "+1001".to_string(),
            player: Some(ann.clone()),
        };
        let intake = ReportIntake::new(ReportSettings::default()).unwrap();
        let draft = intake.submit(&sender, "3-5", &candidates).unwrap();

        let report = insert_report(&conn, &draft).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.confidence_score, 60);
        assert_eq!(list_open(&conn).unwrap().len(), 1);

        let flagged = request_clarification(&conn, report.id).unwrap().unwrap();
        assert_eq!(flagged.status, ReportStatus::NeedsClarification);

        let rejected = resolve(&conn, report.id, ReportStatus::Rejected, Some("wrong match")).unwrap().unwrap();
        assert_eq!(rejected.notes.as_deref(), Some("wrong match"));
        assert!(rejected.resolved_at.is_some());

        assert!(resolve(&conn, report.id, ReportStatus::Approved, None).unwrap().is_none());
        assert!(list_open(&conn).unwrap().is_empty());
    }
}
