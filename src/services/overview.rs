use colored::Colorize;

use crate::bracket::{current_round, winner};
use crate::database::{self, DbPool, brackets, divisions, matches};
use crate::domain::{BracketView, DivisionId, DivisionOverview, Match, MatchStatus};
use crate::errors::{TournamentError, TournamentResult};

/// Assembles the division-with-brackets-with-matches read model
pub fn load_overview(pool: &DbPool, division_id: DivisionId) -> TournamentResult<DivisionOverview> {
    let conn = database::get_connection(pool)?;

    let division = divisions::find_by_id(&conn, division_id)?
        .ok_or_else(|| TournamentError::not_found("Division", division_id))?;
    let players = divisions::list_entrants(&conn, division_id)?;

    let brackets = brackets::list_by_division(&conn, division_id)?
        .into_iter()
        .map(|bracket| -> TournamentResult<BracketView> {
            let matches = matches::list_by_bracket(&conn, bracket.id)?;
            let winner_id = winner(&matches);
            Ok(BracketView {
                bracket,
                matches,
                winner_id,
            })
        })
        .collect::<TournamentResult<Vec<_>>>()?;

    Ok(DivisionOverview {
        division,
        players,
        brackets,
    })
}

/// Terminal rendering for the `show` command
pub fn render(overview: &DivisionOverview) -> String {
    let mut out = format!(
        "{} (race to {}, {} players)\n",
        overview.division.name.bold(),
        overview.division.match_length,
        overview.players.len()
    );

    if overview.brackets.is_empty() {
        out.push_str(&format!("  {}\n", "not drawn yet".dimmed()));
    }

    for view in &overview.brackets {
        let round = current_round(&view.matches).unwrap_or(view.bracket.current_round);
        out.push_str(&format!(
            "\n{} bracket, round {} ({})\n",
            view.bracket.bracket_type.to_string().to_uppercase().cyan(),
            round,
            view.bracket.status.as_str()
        ));

        for m in &view.matches {
            out.push_str(&render_match(overview, m));
        }

        if let Some(id) = view.winner_id {
            out.push_str(&format!("  Winner: {}\n", overview.player_name(Some(id)).green().bold()));
        }
    }
    out
}

fn render_match(overview: &DivisionOverview, m: &Match) -> String {
    let player1 = overview.player_name(m.player1_id);
    let player2 = overview.player_name(m.player2_id);
    let table = m.table_number.map(|t| format!("T{}", t)).unwrap_or_default();

    let line = match m.status {
        MatchStatus::Bye => format!("{} (bye)", player1).dimmed().to_string(),
        MatchStatus::Completed => format!(
            "{} {} - {} {}",
            player1,
            m.player1_score.unwrap_or_default(),
            m.player2_score.unwrap_or_default(),
            player2
        )
        .green()
        .to_string(),
        MatchStatus::InProgress => format!("{} vs {}", player1, player2).yellow().to_string(),
        MatchStatus::Pending => format!("{} vs {}", player1, player2),
    };

    format!("  R{}#{:<3} {:<4} {}\n", m.round_number, m.match_number, table, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BracketSettings;
    use crate::database::{create_memory_pool, players, setup};
    use crate::services::draw::DrawService;

    #[test]
    fn test_overview_lists_brackets_and_names() {
        colored::control::set_override(false);
        let pool = create_memory_pool().unwrap();
        let division_id = {
            let conn = pool.get().unwrap();
            setup::ensure_schema(&conn).unwrap();
            let division = divisions::insert_division(&conn, "9-Ball", 9, false).unwrap();
            for name in ["Ann", "Bob", "Cy"] {
                let p = players::upsert_player(&conn, name, None, None).unwrap();
                divisions::add_entry(&conn, division.id, p.id).unwrap();
            }
            division.id
        };

        let empty = load_overview(&pool, division_id).unwrap();
        assert!(render(&empty).contains("not drawn yet"));

        DrawService::new(pool.clone(), BracketSettings::default())
            .draw_division(division_id, Some(4))
            .unwrap();
        let overview = load_overview(&pool, division_id).unwrap();

        assert_eq!(overview.brackets.len(), 1);
        assert_eq!(overview.brackets[0].matches.len(), 2);
        assert_eq!(overview.brackets[0].winner_id, None);

        let text = render(&overview);
        assert!(text.starts_with("9-Ball (race to 9, 3 players)"));
        assert!(text.contains("MAIN bracket, round 1"));
        assert!(text.contains("(bye)"));
        assert!(text.contains(" vs "));

        assert!(matches!(load_overview(&pool, 77), Err(TournamentError::NotFound { .. })));
    }
}
