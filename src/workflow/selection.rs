use crate::domain::{MatchContext, Player, Sender};
use crate::errors::{TournamentError, TournamentResult};

const MIN_NAME_TOKEN_LEN: usize = 3;

/// Picks the match a report is about from the sender's active matches.
///
/// With several candidates (main and consolation at once) the text is
/// scanned for an opponent's name; without a hit the earliest-created
/// match wins.
pub fn select_match<'a>(
    sender: &Sender,
    raw_text: &str,
    candidates: &'a [MatchContext],
) -> TournamentResult<&'a MatchContext> {
    let mut active: Vec<&MatchContext> = candidates
        .iter()
        .filter(|ctx| ctx.record.status.is_active())
        .filter(|ctx| sender.player_id().is_none_or(|id| ctx.record.involves(id)))
        .collect();

    active.sort_by_key(|ctx| (ctx.record.created_at, ctx.record.id));

    let Some(earliest) = active.first().copied() else {
        return Err(TournamentError::NoActiveMatch {
            player_id: sender.player_id(),
        });
    };

    if active.len() == 1 {
        return Ok(earliest);
    }

    let text = raw_text.to_lowercase();
    let picked = find_by(&active, sender, |p| text.contains(&p.name.to_lowercase()))
        .or_else(|| find_by(&active, sender, |p| mentions_name_token(&text, &p.name)))
        .unwrap_or(earliest);

    Ok(picked)
}

fn find_by<'a, F>(active: &[&'a MatchContext], sender: &Sender, mentioned: F) -> Option<&'a MatchContext>
where
    F: Fn(&Player) -> bool,
{
    active
        .iter()
        .copied()
        .find(|ctx| opponents(ctx, sender).any(&mentioned))
}

fn opponents<'a>(ctx: &'a MatchContext, sender: &'a Sender) -> impl Iterator<Item = &'a Player> {
    ctx.participants()
        .filter(move |p| Some(p.id) != sender.player_id())
}

fn mentions_name_token(text: &str, name: &str) -> bool {
    name.split_whitespace()
        .filter(|token| token.chars().count() >= MIN_NAME_TOKEN_LEN)
        .any(|token| text.contains(&token.to_lowercase()))
}
