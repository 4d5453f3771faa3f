use serde::Serialize;

use crate::domain::{MatchContext, ParseConfidence, Player, PlayerId};
use crate::scoring::{
    ConfidenceClassifier, ParsedScore, ScorePattern, Side, ValidatedScore, ValidationError, validate,
};

/// Everything decided about one report before it is stored.
/// Scores here are oriented to the match's player1/player2.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub parsed: ParsedScore,
    pub player1_score: Option<i32>,
    pub player2_score: Option<i32>,
    pub validation: Result<ValidatedScore, ValidationError>,
    pub trust: u8,
    pub winner_id: Option<PlayerId>,
    pub auto_apply: bool,
}

impl Assessment {
    pub fn confidence(&self) -> ParseConfidence {
        self.parsed.confidence()
    }

    /// Parse or validation problem worth showing to the director
    pub fn notes(&self) -> Option<String> {
        self.parsed
            .error
            .clone()
            .or_else(|| self.validation.as_ref().err().map(|e| e.to_string()))
    }
}

pub fn assess(
    classifier: &ConfidenceClassifier,
    parsed: ParsedScore,
    ctx: &MatchContext,
    reporter_id: Option<PlayerId>,
) -> Assessment {
    let (player1_score, player2_score) = orient_scores(&parsed, ctx, reporter_id);
    let validation = validate(player1_score, player2_score, ctx.match_length);
    let trust = classifier.trust_score(parsed.confidence(), &validation);
    let winner_id = resolve_winner(&parsed, ctx, player1_score, player2_score);

    let auto_apply = classifier.should_auto_apply(trust, winner_id, player1_score, player2_score)
        && winner_agrees_with_scores(ctx, winner_id, &validation);

    Assessment {
        parsed,
        player1_score,
        player2_score,
        validation,
        trust,
        winner_id,
        auto_apply,
    }
}

/// Named winner first, then the higher score, otherwise unbound
pub fn resolve_winner(
    parsed: &ParsedScore,
    ctx: &MatchContext,
    player1_score: Option<i32>,
    player2_score: Option<i32>,
) -> Option<PlayerId> {
    if let Some(id) = parsed.winner_name.as_deref().and_then(|name| bind_name(name, ctx)) {
        return Some(id);
    }

    match (player1_score, player2_score) {
        (Some(a), Some(b)) if a > b => ctx.record.player1_id,
        (Some(a), Some(b)) if b > a => ctx.record.player2_id,
        _ => None,
    }
}

/// Maps a name from the text onto one of the match participants by
/// case-insensitive substring. An exact word match breaks ties.
pub fn bind_name(name: &str, ctx: &MatchContext) -> Option<PlayerId> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let hits: Vec<&Player> = ctx
        .participants()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();

    match hits.as_slice() {
        [] => None,
        [only] => Some(only.id),
        _ => hits
            .iter()
            .find(|p| {
                let full = p.name.to_lowercase();
                full == needle || full.split_whitespace().any(|word| word == needle)
            })
            .map(|p| p.id),
    }
}

fn orient_scores(
    parsed: &ParsedScore,
    ctx: &MatchContext,
    reporter_id: Option<PlayerId>,
) -> (Option<i32>, Option<i32>) {
    let (first, second) = (parsed.player1_score, parsed.player2_score);
    if first_text_side_is_player2(parsed, ctx, reporter_id) {
        (second, first)
    } else {
        (first, second)
    }
}

fn first_text_side_is_player2(
    parsed: &ParsedScore,
    ctx: &MatchContext,
    reporter_id: Option<PlayerId>,
) -> bool {
    let bound_first = parsed.player1_name.as_deref().and_then(|n| bind_name(n, ctx));
    if let Some(id) = bound_first {
        return ctx.record.player2_id == Some(id);
    }

    let bound_second = parsed.player2_name.as_deref().and_then(|n| bind_name(n, ctx));
    if let Some(id) = bound_second {
        return ctx.record.player1_id == Some(id);
    }

    // Bare "9-4" is read as the reporter's score first
    parsed.pattern == ScorePattern::BareScores
        && reporter_id.is_some()
        && ctx.record.player2_id == reporter_id
}

fn winner_agrees_with_scores(
    ctx: &MatchContext,
    winner_id: Option<PlayerId>,
    validation: &Result<ValidatedScore, ValidationError>,
) -> bool {
    let Ok(score) = validation else {
        return false;
    };
    let expected = match score.winning_side {
        Side::Player1 => ctx.record.player1_id,
        Side::Player2 => ctx.record.player2_id,
    };
    winner_id.is_some() && winner_id == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportSettings;
    use crate::scoring::ScoreTextParser;
    use crate::workflow::selection::tests::{context, player};

    fn run(text: &str, ctx: &MatchContext, reporter: Option<PlayerId>) -> Assessment {
        let parser = ScoreTextParser::new().unwrap();
        let classifier = ConfidenceClassifier::new(ReportSettings::default());
        assess(&classifier, parser.parse(text), ctx, reporter)
    }

    #[test]
    fn test_named_scores_auto_apply() {
        let ctx = context(1, &player(1, "John Smith"), &player(2, "Sarah Lee"), 0);

        let a = run("John 9 Sarah 4", &ctx, Some(1));

        assert_eq!(a.trust, 90);
        assert_eq!(a.winner_id, Some(1));
        assert_eq!((a.player1_score, a.player2_score), (Some(9), Some(4)));
        assert!(a.auto_apply);
        assert_eq!(a.notes(), None);
    }

    #[test]
    fn test_named_scores_reoriented_to_match_sides() {
        let ctx = context(1, &player(1, "John Smith"), &player(2, "Sarah Lee"), 0);

        let a = run("sarah 9 john 4", &ctx, Some(1));

        assert_eq!((a.player1_score, a.player2_score), (Some(4), Some(9)));
        assert_eq!(a.winner_id, Some(2));
        assert!(a.auto_apply);
    }

    #[test]
    fn test_invalid_race_caps_trust_and_queues() {
        let ctx = context(1, &player(1, "Mike Brown"), &player(2, "Lisa Gray"), 0);

        let a = run("Mike beat Lisa 7-2", &ctx, Some(1));

        assert_eq!(a.trust, 40);
        assert_eq!(a.winner_id, Some(1));
        assert!(!a.auto_apply);
        assert_eq!(a.validation, Err(ValidationError::NoWinningScore { race_to: 9 }));
        assert!(a.notes().unwrap().contains("race to 9"));
    }

    #[test]
    fn test_named_winner_binds_loser_side() {
        let ctx = context(1, &player(1, "Mike Brown"), &player(2, "Lisa Gray"), 0);

        let a = run("Lisa beat Mike 9-5", &ctx, Some(2));

        assert_eq!((a.player1_score, a.player2_score), (Some(5), Some(9)));
        assert_eq!(a.winner_id, Some(2));
        assert!(a.auto_apply);
    }

    #[test]
    fn test_bare_scores_read_reporter_first_and_queue() {
        let ctx = context(1, &player(1, "Mike Brown"), &player(2, "Lisa Gray"), 0);

        let a = run("9-3", &ctx, Some(2));

        assert_eq!(a.trust, 60);
        assert_eq!((a.player1_score, a.player2_score), (Some(3), Some(9)));
        assert_eq!(a.winner_id, Some(2));
        assert!(!a.auto_apply);
    }

    #[test]
    fn test_unparsed_text_stays_unbound() {
        let ctx = context(1, &player(1, "Mike Brown"), &player(2, "Lisa Gray"), 0);

        let a = run("we're done table 5", &ctx, Some(1));

        assert_eq!(a.trust, 30);
        assert_eq!(a.winner_id, None);
        assert!(!a.auto_apply);
        assert_eq!(a.notes().as_deref(), Some("Could not parse score from message"));
    }

    #[test]
    fn test_bind_name_prefers_whole_word_on_ambiguity() {
        let ctx = context(1, &player(1, "Johnny Cash"), &player(2, "John Smith"), 0);

        assert_eq!(bind_name("john", &ctx), Some(2));
        assert_eq!(bind_name("cash", &ctx), Some(1));
        assert_eq!(bind_name("", &ctx), None);
        assert_eq!(bind_name("zed", &ctx), None);
    }
}
