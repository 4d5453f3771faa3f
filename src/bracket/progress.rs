use std::collections::BTreeSet;

use crate::domain::{Match, PlayerId};

pub fn round_numbers(matches: &[Match]) -> BTreeSet<u32> {
    matches.iter().map(|m| m.round_number).collect()
}

pub fn matches_in_round(matches: &[Match], round: u32) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| m.round_number == round)
        .cloned()
        .collect()
}

/// True iff the round has at least one match and all of them are completed or byes
pub fn is_round_complete(matches: &[Match], round: u32) -> bool {
    let mut in_round = matches.iter().filter(|m| m.round_number == round).peekable();
    in_round.peek().is_some() && in_round.all(|m| m.status.is_resolved())
}

/// Lowest round that is not yet complete, or the highest round when all are.
/// `None` for a bracket without matches.
pub fn current_round(matches: &[Match]) -> Option<u32> {
    let rounds = round_numbers(matches);
    rounds
        .iter()
        .copied()
        .find(|&round| !is_round_complete(matches, round))
        .or_else(|| rounds.last().copied())
}

pub fn is_bracket_complete(matches: &[Match]) -> bool {
    winner(matches).is_some()
}

/// Winner of the sole match in the highest round, once decided
pub fn winner(matches: &[Match]) -> Option<PlayerId> {
    let last_round = round_numbers(matches).last().copied()?;
    let finals = matches_in_round(matches, last_round);

    match finals.as_slice() {
        [final_match] if final_match.status.is_resolved() => final_match.winner_id,
        _ => None,
    }
}

/// Next free match number in a round
pub fn next_match_number(matches: &[Match], round: u32) -> u32 {
    matches
        .iter()
        .filter(|m| m.round_number == round)
        .map(|m| m.match_number)
        .max()
        .unwrap_or(0)
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::pairing::tests::{resolve_for_player1, stored};
    use crate::bracket::{generate_next_round, generate_round1, seeded_rng};
    use crate::domain::{MatchStatus, NewMatch};

    #[test]
    fn test_round_complete_requires_matches() {
        assert!(!is_round_complete(&[], 1));
    }

    #[test]
    fn test_round_complete_with_byes_and_results() {
        let players: Vec<PlayerId> = (1..=5).collect();
        let drawn = generate_round1(&players, 1, &mut seeded_rng(5));
        let pending: Vec<Match> = drawn.iter().enumerate().map(|(i, m)| stored(m, i as i64)).collect();

        assert!(!is_round_complete(&pending, 1));
        assert!(is_round_complete(&resolve_for_player1(&drawn), 1));
        assert!(!is_round_complete(&resolve_for_player1(&drawn), 2));
    }

    #[test]
    fn test_current_round_walks_forward() {
        let players: Vec<PlayerId> = (1..=4).collect();
        let drawn = generate_round1(&players, 1, &mut seeded_rng(8));
        let pending: Vec<Match> = drawn.iter().enumerate().map(|(i, m)| stored(m, i as i64)).collect();
        assert_eq!(current_round(&pending), Some(1));

        let mut matches = resolve_for_player1(&drawn);
        assert_eq!(current_round(&matches), Some(1));

        let round2 = generate_next_round(&matches, 2, 1);
        matches.extend(round2.iter().map(|m| stored(m, 10)));
        assert_eq!(current_round(&matches), Some(2));

        assert_eq!(current_round(&[]), None);
    }

    #[test]
    fn test_bracket_complete_only_with_single_decided_final() {
        assert!(!is_bracket_complete(&[]));

        let mut final_match = stored(&NewMatch::pairing(3, 1, 1, 2), 1);
        assert!(!is_bracket_complete(std::slice::from_ref(&final_match)));

        final_match.status = MatchStatus::Completed;
        final_match.winner_id = Some(2);
        assert!(is_bracket_complete(std::slice::from_ref(&final_match)));
        assert_eq!(winner(std::slice::from_ref(&final_match)), Some(2));

        let mut two_in_last = vec![final_match.clone(), final_match];
        two_in_last[1].match_number = 2;
        assert!(!is_bracket_complete(&two_in_last));
        assert_eq!(winner(&two_in_last), None);
    }

    #[test]
    fn test_full_bracket_runs_to_a_winner() {
        let players: Vec<PlayerId> = (1..=11).collect();
        let mut all = resolve_for_player1(&generate_round1(&players, 1, &mut seeded_rng(77)));
        let mut round = 1;

        while !is_bracket_complete(&all) {
            let finished = matches_in_round(&all, round);
            round += 1;
            let next = generate_next_round(&finished, round, 1);
            assert!(next.iter().filter(|m| m.is_bye()).count() <= 1);
            assert_eq!(next.len(), finished.len().div_ceil(2));
            all.extend(resolve_for_player1(&next));
        }

        assert_eq!(round, 4);
        assert!(winner(&all).is_some());
        assert_eq!(next_match_number(&all, 4), 2);
    }
}
