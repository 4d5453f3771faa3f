use rand::Rng;

use super::seeding::shuffle_players;
use crate::domain::{Match, NewMatch, PlayerId};

/// Builds round 1 for a freshly drawn bracket.
///
/// Players are shuffled, the first `next_pow2(n) - n` of them get a bye and
/// the rest are paired in order. Byes take the lowest match numbers. Tables
/// go to every non-bye match, contiguously from `starting_table`.
///
/// Fewer than two players produce no matches.
pub fn generate_round1<R: Rng + ?Sized>(
    players: &[PlayerId],
    starting_table: u32,
    rng: &mut R,
) -> Vec<NewMatch> {
    if players.len() < 2 {
        return Vec::new();
    }

    let shuffled = shuffle_players(players, rng);
    let (bye_players, contenders) = shuffled.split_at(bye_count(shuffled.len()));

    let mut matches: Vec<NewMatch> = bye_players
        .iter()
        .enumerate()
        .map(|(idx, &player)| NewMatch::bye(1, idx as u32 + 1, player))
        .collect();

    let next_number = matches.len() as u32 + 1;
    matches.extend(pair_sequentially(contenders, 1, next_number));

    assign_tables(&mut matches, starting_table);
    matches
}

/// Pairs the winners of a fully resolved round in match-number order.
///
/// Precondition: every match passed in belongs to the same round and is
/// completed or a bye.
pub fn generate_next_round(
    completed: &[Match],
    next_round: u32,
    starting_match_number: u32,
) -> Vec<NewMatch> {
    let winners: Vec<PlayerId> = in_match_order(completed)
        .iter()
        .filter_map(|m| m.winner_id)
        .collect();

    pair_sequentially(&winners, next_round, starting_match_number)
}

/// Pairs the losers of a resolved round for the consolation bracket.
/// Byes contribute no loser.
pub fn route_losers(
    completed: &[Match],
    consolation_round: u32,
    starting_match_number: u32,
) -> Vec<NewMatch> {
    let losers: Vec<PlayerId> = in_match_order(completed)
        .iter()
        .filter_map(|m| m.loser_id())
        .collect();

    pair_sequentially(&losers, consolation_round, starting_match_number)
}

/// Hands out table numbers to playable matches in match-number order
pub fn assign_tables(matches: &mut [NewMatch], starting_table: u32) {
    let mut table = starting_table;
    for new_match in matches.iter_mut().filter(|m| !m.is_bye()) {
        new_match.table_number = Some(table);
        table += 1;
    }
}

pub fn bye_count(player_count: usize) -> usize {
    if player_count < 2 {
        return 0;
    }
    player_count.next_power_of_two() - player_count
}

fn pair_sequentially(entrants: &[PlayerId], round: u32, first_number: u32) -> Vec<NewMatch> {
    entrants
        .chunks(2)
        .zip(first_number..)
        .map(|(chunk, number)| match *chunk {
            [first, second] => NewMatch::pairing(round, number, first, second),
            [single] => NewMatch::bye(round, number, single),
            _ => unreachable!("chunks(2) yields one or two entrants"),
        })
        .collect()
}

fn in_match_order(matches: &[Match]) -> Vec<&Match> {
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by_key(|m| m.match_number);
    ordered
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bracket::seeding::seeded_rng;
    use crate::domain::MatchStatus;
    use chrono::NaiveDateTime;

    pub(crate) fn stored(new_match: &NewMatch, id: i64) -> Match {
        Match {
            id,
            bracket_id: 1,
            round_number: new_match.round_number,
            match_number: new_match.match_number,
            player1_id: new_match.player1_id,
            player2_id: new_match.player2_id,
            winner_id: new_match.winner_id,
            player1_score: None,
            player2_score: None,
            table_number: new_match.table_number,
            status: new_match.status,
            created_at: NaiveDateTime::default(),
            completed_at: None,
        }
    }

    /// Completes every pending match in favour of player1
    pub(crate) fn resolve_for_player1(matches: &[NewMatch]) -> Vec<Match> {
        matches
            .iter()
            .enumerate()
            .map(|(idx, m)| {
                let mut record = stored(m, idx as i64 + 1);
                if record.status == MatchStatus::Pending {
                    record.status = MatchStatus::Completed;
                    record.winner_id = record.player1_id;
                    record.player1_score = Some(9);
                    record.player2_score = Some(3);
                }
                record
            })
            .collect()
    }

    #[test]
    fn test_round1_bye_and_participant_counts() {
        for n in 2..=40usize {
            let players: Vec<PlayerId> = (1..=n as i64).collect();
            let matches = generate_round1(&players, 1, &mut seeded_rng(n as u64));

            let byes = matches.iter().filter(|m| m.is_bye()).count();
            assert_eq!(byes, n.next_power_of_two() - n, "byes for n={n}");

            let participants: usize = matches
                .iter()
                .map(|m| if m.is_bye() { 1 } else { 2 })
                .sum();
            assert_eq!(participants, n, "participants for n={n}");

            let numbers: Vec<u32> = matches.iter().map(|m| m.match_number).collect();
            let expected: Vec<u32> = (1..=matches.len() as u32).collect();
            assert_eq!(numbers, expected, "match numbers for n={n}");
        }
    }

    #[test]
    fn test_round1_byes_come_first_and_win_immediately() {
        let players: Vec<PlayerId> = (1..=5).collect();
        let matches = generate_round1(&players, 1, &mut seeded_rng(3));

        assert_eq!(matches.len(), 4);
        for bye in &matches[..3] {
            assert_eq!(bye.status, MatchStatus::Bye);
            assert_eq!(bye.winner_id, bye.player1_id);
            assert_eq!(bye.player2_id, None);
            assert_eq!(bye.table_number, None);
        }
        assert_eq!(matches[3].status, MatchStatus::Pending);
        assert_eq!(matches[3].winner_id, None);
    }

    #[test]
    fn test_round1_tables_are_contiguous_for_played_matches() {
        let players: Vec<PlayerId> = (1..=12).collect();
        let matches = generate_round1(&players, 5, &mut seeded_rng(11));

        let tables: Vec<u32> = matches.iter().filter_map(|m| m.table_number).collect();
        assert_eq!(tables, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_round1_degenerate_inputs() {
        assert!(generate_round1(&[], 1, &mut seeded_rng(1)).is_empty());
        assert!(generate_round1(&[42], 1, &mut seeded_rng(1)).is_empty());
    }

    #[test]
    fn test_round1_is_reproducible_from_seed() {
        let players: Vec<PlayerId> = (1..=13).collect();

        let first = generate_round1(&players, 1, &mut seeded_rng(2024));
        let second = generate_round1(&players, 1, &mut seeded_rng(2024));

        assert_eq!(first, second);
    }

    #[test]
    fn test_next_round_pairs_winners_in_match_order() {
        let players: Vec<PlayerId> = (1..=8).collect();
        let round1 = resolve_for_player1(&generate_round1(&players, 1, &mut seeded_rng(9)));

        let mut shuffled = round1.clone();
        shuffled.reverse();
        let next = generate_next_round(&shuffled, 2, 1);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].player1_id, round1[0].winner_id);
        assert_eq!(next[0].player2_id, round1[1].winner_id);
        assert_eq!(next[1].player1_id, round1[2].winner_id);
        assert_eq!(next[1].player2_id, round1[3].winner_id);
        assert!(next.iter().all(|m| m.round_number == 2));
        assert_eq!(generate_next_round(&round1, 2, 1), next);
    }

    #[test]
    fn test_next_round_odd_winner_gets_bye() {
        let winners = vec![
            stored(&NewMatch::bye(3, 1, 10), 1),
            stored(&NewMatch::bye(3, 2, 11), 2),
            stored(&NewMatch::bye(3, 3, 12), 3),
        ];
        let next = generate_next_round(&winners, 4, 1);

        assert_eq!(next.len(), 2);
        assert_eq!(next.iter().filter(|m| m.is_bye()).count(), 1);
        assert_eq!(next[1].player1_id, Some(12));
        assert_eq!(next[1].winner_id, Some(12));
    }

    #[test]
    fn test_route_losers_skips_byes() {
        let players: Vec<PlayerId> = (1..=6).collect();
        let round1 = resolve_for_player1(&generate_round1(&players, 1, &mut seeded_rng(4)));

        let consolation = route_losers(&round1, 2, 1);

        // two byes, two played matches -> two losers -> one consolation match
        assert_eq!(consolation.len(), 1);
        assert_eq!(consolation[0].round_number, 2);
        assert_eq!(consolation[0].player1_id, round1[2].player2_id);
        assert_eq!(consolation[0].player2_id, round1[3].player2_id);
    }

    #[test]
    fn test_assign_tables_skips_byes() {
        let mut matches = vec![
            NewMatch::pairing(2, 1, 1, 2),
            NewMatch::bye(2, 2, 3),
            NewMatch::pairing(2, 3, 4, 5),
        ];

        assign_tables(&mut matches, 3);

        assert_eq!(matches[0].table_number, Some(3));
        assert_eq!(matches[1].table_number, None);
        assert_eq!(matches[2].table_number, Some(4));
    }
}
