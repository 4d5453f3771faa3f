use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::PlayerId;

/// Portable generator so a stored seed reproduces the same draw anywhere
pub type DrawRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> DrawRng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random_seed() -> u64 {
    rand::random()
}

pub fn shuffle_players<R: Rng + ?Sized>(players: &[PlayerId], rng: &mut R) -> Vec<PlayerId> {
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_order() {
        let players: Vec<PlayerId> = (1..=16).collect();

        let first = shuffle_players(&players, &mut seeded_rng(42));
        let second = shuffle_players(&players, &mut seeded_rng(42));

        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_keeps_every_player() {
        let players: Vec<PlayerId> = (1..=9).collect();

        let mut shuffled = shuffle_players(&players, &mut seeded_rng(7));
        shuffled.sort_unstable();

        assert_eq!(shuffled, players);
    }
}
