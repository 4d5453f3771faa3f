pub mod pairing;
pub mod progress;
pub mod seeding;

pub use pairing::{assign_tables, bye_count, generate_next_round, generate_round1, route_losers};
pub use progress::{current_round, is_bracket_complete, is_round_complete, matches_in_round, next_match_number, winner};
pub use seeding::{random_seed, seeded_rng, DrawRng};
