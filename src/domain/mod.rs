mod aggregates;
pub mod models;

pub use aggregates::{BracketView, DivisionOverview, MatchContext, Sender};
pub use models::*;
