pub mod brackets;
pub mod connection;
pub mod divisions;
pub mod matches;
pub mod players;
pub mod reports;
pub mod rows;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
