pub mod draw;
pub mod import;
pub mod overview;
pub mod progression;
pub mod reports;
pub mod server;
