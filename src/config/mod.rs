pub mod settings;

pub use settings::{AppConfig, BracketSettings, DatabaseSettings, ReportSettings};
