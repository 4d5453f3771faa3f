pub mod confidence;
pub mod parser;
pub mod validator;

pub use confidence::ConfidenceClassifier;
pub use parser::{ParsedScore, ScorePattern, ScoreTextParser};
pub use validator::{validate, Side, ValidatedScore, ValidationError};
