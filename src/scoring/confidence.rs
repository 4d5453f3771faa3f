use super::validator::{ValidatedScore, ValidationError};
use crate::config::ReportSettings;
use crate::domain::{ParseConfidence, PlayerId};

/// Turns parser confidence and the race-rule verdict into a 0-100 trust
/// score, and decides whether a report may skip the director.
#[derive(Debug, Clone)]
pub struct ConfidenceClassifier {
    settings: ReportSettings,
}

impl ConfidenceClassifier {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn trust_score(
        &self,
        confidence: ParseConfidence,
        validation: &Result<ValidatedScore, ValidationError>,
    ) -> u8 {
        let base = match confidence {
            ParseConfidence::High => self.settings.high_trust,
            ParseConfidence::Medium => self.settings.medium_trust,
            ParseConfidence::Low => self.settings.low_trust,
        };

        match validation {
            Ok(_) => base,
            Err(_) => base.min(self.settings.invalid_score_cap),
        }
    }

    pub fn should_auto_apply(
        &self,
        trust: u8,
        winner: Option<PlayerId>,
        player1_score: Option<i32>,
        player2_score: Option<i32>,
    ) -> bool {
        trust >= self.settings.auto_apply_threshold
            && winner.is_some()
            && player1_score.is_some()
            && player2_score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::validate;

    fn classifier() -> ConfidenceClassifier {
        ConfidenceClassifier::new(ReportSettings::default())
    }

    #[test]
    fn test_trust_by_parse_confidence() {
        let valid = validate(Some(9), Some(4), 9);
        let c = classifier();

        assert_eq!(c.trust_score(ParseConfidence::High, &valid), 90);
        assert_eq!(c.trust_score(ParseConfidence::Medium, &valid), 60);
        assert_eq!(c.trust_score(ParseConfidence::Low, &valid), 30);
    }

    #[test]
    fn test_invalid_score_caps_trust() {
        let invalid = validate(Some(7), Some(2), 9);
        let c = classifier();

        assert_eq!(c.trust_score(ParseConfidence::High, &invalid), 40);
        assert_eq!(c.trust_score(ParseConfidence::Medium, &invalid), 40);
        assert_eq!(c.trust_score(ParseConfidence::Low, &invalid), 30);
    }

    #[test]
    fn test_auto_apply_needs_trust_winner_and_scores() {
        let c = classifier();

        assert!(c.should_auto_apply(90, Some(1), Some(9), Some(4)));
        assert!(!c.should_auto_apply(89, Some(1), Some(9), Some(4)));
        assert!(!c.should_auto_apply(90, None, Some(9), Some(4)));
        assert!(!c.should_auto_apply(90, Some(1), None, Some(4)));
    }
}
