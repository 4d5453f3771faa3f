use anyhow::Result;

use super::assessment::{Assessment, assess};
use super::selection::select_match;
use crate::config::ReportSettings;
use crate::domain::{MatchContext, PlayerId, Sender};
use crate::errors::TournamentResult;
use crate::scoring::{ConfidenceClassifier, ScoreTextParser};

/// A judged report, ready to be stored and possibly applied
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub target: MatchContext,
    pub raw_text: String,
    pub sender_phone: String,
    pub reporter_id: Option<PlayerId>,
    pub assessment: Assessment,
}

/// Pure front half of score intake: match selection, parsing, validation
/// and trust scoring. Nothing here touches storage.
pub struct ReportIntake {
    parser: ScoreTextParser,
    classifier: ConfidenceClassifier,
}

impl ReportIntake {
    pub fn new(settings: ReportSettings) -> Result<Self> {
        Ok(Self {
            parser: ScoreTextParser::new()?,
            classifier: ConfidenceClassifier::new(settings),
        })
    }

    pub fn submit(
        &self,
        sender: &Sender,
        raw_text: &str,
        candidates: &[MatchContext],
    ) -> TournamentResult<ReportDraft> {
        let target = select_match(sender, raw_text, candidates)?;
        let assessment = self.assess(raw_text, target, sender.player_id());

        Ok(ReportDraft {
            target: target.clone(),
            raw_text: raw_text.to_string(),
            sender_phone: sender.phone.clone(),
            reporter_id: sender.player_id(),
            assessment,
        })
    }

    pub fn assess(&self, raw_text: &str, target: &MatchContext, reporter_id: Option<PlayerId>) -> Assessment {
        let parsed = self.parser.parse(raw_text);
        assess(&self.classifier, parsed, target, reporter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TournamentError;
    use crate::workflow::selection::tests::{context, player};

    #[test]
    fn test_submit_targets_match_named_in_text() {
        let john = player(1, "John Smith");
        let sarah = player(2, "Sarah Lee");
        let mike = player(3, "Mike Brown");
        let candidates = [context(10, &john, &sarah, 0), context(11, &john, &mike, 5)];
        let sender = Sender {
            phone: "+15550001".into(),
            player: Some(john.clone()),
        };

        let intake = ReportIntake::new(ReportSettings::default()).unwrap();
        let draft = intake.submit(&sender, "John 9 Mike 6", &candidates).unwrap();

        assert_eq!(draft.target.record.id, 11);
        assert_eq!(draft.reporter_id, Some(1));
        assert!(draft.assessment.auto_apply);
    }

    #[test]
    fn test_submit_without_active_match() {
        let sender = Sender {
            phone: "+15550002".into(),
            player: None,
        };

        let intake = ReportIntake::new(ReportSettings::default()).unwrap();
        let err = intake.submit(&sender, "9-4", &[]).unwrap_err();

        assert!(matches!(err, TournamentError::NoActiveMatch { player_id: None }));
    }
}
