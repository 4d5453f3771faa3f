use crate::domain::{ReportId, ReportStatus};
use crate::errors::{TournamentError, TournamentResult};

/// Director or auto-apply action on a score report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Approve,
    Reject,
    RequestClarification,
}

impl ReportAction {
    pub fn target(&self) -> ReportStatus {
        match self {
            ReportAction::Approve => ReportStatus::Approved,
            ReportAction::Reject => ReportStatus::Rejected,
            ReportAction::RequestClarification => ReportStatus::NeedsClarification,
        }
    }
}

/// Approved and rejected are terminal; everything else may move on.
pub fn transition(
    report_id: ReportId,
    from: ReportStatus,
    action: ReportAction,
) -> TournamentResult<ReportStatus> {
    if from.is_terminal() {
        return Err(TournamentError::ReportAlreadyResolved {
            report_id,
            status: from.as_str(),
        });
    }
    Ok(action.target())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reports_accept_every_action() {
        for from in [ReportStatus::Pending, ReportStatus::NeedsClarification] {
            assert_eq!(transition(1, from, ReportAction::Approve).unwrap(), ReportStatus::Approved);
            assert_eq!(transition(1, from, ReportAction::Reject).unwrap(), ReportStatus::Rejected);
            assert_eq!(
                transition(1, from, ReportAction::RequestClarification).unwrap(),
                ReportStatus::NeedsClarification
            );
        }
    }

    #[test]
    fn test_terminal_reports_are_immutable() {
        for from in [ReportStatus::Approved, ReportStatus::Rejected] {
            for action in [ReportAction::Approve, ReportAction::Reject, ReportAction::RequestClarification] {
                let err = transition(4, from, action).unwrap_err();
                assert!(matches!(err, TournamentError::ReportAlreadyResolved { report_id: 4, .. }));
            }
        }
    }
}
