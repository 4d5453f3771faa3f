use log::info;

use crate::domain::ScoreReport;

/// Outbound hook for report outcomes. Delivery (SMS, push, ...) belongs to
/// the implementor.
pub trait Notifier: Send + Sync {
    /// Called after every approve or reject, auto-applied ones included
    fn on_report_resolved(&self, report: &ScoreReport, message: &str);

    fn on_clarification_requested(&self, _report: &ScoreReport, _message: &str) {}
}

/// Writes outcomes to the log; used when no delivery channel is configured
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_report_resolved(&self, report: &ScoreReport, message: &str) {
        info!(
            "Report {} ({}) -> {}: {}",
            report.id,
            report.status.as_str(),
            report.sender_phone,
            message
        );
    }

    fn on_clarification_requested(&self, report: &ScoreReport, message: &str) {
        info!("Clarification for report {} -> {}: {}", report.id, report.sender_phone, message);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::Notifier;
    use crate::domain::{ReportId, ScoreReport};

    /// Captures every notification for assertions
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub resolved: Mutex<Vec<(ReportId, String)>>,
        pub clarifications: Mutex<Vec<(ReportId, String)>>,
    }

    impl RecordingNotifier {
        pub fn resolved_messages(&self) -> Vec<String> {
            self.resolved.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn on_report_resolved(&self, report: &ScoreReport, message: &str) {
            self.resolved.lock().unwrap().push((report.id, message.to_string()));
        }

        fn on_clarification_requested(&self, report: &ScoreReport, message: &str) {
            self.clarifications.lock().unwrap().push((report.id, message.to_string()));
        }
    }
}
