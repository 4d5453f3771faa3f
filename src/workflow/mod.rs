pub mod assessment;
pub mod intake;
pub mod messages;
pub mod notifier;
pub mod selection;
pub mod state;

pub use assessment::{Assessment, assess, bind_name, resolve_winner};
pub use intake::{ReportDraft, ReportIntake};
pub use notifier::{LogNotifier, Notifier};
pub use selection::select_match;
pub use state::{ReportAction, transition};
