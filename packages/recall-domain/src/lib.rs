pub mod notify;
pub mod preview;
pub mod trigger;

pub use notify::{NotificationKind, NotificationPayload, NoteMatch, SearchOutcome, Status};
pub use trigger::{Query, TriggerMatcher};
