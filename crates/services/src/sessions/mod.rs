mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use view::{ExplanationView, OptionMark, OptionView, QuestionView, SessionView, format_elapsed};
pub use workflow::SessionLoopService;
