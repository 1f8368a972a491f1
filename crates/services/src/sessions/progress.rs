use quiz_core::model::QuizSession;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let total = session.total_questions();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            score: session.score(),
            is_complete: answered == total,
        }
    }
}
