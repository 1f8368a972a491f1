use quiz_core::model::QuizSession;

/// How a single answer option should be presented.
///
/// `Correct`/`Incorrect` only appear once the question is confirmed: every
/// correct letter is marked `Correct`, and a chosen letter that is not
/// correct is marked `Incorrect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Selected,
    Correct,
    Incorrect,
}

/// Presentation-agnostic view of one answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: char,
    pub text: String,
    pub mark: OptionMark,
}

/// Explanations revealed after a question is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationView {
    pub correct: String,
    pub wrong: String,
}

/// Presentation-agnostic view of one question.
///
/// This is intentionally **not** a UI view-model:
/// - no markup, no styling classes
/// - no localization assumptions
///
/// The render layer derives whatever widgets it likes from these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub scenario: String,
    pub question_text: String,
    pub is_multi_choice: bool,
    /// How many letters a complete selection contains ("Choose N").
    pub choose_count: usize,
    pub level: Option<u8>,
    pub options: Vec<OptionView>,
    pub can_confirm: bool,
    pub is_confirmed: bool,
    /// Present only once the question is confirmed.
    pub explanation: Option<ExplanationView>,
}

/// Pure projection of the whole session for the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub score: u32,
    pub total: usize,
    pub elapsed_label: String,
    pub question: QuestionView,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

impl SessionView {
    /// Re-derive the view after a mutation. Reads state, never changes it.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let index = session.current_index();
        Self {
            score: session.score(),
            total: session.total_questions(),
            elapsed_label: format_elapsed(session.elapsed_seconds()),
            question: question_view(session, index),
            can_go_previous: index > 0,
            can_go_next: index + 1 < session.total_questions(),
        }
    }
}

fn question_view(session: &QuizSession, index: usize) -> QuestionView {
    let question = session.current_question();
    let selection = session.selection(index);
    let confirmed = session.is_confirmed(index);

    let options = question
        .options
        .iter()
        .map(|option| {
            let chosen = selection.contains(&option.letter);
            let mark = if confirmed {
                if question.is_correct_letter(option.letter) {
                    OptionMark::Correct
                } else if chosen {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Plain
                }
            } else if chosen {
                OptionMark::Selected
            } else {
                OptionMark::Plain
            };
            OptionView {
                letter: option.letter,
                text: option.text.clone(),
                mark,
            }
        })
        .collect();

    QuestionView {
        index,
        scenario: question.scenario.clone(),
        question_text: question.question_text.clone(),
        is_multi_choice: question.is_multi_choice,
        choose_count: question.selection_capacity(),
        level: question.level,
        options,
        can_confirm: session.is_ready_to_confirm(index),
        is_confirmed: confirmed,
        explanation: confirmed.then(|| ExplanationView {
            correct: question.explanation.clone(),
            wrong: question.wrong_explanation.clone(),
        }),
    }
}

/// Formats elapsed active time as `HH:MM:SS`.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, Question};

    fn build_question(correct: &[char], multi: bool) -> Question {
        Question {
            scenario: "scenario".into(),
            question_text: "question".into(),
            options: ('A'..='C')
                .map(|letter| AnswerOption {
                    letter,
                    text: format!("Option {letter}"),
                })
                .collect(),
            correct_answers: correct.to_vec(),
            is_multi_choice: multi,
            explanation: "because".into(),
            wrong_explanation: "not because".into(),
            level: Some(2),
        }
    }

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61), "00:01:01");
        assert_eq!(format_elapsed(3600 + 2 * 60 + 3), "01:02:03");
    }

    #[test]
    fn unconfirmed_selection_is_marked_selected() {
        let mut session = QuizSession::new(vec![build_question(&['B'], false)]).unwrap();
        session.select_option(0, 'A');

        let view = SessionView::from_session(&session);
        assert_eq!(view.question.options[0].mark, OptionMark::Selected);
        assert_eq!(view.question.options[1].mark, OptionMark::Plain);
        assert!(view.question.can_confirm);
        assert!(view.question.explanation.is_none());
    }

    #[test]
    fn confirmed_question_marks_correct_and_incorrect() {
        let mut session = QuizSession::new(vec![build_question(&['B'], false)]).unwrap();
        session.select_option(0, 'A');
        session.confirm(0).unwrap();

        let view = SessionView::from_session(&session);
        // A was chosen and is wrong; B is the right answer; C is untouched.
        assert_eq!(view.question.options[0].mark, OptionMark::Incorrect);
        assert_eq!(view.question.options[1].mark, OptionMark::Correct);
        assert_eq!(view.question.options[2].mark, OptionMark::Plain);
        assert!(!view.question.can_confirm);
        assert_eq!(view.question.explanation.as_ref().unwrap().correct, "because");
    }

    #[test]
    fn navigation_flags_follow_cursor() {
        let mut session = QuizSession::new(vec![
            build_question(&['A'], false),
            build_question(&['B'], false),
        ])
        .unwrap();

        let view = SessionView::from_session(&session);
        assert!(!view.can_go_previous);
        assert!(view.can_go_next);

        session.navigate_to(1);
        let view = SessionView::from_session(&session);
        assert!(view.can_go_previous);
        assert!(!view.can_go_next);
    }
}
