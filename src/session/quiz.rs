use crate::model::{QuizQuestion, UserAnswer};

/// Outcome of an [`QuizSession::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward one question.
    Moved,
    /// The last question was answered; the session is complete.
    Finished,
    /// On the last question but it has no answer yet; nothing happened.
    Pending,
}

/// Per-question display state derived from the answer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionView {
    Unanswered,
    Correct { selected: usize },
    /// Both indices are exposed so the chosen and the correct option can be
    /// highlighted together.
    Incorrect { selected: usize, correct: usize },
}

/// One run through an ordered question list. Nothing here outlives the
/// session: a new quiz always starts from index 0 with an empty answer set.
///
/// The question list must be non-empty; the flow controller rejects empty
/// generation results before a session is created.
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: Vec<UserAnswer>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            answers: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn answer_for(&self, question_index: usize) -> Option<&UserAnswer> {
        self.answers
            .iter()
            .find(|a| a.question_index == question_index)
    }

    pub fn current_answered(&self) -> bool {
        self.answer_for(self.current).is_some()
    }

    /// Record an answer for the current question. A question that already has
    /// an answer keeps it: repeated selections are no-ops, never duplicates.
    /// Returns whether an answer was recorded.
    pub fn select_answer(&mut self, index: usize) -> bool {
        if self.current_answered() || index >= self.current_question().options.len() {
            return false;
        }
        let is_correct = index == self.current_question().correct_answer_index;
        self.answers.push(UserAnswer {
            question_index: self.current,
            selected_answer_index: index,
            is_correct,
        });
        true
    }

    /// Move to the next question, or finish the session from an answered last
    /// question. The answered-last precondition is re-validated here even
    /// though the UI also gates the key.
    pub fn advance(&mut self) -> Advance {
        if !self.is_last() {
            self.current += 1;
            Advance::Moved
        } else if self.current_answered() {
            Advance::Finished
        } else {
            Advance::Pending
        }
    }

    /// Move back one question. Prior answers are kept: navigating backwards
    /// and forwards never clears anything.
    pub fn retreat(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn score_percentage(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn view(&self, question_index: usize) -> QuestionView {
        match self.answer_for(question_index) {
            None => QuestionView::Unanswered,
            Some(a) if a.is_correct => QuestionView::Correct {
                selected: a.selected_answer_index,
            },
            Some(a) => QuestionView::Incorrect {
                selected: a.selected_answer_index,
                correct: self.questions[question_index].correct_answer_index,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: "q?".to_string(),
            options: (0..5).map(|i| format!("op{i}")).collect(),
            correct_answer_index: correct,
            explanation: "e".to_string(),
            banca: "FGV".to_string(),
        }
    }

    #[test]
    fn answering_twice_keeps_single_record() {
        let mut session = QuizSession::new(vec![question(1), question(0)]);
        assert!(session.select_answer(2));
        assert!(!session.select_answer(1));
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].selected_answer_index, 2);
    }

    #[test]
    fn two_question_run_scores_fifty_percent() {
        // Q0 expects option 1, Q1 expects option 0; the user picks 1 both times.
        let mut session = QuizSession::new(vec![question(1), question(0)]);
        assert!(session.select_answer(1));
        assert_eq!(session.advance(), Advance::Moved);
        assert!(session.select_answer(1));
        assert_eq!(session.advance(), Advance::Finished);

        assert_eq!(
            session.answers(),
            &[
                UserAnswer {
                    question_index: 0,
                    selected_answer_index: 1,
                    is_correct: true
                },
                UserAnswer {
                    question_index: 1,
                    selected_answer_index: 1,
                    is_correct: false
                },
            ]
        );
        assert_eq!(session.correct_count(), 1);
        assert!((session.score_percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cannot_finish_from_unanswered_last_question() {
        let mut session = QuizSession::new(vec![question(0)]);
        assert_eq!(session.advance(), Advance::Pending);
        session.select_answer(0);
        assert_eq!(session.advance(), Advance::Finished);
    }

    #[test]
    fn retreat_preserves_answers_and_stops_at_zero() {
        let mut session = QuizSession::new(vec![question(0), question(1)]);
        session.select_answer(0);
        session.advance();
        session.retreat();
        session.retreat();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers().len(), 1);
        // Re-answering after coming back is still rejected
        assert!(!session.select_answer(3));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut session = QuizSession::new(vec![question(0)]);
        assert!(!session.select_answer(5));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn view_reports_both_indices_for_wrong_answers() {
        let mut session = QuizSession::new(vec![question(4)]);
        assert_eq!(session.view(0), QuestionView::Unanswered);
        session.select_answer(1);
        assert_eq!(
            session.view(0),
            QuestionView::Incorrect {
                selected: 1,
                correct: 4
            }
        );
    }

    #[test]
    fn answer_set_never_exceeds_question_count() {
        let mut session = QuizSession::new(vec![question(0), question(0)]);
        for _ in 0..3 {
            session.select_answer(0);
            session.advance();
        }
        assert!(session.answers().len() <= session.len());
    }
}
