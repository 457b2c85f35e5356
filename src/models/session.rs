// src/models/session.rs

use serde::Serialize;

use crate::models::question::QuizQuestion;

/// How many completed-attempt scores are retained per user.
pub const MAX_STORED_SCORES: usize = 5;

/// Observable phase of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    InProgress,
    Completed,
}

/// Result of grading one submitted answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Index of the next unanswered question (== total when completed).
    pub current_index: usize,
    pub state: QuizState,
    /// Final score, present only once the attempt is completed.
    pub final_score: Option<i64>,
}

/// One quiz attempt for one user. Held in shared application state keyed
/// by user id; never persisted.
///
/// Invariants, maintained by every transition:
/// * `current_index <= questions.len()`
/// * `running_score <= current_index`
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    running_score: i64,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current_index: 0,
            running_score: 0,
        }
    }

    pub fn state(&self) -> QuizState {
        if self.current_index >= self.questions.len() {
            QuizState::Completed
        } else {
            QuizState::InProgress
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn running_score(&self) -> i64 {
        self.running_score
    }

    /// The question awaiting an answer, or `None` once completed.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// Grades `selected` against the current question and advances.
    ///
    /// The index always moves forward, so a question cannot be answered
    /// twice or revisited. Returns `None` when the attempt is already
    /// completed; callers report that instead of panicking.
    pub fn submit_answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        let question = self.questions.get(self.current_index)?;

        let correct = question.is_correct(selected);
        if correct {
            self.running_score += 1;
        }
        self.current_index += 1;

        let state = self.state();
        Some(AnswerOutcome {
            correct,
            current_index: self.current_index,
            state,
            final_score: (state == QuizState::Completed).then_some(self.running_score),
        })
    }
}

/// Appends a completed-attempt score, evicting the oldest entry first when
/// the sequence already holds [`MAX_STORED_SCORES`] values. Insertion order
/// is chronological.
pub fn record_score(scores: &mut Vec<i64>, score: i64) {
    while scores.len() >= MAX_STORED_SCORES {
        scores.remove(0);
    }
    scores.push(score);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: prompt.to_string(),
            options: vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "delta".to_string(),
            ],
            correct_index,
        }
    }

    fn session_with(n: usize) -> QuizSession {
        QuizSession::new((0..n).map(|i| question(&format!("q{}", i), i % 4)).collect())
    }

    fn assert_invariants(s: &QuizSession) {
        assert!(s.current_index() <= s.total_questions());
        assert!(s.running_score() <= s.current_index() as i64);
    }

    #[test]
    fn fresh_session_starts_at_zero() {
        let s = session_with(3);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.running_score(), 0);
        assert_eq!(s.state(), QuizState::InProgress);
        assert_invariants(&s);
    }

    #[test]
    fn correct_answer_increments_score_and_index() {
        let mut s = session_with(3);
        let correct = s.current_question().unwrap().correct_option().to_string();
        let outcome = s.submit_answer(&correct).unwrap();
        assert!(outcome.correct);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.running_score(), 1);
        assert_invariants(&s);
    }

    #[test]
    fn incorrect_answer_increments_only_index() {
        let mut s = session_with(3);
        let outcome = s.submit_answer("not an option").unwrap();
        assert!(!outcome.correct);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.running_score(), 0);
        assert_invariants(&s);
    }

    #[test]
    fn fifteen_questions_ten_correct_completes_at_ten() {
        let mut s = session_with(15);
        for i in 0..15 {
            let answer = if i < 10 {
                s.current_question().unwrap().correct_option().to_string()
            } else {
                "wrong".to_string()
            };
            s.submit_answer(&answer).unwrap();
            assert_invariants(&s);
        }
        assert_eq!(s.state(), QuizState::Completed);
        assert_eq!(s.running_score(), 10);
        assert_eq!(s.current_index(), 15);
    }

    #[test]
    fn completion_reports_final_score_exactly_once() {
        let mut s = session_with(2);
        let first = s.submit_answer("wrong").unwrap();
        assert_eq!(first.final_score, None);
        let last = s.submit_answer("wrong").unwrap();
        assert_eq!(last.state, QuizState::Completed);
        assert_eq!(last.final_score, Some(0));
        // Further submissions are rejected, not a crash.
        assert!(s.submit_answer("wrong").is_none());
        assert_invariants(&s);
    }

    #[test]
    fn empty_question_set_is_immediately_completed() {
        let s = session_with(0);
        assert_eq!(s.state(), QuizState::Completed);
        assert!(s.current_question().is_none());
    }

    #[test]
    fn score_retention_is_trim_then_append() {
        let mut scores = vec![3, 4, 2, 5, 1];
        record_score(&mut scores, 4);
        assert_eq!(scores, vec![4, 2, 5, 1, 4]);
    }

    #[test]
    fn retention_holds_min_of_n_and_five() {
        let mut scores = Vec::new();
        for n in 0..8 {
            record_score(&mut scores, n);
            assert_eq!(scores.len(), usize::min(n as usize + 1, MAX_STORED_SCORES));
        }
        // Last five attempts, chronological.
        assert_eq!(scores, vec![3, 4, 5, 6, 7]);
    }
}
