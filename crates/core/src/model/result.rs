use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("result lists {listed} questions but reports {reported}")]
    QuestionCountMismatch { listed: usize, reported: u32 },

    #[error("per-question correctness ({tallied}) does not match correct count ({reported})")]
    CorrectCountMismatch { tallied: u32, reported: u32 },
}

/// Graded outcome of a single question within a submitted quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub selected_choice: usize,
    pub correct_choice: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Immutable record of a graded quiz attempt, as reported by the remote.
///
/// This snapshot is the single source of truth for a completed session;
/// nothing in it changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    score: f64,
    correct_count: u32,
    total_questions: u32,
    elapsed_seconds: u64,
    questions: Vec<QuestionResult>,
}

impl QuizResult {
    /// Assemble a result from the remote's grading.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` when the reported totals do not align
    /// with the per-question list.
    pub fn new(
        score: f64,
        correct_count: u32,
        total_questions: u32,
        elapsed_seconds: u64,
        questions: Vec<QuestionResult>,
    ) -> Result<Self, QuizResultError> {
        if questions.len() != total_questions as usize {
            return Err(QuizResultError::QuestionCountMismatch {
                listed: questions.len(),
                reported: total_questions,
            });
        }

        let mut tallied = 0_u32;
        for question in &questions {
            if question.is_correct {
                tallied = tallied.saturating_add(1);
            }
        }
        if tallied != correct_count {
            return Err(QuizResultError::CorrectCountMismatch {
                tallied,
                reported: correct_count,
            });
        }

        Ok(Self {
            score,
            correct_count,
            total_questions,
            elapsed_seconds,
            questions,
        })
    }

    /// Unrounded percentage score; display layers round it.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionResult] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(is_correct: bool) -> QuestionResult {
        QuestionResult {
            selected_choice: 0,
            correct_choice: if is_correct { 0 } else { 1 },
            is_correct,
            explanation: None,
        }
    }

    #[test]
    fn result_validates_question_count() {
        let err = QuizResult::new(50.0, 1, 3, 10, vec![question(true), question(false)])
            .unwrap_err();
        assert_eq!(
            err,
            QuizResultError::QuestionCountMismatch {
                listed: 2,
                reported: 3
            }
        );
    }

    #[test]
    fn result_validates_correct_tally() {
        let err = QuizResult::new(50.0, 2, 2, 10, vec![question(true), question(false)])
            .unwrap_err();
        assert_eq!(
            err,
            QuizResultError::CorrectCountMismatch {
                tallied: 1,
                reported: 2
            }
        );
    }

    #[test]
    fn result_exposes_the_remote_grading() {
        let result = QuizResult::new(
            50.0,
            1,
            2,
            83,
            vec![question(true), question(false)],
        )
        .unwrap();

        assert!((result.score() - 50.0).abs() < f64::EPSILON);
        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.total_questions(), 2);
        assert_eq!(result.elapsed_seconds(), 83);
        assert_eq!(result.questions().len(), 2);
    }
}
