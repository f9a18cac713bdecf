//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use study_core::model::OutOfRangeError;

/// Errors emitted by the session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no items available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("current item is not multiple choice")]
    NotMultipleChoice,
    #[error("current item is not a flashcard")]
    NotFlashcard,
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),
}

/// Errors emitted while loading previously generated items.
///
/// Non-fatal: the caller stays without a session and may retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by remote item generation.
///
/// Non-fatal: the caller stays without a session and may retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generation produced no items")]
    NoItems,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while recording a flashcard review.
///
/// A remote acknowledgment failure is deliberately absent here: the local
/// phase never rolls back and the failure travels in `ReviewSync::remote`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordReviewError {
    #[error("no item at the current position")]
    NoCurrentItem,
    #[error("a review for this card is already in flight")]
    InFlight,
    #[error("session is not a flashcard review")]
    NotFlashcard,
}

/// Errors emitted by quiz submission.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("{} questions are still unanswered", .unanswered.len())]
    Incomplete { unanswered: Vec<usize> },
    #[error("a submission is already in flight")]
    InFlight,
    #[error("quiz already completed")]
    Completed,
    #[error("session is not a quiz")]
    NotQuiz,
    #[error(transparent)]
    Api(#[from] ApiError),
}
