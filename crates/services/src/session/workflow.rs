use std::sync::Arc;

use api::{ApiError, NoteSummary, StudyApi};
use study_core::Clock;
use study_core::model::{Item, ItemId, ItemStore, NoteId, QuizResult, Response, ReviewOutcome};

use super::service::{AssessmentSession, SessionKind};
use crate::error::{GenerationError, LoadError, RecordReviewError, SessionError, SubmitError};

/// Outcome of recording one flashcard review.
///
/// The local phase has already succeeded when this value exists; the
/// remote acknowledgment is a separate step whose failure is reported
/// here and never rolls the local phase back.
#[derive(Debug)]
pub struct ReviewSync {
    /// The card's response state after the local phase.
    pub response: Response,
    /// Result of the best-effort acknowledgment.
    pub remote: Result<(), ApiError>,
}

/// Orchestrates sessions against the remote study service.
///
/// Local state mutates optimistically; remote calls carry no retry logic
/// and a failed call is re-triggered by the user, not the workflow.
#[derive(Clone)]
pub struct SessionWorkflow {
    api: Arc<dyn StudyApi>,
    clock: Clock,
}

impl SessionWorkflow {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>, clock: Clock) -> Self {
        Self { api, clock }
    }

    /// List the notes available as study subjects.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the listing cannot be fetched.
    pub async fn notes(&self) -> Result<Vec<NoteSummary>, LoadError> {
        Ok(self.api.list_notes().await?)
    }

    /// Load previously generated flashcards for a note.
    ///
    /// A note with no flashcards yet is a normal first-time state, not an
    /// error: both a missing collection and an empty one yield `Ok(None)`,
    /// and the caller shows its empty-state affordance.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the fetch itself fails.
    pub async fn load_flashcards(
        &self,
        note_id: &NoteId,
    ) -> Result<Option<AssessmentSession>, LoadError> {
        let items = match self.api.fetch_flashcards(note_id).await {
            Ok(items) => items,
            Err(ApiError::NotFound) => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(self.review_session(note_id, items))
    }

    /// Generate a fresh flashcard set for a note, replacing any prior set.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the remote fails or produces nothing;
    /// the caller holds no session in that case and may retry.
    pub async fn generate_flashcards(
        &self,
        note_id: &NoteId,
        count: u32,
    ) -> Result<AssessmentSession, GenerationError> {
        let items = self.api.generate_flashcards(note_id, count).await?;
        self.review_session(note_id, items)
            .ok_or(GenerationError::NoItems)
    }

    fn review_session(&self, note_id: &NoteId, items: Vec<Item>) -> Option<AssessmentSession> {
        let store = Arc::new(ItemStore::new(items));
        if store.is_empty() {
            return None;
        }
        AssessmentSession::review(note_id.clone(), store, self.clock.now()).ok()
    }

    /// Generate a quiz for a note. Each attempt is a newly generated set;
    /// prior quizzes and their results are never reused.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the remote fails or produces nothing.
    pub async fn generate_quiz(
        &self,
        note_id: &NoteId,
        question_count: u32,
    ) -> Result<AssessmentSession, GenerationError> {
        let quiz = self.api.generate_quiz(note_id, question_count).await?;
        let store = Arc::new(ItemStore::new(quiz.items));
        if store.is_empty() {
            return Err(GenerationError::NoItems);
        }
        AssessmentSession::quiz(note_id.clone(), quiz.id, store, self.clock.now())
            .map_err(|_| GenerationError::NoItems)
    }

    /// Record a review outcome for the current card.
    ///
    /// Two phases. The local counters update synchronously and always
    /// stick; sending the acknowledgment may fail independently, which is
    /// logged and reported in `ReviewSync::remote`. Review progress is
    /// worth more than strict consistency with the server here.
    ///
    /// Navigation stays permitted while an acknowledgment is in flight;
    /// only another review of the same card is held off.
    ///
    /// # Errors
    ///
    /// Returns `RecordReviewError::InFlight` while an acknowledgment for
    /// the same card is outstanding, `NotFlashcard` for quiz sessions, or
    /// `NoCurrentItem` when there is nothing to review. A remote failure
    /// is not an error at this level.
    pub async fn record_review(
        &self,
        session: &mut AssessmentSession,
        outcome: ReviewOutcome,
    ) -> Result<ReviewSync, RecordReviewError> {
        if session.kind() != SessionKind::FlashcardReview {
            return Err(RecordReviewError::NotFlashcard);
        }
        let Some(position) = session.position() else {
            return Err(RecordReviewError::NoCurrentItem);
        };
        let item_id: ItemId = match session.current_item() {
            Some(item) => item.id().clone(),
            None => return Err(RecordReviewError::NoCurrentItem),
        };
        if !session.begin_review(position) {
            return Err(RecordReviewError::InFlight);
        }

        let response = match session.record_review(outcome) {
            Ok(response) => response,
            Err(SessionError::NotFlashcard) => {
                session.finish_review(position);
                return Err(RecordReviewError::NotFlashcard);
            }
            Err(_) => {
                session.finish_review(position);
                return Err(RecordReviewError::NoCurrentItem);
            }
        };

        let remote = self.api.record_review(&item_id, outcome).await;
        session.finish_review(position);
        if let Err(err) = &remote {
            tracing::warn!("review acknowledgment for card {item_id} failed: {err}");
        }

        Ok(ReviewSync { response, remote })
    }

    /// Submit the quiz for authoritative grading.
    ///
    /// The remote's grading is the session's result: local state flips to
    /// completed only once the response arrives. On a remote failure the
    /// session stays in progress and may be resubmitted.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Incomplete` with the unanswered indices and
    /// no state change (the remote is never called), `InFlight` for an
    /// overlapping submission, `Completed` for a second grading, `NotQuiz`
    /// for flashcard sessions, or `Api` when the remote call fails.
    pub async fn submit(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<QuizResult, SubmitError> {
        if session.kind() != SessionKind::Quiz {
            return Err(SubmitError::NotQuiz);
        }
        if session.is_complete() {
            return Err(SubmitError::Completed);
        }
        let unanswered = session.unanswered_indices();
        if !unanswered.is_empty() {
            return Err(SubmitError::Incomplete { unanswered });
        }
        let Some(quiz_id) = session.quiz_id().cloned() else {
            return Err(SubmitError::NotQuiz);
        };
        if !session.begin_submission() {
            return Err(SubmitError::InFlight);
        }

        let selections: Vec<usize> = session.selections().into_iter().flatten().collect();
        let elapsed = session.elapsed_seconds(self.clock.now());
        let outcome = self.api.submit_quiz(&quiz_id, &selections, elapsed).await;
        session.finish_submission();

        match outcome {
            Ok(result) => {
                session
                    .apply_result(result.clone())
                    .map_err(|_| SubmitError::Completed)?;
                Ok(result)
            }
            Err(err) => {
                tracing::warn!("quiz submission failed: {err}");
                Err(err.into())
            }
        }
    }
}
