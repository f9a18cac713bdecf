use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use study_core::model::{
    Cursor, Item, ItemStore, NoteId, QuizId, QuizResult, Response, ResponseTracker, ReviewOutcome,
};
use study_core::scoring;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION VARIANTS ──────────────────────────────────────────────────────────
//

/// Which kind of assessment this session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Open-ended flashcard review; has no terminal state.
    FlashcardReview,
    /// One quiz attempt, ending in an immutable result snapshot.
    Quiz,
}

/// Lifecycle of a session. The transition to `Completed` is one-directional
/// and only the quiz variant ever takes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one review or quiz attempt.
///
/// Steps a cursor through a shared, immutable item sequence and tracks
/// per-item responses. The item store is borrowed from whoever loaded it;
/// the session exclusively owns its responses and cursor.
pub struct AssessmentSession {
    kind: SessionKind,
    note_id: NoteId,
    quiz_id: Option<QuizId>,
    items: Arc<ItemStore>,
    responses: ResponseTracker,
    cursor: Cursor,
    revealed: bool,
    started_at: DateTime<Utc>,
    status: SessionStatus,
    result: Option<QuizResult>,
    pending_reviews: Vec<usize>,
    submit_pending: bool,
}

impl AssessmentSession {
    /// Start a flashcard review over a loaded card set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the store holds no items; an
    /// itemless session is never constructed.
    pub fn review(
        note_id: NoteId,
        items: Arc<ItemStore>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start(SessionKind::FlashcardReview, note_id, None, items, started_at)
    }

    /// Start a quiz attempt over freshly generated questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the store holds no items.
    pub fn quiz(
        note_id: NoteId,
        quiz_id: QuizId,
        items: Arc<ItemStore>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start(SessionKind::Quiz, note_id, Some(quiz_id), items, started_at)
    }

    fn start(
        kind: SessionKind,
        note_id: NoteId,
        quiz_id: Option<QuizId>,
        items: Arc<ItemStore>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut responses = ResponseTracker::new(items.len());
        if kind == SessionKind::Quiz {
            // The first question is on screen from the start.
            responses.mark_revealed(0);
        }

        Ok(Self {
            kind,
            note_id,
            quiz_id,
            cursor: Cursor::new(items.len()),
            items,
            responses,
            revealed: false,
            started_at,
            status: SessionStatus::InProgress,
            result: None,
            pending_reviews: Vec::new(),
            submit_pending: false,
        })
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.quiz_id.as_ref()
    }

    #[must_use]
    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// The frozen grading, present once a quiz is completed.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.cursor.position()
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.cursor.position()?)
    }

    #[must_use]
    pub fn current_response(&self) -> Option<&Response> {
        self.responses.get(self.cursor.position()?)
    }

    #[must_use]
    pub fn response(&self, index: usize) -> Option<&Response> {
        self.responses.get(index)
    }

    /// Whether the current card is showing its reveal side.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next item; a no-op on the last one.
    pub fn advance(&mut self) {
        if self.cursor.advance() {
            self.after_move();
        }
    }

    /// Move to the previous item; a no-op on the first one.
    pub fn retreat(&mut self) {
        if self.cursor.retreat() {
            self.after_move();
        }
    }

    /// Jump straight to an item, e.g. from a question palette.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `index` does not address an
    /// item; the cursor is left unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        let moved = self.cursor.position() != Some(index);
        self.cursor.jump_to(index)?;
        if moved {
            self.after_move();
        }
        Ok(())
    }

    /// Every cursor move starts the landed-on item unrevealed; quiz
    /// questions count as viewed the moment they are on screen.
    fn after_move(&mut self) {
        self.revealed = false;
        if self.kind == SessionKind::Quiz && !self.is_complete() {
            if let Some(position) = self.cursor.position() {
                self.responses.mark_revealed(position);
            }
        }
    }

    //
    // ─── RESPONSES ─────────────────────────────────────────────────────────────
    //

    /// Flip the current flashcard between its prompt and reveal sides.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFlashcard` for quiz sessions.
    pub fn flip(&mut self) -> Result<(), SessionError> {
        if self.kind != SessionKind::FlashcardReview {
            return Err(SessionError::NotFlashcard);
        }
        self.revealed = !self.revealed;
        if self.revealed {
            if let Some(position) = self.cursor.position() {
                self.responses.mark_revealed(position);
            }
        }
        Ok(())
    }

    /// Record or change the selected choice for the current question.
    ///
    /// Selections may be overwritten freely before submission and persist
    /// across navigation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotMultipleChoice` for flashcard sessions,
    /// `SessionError::Completed` once the quiz is graded, or
    /// `SessionError::OutOfRange` for a choice the item does not have.
    pub fn select_choice(&mut self, choice: usize) -> Result<(), SessionError> {
        if self.kind != SessionKind::Quiz {
            return Err(SessionError::NotMultipleChoice);
        }
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let Some(position) = self.cursor.position() else {
            return Err(SessionError::Empty);
        };
        let item = self.items.get(position).ok_or(SessionError::Empty)?;
        let len = item.choices().len();
        if choice >= len {
            return Err(study_core::model::OutOfRangeError { index: choice, len }.into());
        }
        self.responses.record_selection(position, choice)?;
        Ok(())
    }

    /// Record a self-asserted outcome for the current card and move on.
    ///
    /// Counters always increment; repeated reviews of the same card are
    /// separate attempts. The cursor advances, clamped at the last card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFlashcard` for quiz sessions.
    pub fn record_review(&mut self, outcome: ReviewOutcome) -> Result<Response, SessionError> {
        if self.kind != SessionKind::FlashcardReview {
            return Err(SessionError::NotFlashcard);
        }
        let Some(position) = self.cursor.position() else {
            return Err(SessionError::Empty);
        };
        self.responses.record_review(position, outcome)?;
        let response = self
            .responses
            .get(position)
            .cloned()
            .ok_or(SessionError::Empty)?;
        self.advance();
        Ok(response)
    }

    /// True iff every question has a selection.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.responses.all_answered()
    }

    /// Indices of questions that still have no selection.
    #[must_use]
    pub fn unanswered_indices(&self) -> Vec<usize> {
        self.responses.unanswered_indices()
    }

    /// Selections in item order, `None` where unanswered.
    #[must_use]
    pub fn selections(&self) -> Vec<Option<usize>> {
        self.responses.selections()
    }

    //
    // ─── DERIVED METRICS ───────────────────────────────────────────────────────
    //

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.items.len();
        let position = self.cursor.position();
        let answered = match self.kind {
            SessionKind::Quiz => self.responses.answered_count(),
            SessionKind::FlashcardReview => self.responses.reviewed_count(),
        };
        SessionProgress {
            position,
            total,
            answered,
            percent: position.map_or(0.0, |p| scoring::progress_percent(p, total)),
            is_complete: self.is_complete(),
        }
    }

    /// Rounded review accuracy for one card, from its session counters.
    #[must_use]
    pub fn accuracy_percent(&self, index: usize) -> u32 {
        self.responses
            .get(index)
            .map_or(0, Response::accuracy_percent)
    }

    /// Locally derived score for the current selections. Provisional; the
    /// remote's grading replaces it at submission.
    #[must_use]
    pub fn local_score(&self) -> f64 {
        scoring::session_score(&self.responses, &self.items)
    }

    /// Whole seconds since the session started.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        scoring::elapsed_seconds(self.started_at, now)
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Start the same cards over: cursor to the first card, outcomes and
    /// reveal marks cleared, cumulative attempt counters preserved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFlashcard` for quiz sessions; a quiz is
    /// not reusable and a new attempt needs a fresh generation.
    pub fn restart_review(&mut self) -> Result<(), SessionError> {
        if self.kind != SessionKind::FlashcardReview {
            return Err(SessionError::NotFlashcard);
        }
        self.responses.reset_outcomes();
        self.cursor = Cursor::new(self.items.len());
        self.revealed = false;
        Ok(())
    }

    /// Freeze the remote's grading as this session's result.
    pub(crate) fn apply_result(&mut self, result: QuizResult) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        self.status = SessionStatus::Completed;
        self.result = Some(result);
        Ok(())
    }

    //
    // ─── IN-FLIGHT GUARDS ──────────────────────────────────────────────────────
    //

    /// Whether a submission is currently awaiting the remote's response.
    /// Presentation layers disable the submit action while this holds.
    #[must_use]
    pub fn submission_pending(&self) -> bool {
        self.submit_pending
    }

    /// Whether a review acknowledgment for the given card is in flight.
    #[must_use]
    pub fn review_pending(&self, index: usize) -> bool {
        self.pending_reviews.contains(&index)
    }

    pub(crate) fn begin_review(&mut self, index: usize) -> bool {
        if self.pending_reviews.contains(&index) {
            return false;
        }
        self.pending_reviews.push(index);
        true
    }

    pub(crate) fn finish_review(&mut self, index: usize) {
        self.pending_reviews.retain(|&pending| pending != index);
    }

    pub(crate) fn begin_submission(&mut self) -> bool {
        if self.submit_pending {
            return false;
        }
        self.submit_pending = true;
        true
    }

    pub(crate) fn finish_submission(&mut self) {
        self.submit_pending = false;
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("kind", &self.kind)
            .field("note_id", &self.note_id)
            .field("items_len", &self.items.len())
            .field("position", &self.cursor.position())
            .field("status", &self.status)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
