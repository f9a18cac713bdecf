use crate::model::cursor::OutOfRangeError;
use crate::scoring;

//
// ─── REVIEW OUTCOME ────────────────────────────────────────────────────────────
//

/// User-asserted outcome of reviewing one flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
}

impl ReviewOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, ReviewOutcome::Correct)
    }
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// Per-item interaction state within a session.
///
/// Starts unanswered with zero counters; selection is quiz-side state,
/// outcome and the attempt counters are flashcard-side state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    selected_choice: Option<usize>,
    outcome: Option<ReviewOutcome>,
    revealed: bool,
    attempt_count: u32,
    correct_count: u32,
}

impl Response {
    #[must_use]
    pub fn selected_choice(&self) -> Option<usize> {
        self.selected_choice
    }

    #[must_use]
    pub fn outcome(&self) -> Option<ReviewOutcome> {
        self.outcome
    }

    /// Whether the item's reveal content has been shown at least once.
    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected_choice.is_some()
    }

    /// Rounded accuracy over this item's review attempts.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        scoring::accuracy_percent(self.correct_count, self.attempt_count)
    }
}

//
// ─── RESPONSE TRACKER ──────────────────────────────────────────────────────────
//

/// Mutable per-item response state, exactly one `Response` per item index.
///
/// Constructed fully initialized: every index is present and unanswered
/// from the start, never partially populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTracker {
    responses: Vec<Response>,
}

impl ResponseTracker {
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            responses: vec![Response::default(); item_count],
        }
    }

    /// Discard all state and size the tracker for a freshly loaded set.
    pub fn reset(&mut self, item_count: usize) {
        self.responses = vec![Response::default(); item_count];
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Response> {
        self.responses.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Response> {
        self.responses.iter()
    }

    /// Record or overwrite the selected choice for a question.
    ///
    /// Repeated calls before submission replace the selection; counters are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if `index` does not address an item.
    pub fn record_selection(
        &mut self,
        index: usize,
        choice: usize,
    ) -> Result<(), OutOfRangeError> {
        let len = self.responses.len();
        let response = self
            .responses
            .get_mut(index)
            .ok_or(OutOfRangeError { index, len })?;
        response.selected_choice = Some(choice);
        Ok(())
    }

    /// Record one review attempt for a flashcard.
    ///
    /// Every call is a new attempt: the attempt counter always increments
    /// and a correct outcome always increments the correct counter. Repeat
    /// reviews are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if `index` does not address an item.
    pub fn record_review(
        &mut self,
        index: usize,
        outcome: ReviewOutcome,
    ) -> Result<&Response, OutOfRangeError> {
        let len = self.responses.len();
        let response = self
            .responses
            .get_mut(index)
            .ok_or(OutOfRangeError { index, len })?;
        response.outcome = Some(outcome);
        response.attempt_count = response.attempt_count.saturating_add(1);
        if outcome.is_correct() {
            response.correct_count = response.correct_count.saturating_add(1);
        }
        Ok(&self.responses[index])
    }

    /// Record that an item's reveal content has been shown.
    pub fn mark_revealed(&mut self, index: usize) {
        if let Some(response) = self.responses.get_mut(index) {
            response.revealed = true;
        }
    }

    /// True iff every question has a selection. Gate for quiz submission.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.responses.iter().all(Response::is_answered)
    }

    /// Indices that still have no selection.
    #[must_use]
    pub fn unanswered_indices(&self) -> Vec<usize> {
        self.responses
            .iter()
            .enumerate()
            .filter(|(_, response)| !response.is_answered())
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of questions with a selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_answered()).count()
    }

    /// Number of cards reviewed at least once.
    #[must_use]
    pub fn reviewed_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| r.outcome.is_some())
            .count()
    }

    /// Selections in item order, `None` where unanswered.
    #[must_use]
    pub fn selections(&self) -> Vec<Option<usize>> {
        self.responses.iter().map(|r| r.selected_choice).collect()
    }

    /// Clear outcomes, selections and reveal marks while preserving the
    /// cumulative attempt counters. Used when a review run starts over.
    pub fn reset_outcomes(&mut self) {
        for response in &mut self.responses {
            response.outcome = None;
            response.selected_choice = None;
            response.revealed = false;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_starts_fully_initialized() {
        for count in [0, 1, 5] {
            let tracker = ResponseTracker::new(count);
            assert_eq!(tracker.len(), count);
            for response in tracker.iter() {
                assert_eq!(response.attempt_count(), 0);
                assert_eq!(response.correct_count(), 0);
                assert!(!response.is_answered());
                assert!(response.outcome().is_none());
                assert!(!response.revealed());
            }
        }
    }

    #[test]
    fn selection_overwrites_without_touching_counters() {
        let mut tracker = ResponseTracker::new(2);
        tracker.record_selection(0, 1).unwrap();
        tracker.record_selection(0, 3).unwrap();

        let response = tracker.get(0).unwrap();
        assert_eq!(response.selected_choice(), Some(3));
        assert_eq!(response.attempt_count(), 0);
    }

    #[test]
    fn selection_checks_bounds() {
        let mut tracker = ResponseTracker::new(2);
        let err = tracker.record_selection(2, 0).unwrap_err();
        assert_eq!(err, OutOfRangeError { index: 2, len: 2 });
    }

    #[test]
    fn repeat_reviews_are_not_deduplicated() {
        let mut tracker = ResponseTracker::new(1);
        tracker.record_review(0, ReviewOutcome::Correct).unwrap();
        let response = tracker.record_review(0, ReviewOutcome::Correct).unwrap();

        assert_eq!(response.attempt_count(), 2);
        assert_eq!(response.correct_count(), 2);
    }

    #[test]
    fn incorrect_review_counts_attempt_only() {
        let mut tracker = ResponseTracker::new(1);
        tracker.record_review(0, ReviewOutcome::Incorrect).unwrap();

        let response = tracker.get(0).unwrap();
        assert_eq!(response.attempt_count(), 1);
        assert_eq!(response.correct_count(), 0);
        assert_eq!(response.outcome(), Some(ReviewOutcome::Incorrect));
    }

    #[test]
    fn all_answered_requires_every_index() {
        let mut tracker = ResponseTracker::new(3);
        assert!(!tracker.all_answered());
        tracker.record_selection(0, 0).unwrap();
        tracker.record_selection(2, 1).unwrap();
        assert!(!tracker.all_answered());
        assert_eq!(tracker.unanswered_indices(), vec![1]);

        tracker.record_selection(1, 2).unwrap();
        assert!(tracker.all_answered());
        assert_eq!(tracker.answered_count(), 3);
    }

    #[test]
    fn reset_outcomes_preserves_counters() {
        let mut tracker = ResponseTracker::new(2);
        tracker.record_review(0, ReviewOutcome::Correct).unwrap();
        tracker.record_review(0, ReviewOutcome::Incorrect).unwrap();
        tracker.mark_revealed(0);

        tracker.reset_outcomes();

        let response = tracker.get(0).unwrap();
        assert!(response.outcome().is_none());
        assert!(!response.revealed());
        assert_eq!(response.attempt_count(), 2);
        assert_eq!(response.correct_count(), 1);
    }

    #[test]
    fn reset_discards_everything() {
        let mut tracker = ResponseTracker::new(2);
        tracker.record_review(1, ReviewOutcome::Correct).unwrap();

        tracker.reset(3);

        assert_eq!(tracker.len(), 3);
        assert!(tracker.iter().all(|r| r.attempt_count() == 0));
    }
}
