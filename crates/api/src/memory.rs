use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use study_core::model::{
    Item, ItemId, NoteId, QuestionResult, QuizId, QuizResult, ReviewOutcome,
};

use crate::contract::{ApiError, GeneratedQuiz, NoteSummary, StudyApi};

/// Recorded acknowledgment of one flashcard review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLogEntry {
    pub item_id: ItemId,
    pub outcome: ReviewOutcome,
}

#[derive(Default)]
struct State {
    notes: Vec<NoteSummary>,
    flashcards: HashMap<NoteId, Vec<Item>>,
    quizzes: HashMap<QuizId, Vec<Item>>,
    review_log: Vec<ReviewLogEntry>,
    fail_generation: bool,
    fail_reviews: bool,
    fail_submit: bool,
}

/// In-memory stand-in for the remote study service.
///
/// Grades submissions itself, so tests exercise the authoritative-result
/// flow without a server. Failure toggles simulate remote outages.
#[derive(Default)]
pub struct InMemoryStudyApi {
    state: Mutex<State>,
}

impl InMemoryStudyApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register a note and return its id.
    pub fn seed_note(&self, id: &str, title: &str) -> NoteId {
        let note_id = NoteId::new(id);
        self.lock().notes.push(NoteSummary {
            id: note_id.clone(),
            title: title.to_owned(),
        });
        note_id
    }

    /// Install a flashcard set for a note. An empty set is a valid state
    /// distinct from the note having no collection at all.
    pub fn seed_flashcards(&self, note_id: &NoteId, items: Vec<Item>) {
        self.lock().flashcards.insert(note_id.clone(), items);
    }

    /// Every review acknowledgment received so far, in arrival order.
    #[must_use]
    pub fn review_log(&self) -> Vec<ReviewLogEntry> {
        self.lock().review_log.clone()
    }

    pub fn set_fail_generation(&self, fail: bool) {
        self.lock().fail_generation = fail;
    }

    pub fn set_fail_reviews(&self, fail: bool) {
        self.lock().fail_reviews = fail;
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.lock().fail_submit = fail;
    }
}

fn remote_failure() -> ApiError {
    ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)
}

#[allow(clippy::cast_precision_loss)]
fn grade(items: &[Item], selections: &[usize], elapsed_seconds: u64) -> Result<QuizResult, ApiError> {
    if selections.len() != items.len() {
        return Err(ApiError::Status(StatusCode::UNPROCESSABLE_ENTITY));
    }

    let mut questions = Vec::with_capacity(items.len());
    let mut correct = 0_u32;
    for (item, &selected) in items.iter().zip(selections) {
        let Some(correct_choice) = item.correct_choice() else {
            return Err(ApiError::Status(StatusCode::UNPROCESSABLE_ENTITY));
        };
        let is_correct = selected == correct_choice;
        if is_correct {
            correct = correct.saturating_add(1);
        }
        questions.push(QuestionResult {
            selected_choice: selected,
            correct_choice,
            is_correct,
            explanation: item.reveal().map(str::to_owned),
        });
    }

    let score = f64::from(correct) / items.len() as f64 * 100.0;
    let total = u32::try_from(items.len()).map_err(|_| remote_failure())?;
    Ok(QuizResult::new(score, correct, total, elapsed_seconds, questions)?)
}

#[async_trait]
impl StudyApi for InMemoryStudyApi {
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ApiError> {
        Ok(self.lock().notes.clone())
    }

    async fn fetch_flashcards(&self, note_id: &NoteId) -> Result<Vec<Item>, ApiError> {
        self.lock()
            .flashcards
            .get(note_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn generate_flashcards(
        &self,
        note_id: &NoteId,
        count: u32,
    ) -> Result<Vec<Item>, ApiError> {
        let mut state = self.lock();
        if state.fail_generation {
            return Err(remote_failure());
        }

        let mut items = Vec::with_capacity(count as usize);
        for number in 1..=count {
            items.push(Item::flashcard(
                ItemId::new(Uuid::new_v4().to_string()),
                format!("Generated question {number}"),
                format!("Generated answer {number}"),
            )?);
        }
        state.flashcards.insert(note_id.clone(), items.clone());
        Ok(items)
    }

    async fn record_review(
        &self,
        item_id: &ItemId,
        outcome: ReviewOutcome,
    ) -> Result<(), ApiError> {
        let mut state = self.lock();
        if state.fail_reviews {
            return Err(remote_failure());
        }
        state.review_log.push(ReviewLogEntry {
            item_id: item_id.clone(),
            outcome,
        });
        Ok(())
    }

    async fn generate_quiz(
        &self,
        note_id: &NoteId,
        question_count: u32,
    ) -> Result<GeneratedQuiz, ApiError> {
        let mut state = self.lock();
        if state.fail_generation {
            return Err(remote_failure());
        }

        let quiz_id = QuizId::new(Uuid::new_v4().to_string());
        let mut items = Vec::with_capacity(question_count as usize);
        for index in 0..question_count as usize {
            let options: Vec<String> = ["A", "B", "C", "D"]
                .iter()
                .map(|label| format!("Option {label} for {note_id}"))
                .collect();
            items.push(Item::multiple_choice(
                ItemId::new(format!("{quiz_id}#{index}")),
                format!("Generated question {}", index + 1),
                options,
                index % 4,
                Some(format!("Choice {} matches the note content", index % 4 + 1)),
            )?);
        }
        state.quizzes.insert(quiz_id.clone(), items.clone());
        Ok(GeneratedQuiz { id: quiz_id, items })
    }

    async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        selections: &[usize],
        elapsed_seconds: u64,
    ) -> Result<QuizResult, ApiError> {
        let state = self.lock();
        if state.fail_submit {
            return Err(remote_failure());
        }
        let items = state.quizzes.get(quiz_id).ok_or(ApiError::NotFound)?;
        grade(items, selections, elapsed_seconds)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_collection_is_distinct_from_empty() {
        let api = InMemoryStudyApi::new();
        let note_id = api.seed_note("n1", "Biology");

        assert!(matches!(
            api.fetch_flashcards(&note_id).await,
            Err(ApiError::NotFound)
        ));

        api.seed_flashcards(&note_id, Vec::new());
        assert_eq!(api.fetch_flashcards(&note_id).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn generation_replaces_the_whole_set() {
        let api = InMemoryStudyApi::new();
        let note_id = api.seed_note("n1", "Biology");

        let first = api.generate_flashcards(&note_id, 3).await.unwrap();
        let second = api.generate_flashcards(&note_id, 2).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        let fetched = api.fetch_flashcards(&note_id).await.unwrap();
        assert_eq!(fetched, second);
    }

    #[tokio::test]
    async fn submit_grades_against_the_answer_key() {
        let api = InMemoryStudyApi::new();
        let note_id = api.seed_note("n1", "Biology");
        let quiz = api.generate_quiz(&note_id, 3).await.unwrap();

        let key: Vec<usize> = quiz
            .items
            .iter()
            .map(|item| item.correct_choice().unwrap())
            .collect();
        let mut selections = key.clone();
        selections[1] = (key[1] + 1) % 4;

        let result = api.submit_quiz(&quiz.id, &selections, 30).await.unwrap();
        assert_eq!(result.correct_count(), 2);
        assert_eq!(result.total_questions(), 3);
        assert!((result.score() - 200.0 / 3.0).abs() < 1e-9);
        assert!(!result.questions()[1].is_correct);
        assert_eq!(result.elapsed_seconds(), 30);
    }

    #[tokio::test]
    async fn submit_rejects_mismatched_selection_count() {
        let api = InMemoryStudyApi::new();
        let note_id = api.seed_note("n1", "Biology");
        let quiz = api.generate_quiz(&note_id, 3).await.unwrap();

        let err = api.submit_quiz(&quiz.id, &[0], 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(_)));
    }

    #[tokio::test]
    async fn failure_toggles_simulate_outages() {
        let api = InMemoryStudyApi::new();
        let note_id = api.seed_note("n1", "Biology");

        api.set_fail_generation(true);
        assert!(api.generate_flashcards(&note_id, 2).await.is_err());
        api.set_fail_generation(false);
        assert!(api.generate_flashcards(&note_id, 2).await.is_ok());

        api.set_fail_reviews(true);
        let id = ItemId::new("x");
        assert!(api.record_review(&id, ReviewOutcome::Correct).await.is_err());
        assert!(api.review_log().is_empty());
    }
}
