use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use study_core::model::{
    Difficulty, Item, ItemError, ItemId, NoteId, QuestionResult, QuizId, QuizResult,
    QuizResultError, ReviewOutcome,
};

/// Errors surfaced by remote service adapters.
///
/// No adapter retries internally; callers decide whether to re-trigger a
/// failed call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid item in response: {0}")]
    Item(#[from] ItemError),

    #[error("invalid result in response: {0}")]
    Result(#[from] QuizResultError),
}

/// Minimal note listing used to pick a study subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub title: String,
}

/// A freshly generated quiz: its remote id plus the question items.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuiz {
    pub id: QuizId,
    pub items: Vec<Item>,
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

/// Wire shape of one flashcard as returned by the remote.
///
/// Mirrors the service's JSON so adapters can deserialize without leaking
/// transport concerns into the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardRecord {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl FlashcardRecord {
    /// Convert the record into a domain `Item`.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if question or answer fail validation.
    pub fn into_item(self) -> Result<Item, ItemError> {
        let item = Item::flashcard(self.id, self.question, self.answer)?;
        Ok(match self.difficulty {
            Some(difficulty) => item.with_difficulty(difficulty),
            None => item,
        })
    }
}

/// Wire shape of one question embedded in a generated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Wire shape of a generated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    #[serde(rename = "_id")]
    pub id: QuizId,
    pub questions: Vec<QuizQuestionRecord>,
}

impl QuizRecord {
    /// Convert the record into domain items.
    ///
    /// Questions are embedded without ids of their own; each gets one
    /// derived from the quiz id and its position.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if any question fails validation.
    pub fn into_quiz(self) -> Result<GeneratedQuiz, ItemError> {
        let mut items = Vec::with_capacity(self.questions.len());
        for (index, record) in self.questions.into_iter().enumerate() {
            let id = ItemId::new(format!("{}#{index}", self.id));
            let item = Item::multiple_choice(
                id,
                record.question,
                record.options,
                record.correct_answer,
                record.explanation,
            )?;
            items.push(match record.difficulty {
                Some(difficulty) => item.with_difficulty(difficulty),
                None => item,
            });
        }
        Ok(GeneratedQuiz { id: self.id, items })
    }
}

/// Wire shape of the graded outcome for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcomeRecord {
    pub user_answer: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Wire shape of the remote's grading of a submitted quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRecord {
    pub score: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub time_taken: u64,
    pub questions: Vec<QuestionOutcomeRecord>,
}

impl SubmitResultRecord {
    /// Convert the record into the domain result snapshot.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` if the reported totals do not align.
    pub fn into_result(self) -> Result<QuizResult, QuizResultError> {
        let questions = self
            .questions
            .into_iter()
            .map(|record| QuestionResult {
                selected_choice: record.user_answer,
                correct_choice: record.correct_answer,
                is_correct: record.is_correct,
                explanation: record.explanation,
            })
            .collect();
        QuizResult::new(
            self.score,
            self.correct_count,
            self.total_questions,
            self.time_taken,
            questions,
        )
    }
}

//
// ─── CONTRACT ──────────────────────────────────────────────────────────────────
//

/// Request/response contract with the remote study service.
///
/// Item storage, AI generation and grading all live behind this boundary;
/// the client consumes them as opaque request/response calls.
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// List the notes available as study subjects.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the listing cannot be fetched.
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ApiError>;

    /// Fetch the flashcards previously generated for a note.
    ///
    /// An empty list is a valid response and distinct from
    /// `ApiError::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the note does not exist, or other
    /// transport errors.
    async fn fetch_flashcards(&self, note_id: &NoteId) -> Result<Vec<Item>, ApiError>;

    /// Generate a fresh flashcard set for a note, replacing any prior set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if generation fails remotely.
    async fn generate_flashcards(
        &self,
        note_id: &NoteId,
        count: u32,
    ) -> Result<Vec<Item>, ApiError>;

    /// Record one flashcard review outcome. Acknowledgment only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the acknowledgment fails.
    async fn record_review(
        &self,
        item_id: &ItemId,
        outcome: ReviewOutcome,
    ) -> Result<(), ApiError>;

    /// Generate a new quiz for a note.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if generation fails remotely.
    async fn generate_quiz(
        &self,
        note_id: &NoteId,
        question_count: u32,
    ) -> Result<GeneratedQuiz, ApiError>;

    /// Submit a full quiz attempt for authoritative grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission fails; no grading happens
    /// client-side in that case.
    async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        selections: &[usize],
        elapsed_seconds: u64,
    ) -> Result<QuizResult, ApiError>;
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
