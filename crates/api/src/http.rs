use std::env;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use study_core::model::{Item, ItemId, NoteId, QuizId, QuizResult, ReviewOutcome};

use crate::contract::{
    ApiError, FlashcardRecord, GeneratedQuiz, NoteSummary, QuizRecord, StudyApi,
    SubmitResultRecord,
};

/// Connection settings for the remote study service.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    /// Read settings from `STUDY_API_URL` and `STUDY_API_TOKEN`.
    ///
    /// Falls back to the local development server when no URL is set.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("STUDY_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".into());
        let token = env::var("STUDY_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self { base_url, token }
    }
}

/// `StudyApi` backed by the remote HTTP service.
#[derive(Clone)]
pub struct HttpStudyApi {
    client: Client,
    config: ApiConfig,
}

impl HttpStudyApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    tracing::debug!("remote call to {} failed with status {status}", response.url());
    Err(ApiError::Status(status))
}

//
// ─── REQUEST / RESPONSE BODIES ─────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct GenerateFlashcardsBody {
    count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateQuizBody {
    question_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    is_correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    answers: &'a [usize],
    time_taken: u64,
}

#[derive(Debug, Deserialize)]
struct NotesEnvelope {
    notes: Vec<NoteSummary>,
}

#[derive(Debug, Deserialize)]
struct FlashcardsEnvelope {
    flashcards: Vec<FlashcardRecord>,
}

#[derive(Debug, Deserialize)]
struct QuizEnvelope {
    quiz: QuizRecord,
}

fn records_into_items(records: Vec<FlashcardRecord>) -> Result<Vec<Item>, ApiError> {
    records
        .into_iter()
        .map(|record| record.into_item().map_err(ApiError::from))
        .collect()
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ApiError> {
        let response = self.request(Method::GET, "notes").send().await?;
        let body: NotesEnvelope = check_status(response)?.json().await?;
        Ok(body.notes)
    }

    async fn fetch_flashcards(&self, note_id: &NoteId) -> Result<Vec<Item>, ApiError> {
        let response = self
            .request(Method::GET, &format!("flashcards/note/{note_id}"))
            .send()
            .await?;
        let body: FlashcardsEnvelope = check_status(response)?.json().await?;
        records_into_items(body.flashcards)
    }

    async fn generate_flashcards(
        &self,
        note_id: &NoteId,
        count: u32,
    ) -> Result<Vec<Item>, ApiError> {
        let response = self
            .request(Method::POST, &format!("flashcards/generate/{note_id}"))
            .json(&GenerateFlashcardsBody { count })
            .send()
            .await?;
        let body: FlashcardsEnvelope = check_status(response)?.json().await?;
        records_into_items(body.flashcards)
    }

    async fn record_review(
        &self,
        item_id: &ItemId,
        outcome: ReviewOutcome,
    ) -> Result<(), ApiError> {
        let response = self
            .request(Method::PUT, &format!("flashcards/{item_id}/review"))
            .json(&ReviewBody {
                is_correct: outcome.is_correct(),
            })
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn generate_quiz(
        &self,
        note_id: &NoteId,
        question_count: u32,
    ) -> Result<GeneratedQuiz, ApiError> {
        let response = self
            .request(Method::POST, &format!("quiz/generate/{note_id}"))
            .json(&GenerateQuizBody { question_count })
            .send()
            .await?;
        let body: QuizEnvelope = check_status(response)?.json().await?;
        Ok(body.quiz.into_quiz()?)
    }

    async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        selections: &[usize],
        elapsed_seconds: u64,
    ) -> Result<QuizResult, ApiError> {
        let response = self
            .request(Method::POST, &format!("quiz/{quiz_id}/submit"))
            .json(&SubmitBody {
                answers: selections,
                time_taken: elapsed_seconds,
            })
            .send()
            .await?;
        let body: SubmitResultRecord = check_status(response)?.json().await?;
        Ok(body.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_doubled_slashes() {
        let api = HttpStudyApi::new(ApiConfig {
            base_url: "http://localhost:5000/api/".into(),
            token: None,
        });
        assert_eq!(api.url("/notes"), "http://localhost:5000/api/notes");
        assert_eq!(
            api.url("flashcards/note/n1"),
            "http://localhost:5000/api/flashcards/note/n1"
        );
    }

    #[test]
    fn submit_body_uses_remote_field_names() {
        let body = SubmitBody {
            answers: &[1, 0, 2],
            time_taken: 90,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["answers"][2], 2);
        assert_eq!(json["timeTaken"], 90);
    }

    #[test]
    fn review_body_uses_remote_field_names() {
        let json = serde_json::to_value(ReviewBody { is_correct: true }).unwrap();
        assert_eq!(json["isCorrect"], true);
    }
}
