use std::sync::Arc;

use api::{InMemoryStudyApi, StudyApi};
use services::{Clock, SessionWorkflow, SubmitError};
use study_core::model::NoteId;
use study_core::time::fixed_now;

fn workflow_with_note() -> (Arc<InMemoryStudyApi>, SessionWorkflow, NoteId) {
    let api = Arc::new(InMemoryStudyApi::new());
    let note_id = api.seed_note("note-1", "Cell Biology");
    let workflow = SessionWorkflow::new(
        Arc::clone(&api) as Arc<dyn StudyApi>,
        Clock::fixed(fixed_now()),
    );
    (api, workflow, note_id)
}

fn answer_key(session: &services::AssessmentSession) -> Vec<usize> {
    session
        .items()
        .iter()
        .map(|item| item.correct_choice().expect("quiz items carry an answer key"))
        .collect()
}

#[tokio::test]
async fn full_quiz_ends_in_an_authoritative_snapshot() {
    let (_api, workflow, note_id) = workflow_with_note();
    let mut session = workflow.generate_quiz(&note_id, 4).await.unwrap();
    assert_eq!(session.total_items(), 4);

    for choice in answer_key(&session) {
        session.select_choice(choice).unwrap();
        session.advance();
    }
    assert!(session.all_answered());

    let result = workflow.submit(&mut session).await.unwrap();

    assert!(session.is_complete());
    assert!((result.score() - 100.0).abs() < f64::EPSILON);
    assert_eq!(result.correct_count(), 4);
    assert_eq!(result.total_questions(), 4);
    assert!(result.questions().iter().all(|q| q.is_correct));
    assert_eq!(session.result().unwrap().correct_count(), 4);
}

#[tokio::test]
async fn partially_wrong_answers_get_the_remote_grade() {
    let (_api, workflow, note_id) = workflow_with_note();
    let mut session = workflow.generate_quiz(&note_id, 4).await.unwrap();

    let key = answer_key(&session);
    for (index, &correct) in key.iter().enumerate() {
        // Miss the last two questions on purpose.
        let choice = if index < 2 { correct } else { (correct + 1) % 4 };
        session.jump_to(index).unwrap();
        session.select_choice(choice).unwrap();
    }

    let result = workflow.submit(&mut session).await.unwrap();

    assert!((result.score() - 50.0).abs() < f64::EPSILON);
    assert_eq!(result.correct_count(), 2);
    assert!(!result.questions()[3].is_correct);
    assert_eq!(result.questions()[3].correct_choice, key[3]);
}

#[tokio::test]
async fn incomplete_submission_never_reaches_the_remote() {
    let (api, workflow, note_id) = workflow_with_note();
    let mut session = workflow.generate_quiz(&note_id, 3).await.unwrap();

    session.select_choice(0).unwrap();
    // A remote outage would surface as an Api error; Incomplete proves the
    // gate fired before any call went out.
    api.set_fail_submit(true);

    let err = workflow.submit(&mut session).await.unwrap_err();
    match err {
        SubmitError::Incomplete { unanswered } => assert_eq!(unanswered, vec![1, 2]),
        other => panic!("expected Incomplete, got {other:?}"),
    }
    assert!(!session.is_complete());
    assert!(session.result().is_none());
}

#[tokio::test]
async fn failed_submission_allows_a_resubmit() {
    let (api, workflow, note_id) = workflow_with_note();
    let mut session = workflow.generate_quiz(&note_id, 2).await.unwrap();

    for choice in answer_key(&session) {
        session.select_choice(choice).unwrap();
        session.advance();
    }

    api.set_fail_submit(true);
    let err = workflow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SubmitError::Api(_)));
    assert!(!session.is_complete());
    assert!(session.result().is_none());
    assert!(!session.submission_pending());

    api.set_fail_submit(false);
    let result = workflow.submit(&mut session).await.unwrap();
    assert!(session.is_complete());
    assert_eq!(result.correct_count(), 2);
}

#[tokio::test]
async fn completed_quiz_rejects_further_grading() {
    let (_api, workflow, note_id) = workflow_with_note();
    let mut session = workflow.generate_quiz(&note_id, 2).await.unwrap();

    for choice in answer_key(&session) {
        session.select_choice(choice).unwrap();
        session.advance();
    }
    workflow.submit(&mut session).await.unwrap();

    let err = workflow.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SubmitError::Completed));
}

#[tokio::test]
async fn a_new_attempt_is_a_fresh_quiz() {
    let (_api, workflow, note_id) = workflow_with_note();
    let mut first = workflow.generate_quiz(&note_id, 2).await.unwrap();

    for choice in answer_key(&first) {
        first.select_choice(choice).unwrap();
        first.advance();
    }
    workflow.submit(&mut first).await.unwrap();
    let first_quiz_id = first.quiz_id().unwrap().clone();

    // Taking another quiz means dropping the old session and generating a
    // new set; nothing carries over.
    let second = workflow.generate_quiz(&note_id, 2).await.unwrap();
    assert_ne!(second.quiz_id().unwrap(), &first_quiz_id);
    assert!(!second.is_complete());
    assert!(second.result().is_none());
    assert_eq!(second.progress().answered, 0);
    assert!(second.selections().iter().all(Option::is_none));
}

#[tokio::test]
async fn submission_reports_elapsed_time_to_the_remote() {
    let api = Arc::new(InMemoryStudyApi::new());
    let note_id = api.seed_note("note-1", "Cell Biology");

    let started = fixed_now();
    let generate_workflow = SessionWorkflow::new(
        Arc::clone(&api) as Arc<dyn StudyApi>,
        Clock::fixed(started),
    );
    let mut session = generate_workflow.generate_quiz(&note_id, 2).await.unwrap();

    for choice in answer_key(&session) {
        session.select_choice(choice).unwrap();
        session.advance();
    }

    // Submit through a workflow whose clock has moved on 95 seconds.
    let later = started + chrono::Duration::seconds(95);
    let submit_workflow = SessionWorkflow::new(
        Arc::clone(&api) as Arc<dyn StudyApi>,
        Clock::fixed(later),
    );
    let result = submit_workflow.submit(&mut session).await.unwrap();

    assert_eq!(result.elapsed_seconds(), 95);
}
