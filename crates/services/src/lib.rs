#![forbid(unsafe_code)]

pub mod error;
pub mod session;
mod study_services;

pub use study_core::Clock;

pub use error::{GenerationError, LoadError, RecordReviewError, SessionError, SubmitError};
pub use session::{
    AssessmentSession, ReviewSync, SessionKind, SessionProgress, SessionStatus, SessionWorkflow,
};
pub use study_services::StudyServices;
