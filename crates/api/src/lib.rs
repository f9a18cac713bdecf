#![forbid(unsafe_code)]

pub mod contract;
pub mod http;
pub mod memory;

pub use contract::{ApiError, GeneratedQuiz, NoteSummary, StudyApi};
pub use http::{ApiConfig, HttpStudyApi};
pub use memory::{InMemoryStudyApi, ReviewLogEntry};
