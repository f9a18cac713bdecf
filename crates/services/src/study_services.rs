use std::sync::Arc;

use api::{ApiConfig, HttpStudyApi, StudyApi};
use study_core::Clock;

use crate::session::SessionWorkflow;

/// Assembles the client-side services around one remote API connection.
#[derive(Clone)]
pub struct StudyServices {
    workflow: Arc<SessionWorkflow>,
}

impl StudyServices {
    /// Build services over the HTTP API configured from the environment.
    #[must_use]
    pub fn from_env(clock: Clock) -> Self {
        Self::new(Arc::new(HttpStudyApi::from_env()), clock)
    }

    /// Build services over the given HTTP configuration.
    #[must_use]
    pub fn new_http(config: ApiConfig, clock: Clock) -> Self {
        Self::new(Arc::new(HttpStudyApi::new(config)), clock)
    }

    /// Build services over any `StudyApi` implementation.
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>, clock: Clock) -> Self {
        Self {
            workflow: Arc::new(SessionWorkflow::new(api, clock)),
        }
    }

    #[must_use]
    pub fn workflow(&self) -> Arc<SessionWorkflow> {
        Arc::clone(&self.workflow)
    }
}
