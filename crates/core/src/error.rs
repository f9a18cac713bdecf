use thiserror::Error;

use crate::model::{ItemError, OutOfRangeError, QuizResultError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
}
