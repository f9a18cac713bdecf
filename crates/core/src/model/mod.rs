mod cursor;
mod ids;
mod item;
mod response;
mod result;

pub use cursor::{Cursor, OutOfRangeError};
pub use ids::{ItemId, NoteId, QuizId};
pub use item::{Difficulty, Item, ItemError, ItemKind, ItemStore};
pub use response::{Response, ResponseTracker, ReviewOutcome};
pub use result::{QuestionResult, QuizResult, QuizResultError};
