/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    /// Current item position, `None` only for an itemless session.
    pub position: Option<usize>,
    pub total: usize,
    /// Items answered (quiz) or reviewed at least once (flashcards).
    pub answered: usize,
    /// How far the cursor is through the sequence, as a percentage.
    pub percent: f64,
    pub is_complete: bool,
}
