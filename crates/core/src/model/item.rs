use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ITEM TYPES ────────────────────────────────────────────────────────────────
//

/// Errors raised while constructing an item from remote data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("item prompt is empty")]
    EmptyPrompt,

    #[error("flashcard reveal content is empty")]
    EmptyReveal,

    #[error("multiple-choice item needs at least two choices, got {0}")]
    TooFewChoices(usize),

    #[error("correct choice {index} is out of range for {len} choices")]
    CorrectChoiceOutOfRange { index: usize, len: usize },
}

/// Display-only difficulty classification assigned by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Which kind of assessable unit an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Flashcard,
    MultipleChoice,
}

/// One assessable unit: a flashcard or a multiple-choice question.
///
/// Items are created by the remote generation service and stay immutable
/// for the duration of a session; regeneration replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    prompt: String,
    reveal: Option<String>,
    choices: Vec<String>,
    correct_choice: Option<usize>,
    difficulty: Option<Difficulty>,
}

impl Item {
    /// Build a flashcard with a prompt side and a reveal side.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyPrompt` or `ItemError::EmptyReveal` when
    /// either side is blank.
    pub fn flashcard(
        id: ItemId,
        prompt: impl Into<String>,
        reveal: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let prompt = prompt.into();
        let reveal = reveal.into();
        if prompt.trim().is_empty() {
            return Err(ItemError::EmptyPrompt);
        }
        if reveal.trim().is_empty() {
            return Err(ItemError::EmptyReveal);
        }

        Ok(Self {
            id,
            prompt,
            reveal: Some(reveal),
            choices: Vec::new(),
            correct_choice: None,
            difficulty: None,
        })
    }

    /// Build a multiple-choice question.
    ///
    /// The explanation is optional reveal content shown after grading.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyPrompt`, `ItemError::TooFewChoices`, or
    /// `ItemError::CorrectChoiceOutOfRange` on malformed input.
    pub fn multiple_choice(
        id: ItemId,
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_choice: usize,
        explanation: Option<String>,
    ) -> Result<Self, ItemError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ItemError::EmptyPrompt);
        }
        if choices.len() < 2 {
            return Err(ItemError::TooFewChoices(choices.len()));
        }
        if correct_choice >= choices.len() {
            return Err(ItemError::CorrectChoiceOutOfRange {
                index: correct_choice,
                len: choices.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            reveal: explanation.filter(|text| !text.trim().is_empty()),
            choices,
            correct_choice: Some(correct_choice),
            difficulty: None,
        })
    }

    /// Attach a difficulty tag.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Secondary content shown after a response: the card back, or the
    /// question explanation when the generator supplied one.
    #[must_use]
    pub fn reveal(&self) -> Option<&str> {
        self.reveal.as_deref()
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_choice(&self) -> Option<usize> {
        self.correct_choice
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn kind(&self) -> ItemKind {
        if self.choices.is_empty() {
            ItemKind::Flashcard
        } else {
            ItemKind::MultipleChoice
        }
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.kind() == ItemKind::MultipleChoice
    }
}

//
// ─── ITEM STORE ────────────────────────────────────────────────────────────────
//

/// Ordered sequence of items for one note, immutable once built.
///
/// A load or generate call replaces the whole store; sessions read it
/// through a shared handle and never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a ItemStore {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
