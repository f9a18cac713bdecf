use thiserror::Error;

/// Index outside the bounds of the item sequence.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("index {index} is out of range for {len} items")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

/// Position within an ordered item sequence.
///
/// The position is `None` only while the sequence is empty. Relative moves
/// clamp at the ends instead of failing; absolute jumps are bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: Option<usize>,
    len: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            position: if len == 0 { None } else { Some(0) },
            len,
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.position == Some(0)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.len > 0 && self.position == Some(self.len - 1)
    }

    /// Move forward one item. Returns whether the position changed;
    /// at the last item this is a no-op.
    pub fn advance(&mut self) -> bool {
        match self.position {
            Some(position) if position + 1 < self.len => {
                self.position = Some(position + 1);
                true
            }
            _ => false,
        }
    }

    /// Move back one item. Returns whether the position changed;
    /// at the first item this is a no-op.
    pub fn retreat(&mut self) -> bool {
        match self.position {
            Some(position) if position > 0 => {
                self.position = Some(position - 1);
                true
            }
            _ => false,
        }
    }

    /// Set the position directly.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRangeError` if `index` does not address an item; the
    /// position is left unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<(), OutOfRangeError> {
        if index >= self.len {
            return Err(OutOfRangeError {
                index,
                len: self.len,
            });
        }
        self.position = Some(index);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
