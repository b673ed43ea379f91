//! Caret and selection ranges.
//!
//! A [`Selection`] is a pair of char offsets into the document text with
//! `start <= end`. When `start == end` the selection is a caret:
//!
//! ```text
//! start=2, end=7: "he[llo w]orld"
//! start=5, end=5: "hello|world"
//! ```
//!
//! Host inputs may report a backwards selection (the user dragged right to
//! left); [`Selection::new`] normalizes that so the rest of the crate never
//! has to care about direction.

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectionError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
  #[error("selection {start}..{end} is out of bounds for text length {len}")]
  OutOfBounds { start: usize, end: usize, len: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
  pub start: usize,
  pub end:   usize,
}

impl Selection {
  #[must_use]
  pub fn new(start: usize, end: usize) -> Self {
    Self {
      start: start.min(end),
      end:   start.max(end),
    }
  }

  #[must_use]
  pub fn point(pos: usize) -> Self {
    Self {
      start: pos,
      end:   pos,
    }
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.end - self.start
  }

  /// `true` for a caret with nothing selected.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }

  /// The caret position. For a range this is its end, where typing resumes.
  #[inline]
  #[must_use]
  pub fn cursor(&self) -> usize {
    self.end
  }

  #[must_use]
  pub fn shift(self, delta: isize) -> Self {
    Self::new(
      self.start.saturating_add_signed(delta),
      self.end.saturating_add_signed(delta),
    )
  }

  pub fn ensure_within(&self, len: usize) -> Result<()> {
    if self.end > len {
      return Err(SelectionError::OutOfBounds {
        start: self.start,
        end: self.end,
        len,
      });
    }
    Ok(())
  }
}

impl From<std::ops::Range<usize>> for Selection {
  fn from(range: std::ops::Range<usize>) -> Self {
    Self::new(range.start, range.end)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn normalizes_backwards_ranges() {
    let selection = Selection::new(7, 2);
    assert_eq!(selection, Selection { start: 2, end: 7 });
    assert_eq!(selection.len(), 5);
    assert!(!selection.is_empty());
    assert!(Selection::point(3).is_empty());
  }

  #[test]
  fn shifts_and_bounds() {
    assert_eq!(Selection::new(4, 6).shift(2), Selection::new(6, 8));
    assert_eq!(Selection::new(1, 6).shift(-3), Selection::new(0, 3));
    assert!(Selection::new(0, 5).ensure_within(5).is_ok());
    assert_eq!(
      Selection::new(2, 6).ensure_within(5),
      Err(SelectionError::OutOfBounds {
        start: 2,
        end:   6,
        len:   5,
      })
    );
  }
}
