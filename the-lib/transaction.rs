//! Atomic edits: text changes paired with the selection they produce.
//!
//! A [`Transaction`] holds one or more [`Change`]s, each replacing a char
//! range of the *original* text, plus the [`Selection`] that is valid for the
//! text *after* the changes. Keeping both together means a document can never
//! receive new text with a selection computed against old text.
//!
//! ```
//! use the_lib::{selection::Selection, transaction::Transaction};
//!
//! let tx = Transaction::change(
//!   "hello world",
//!   [(6, 11, Some("rust".into()))],
//!   Selection::point(10),
//! )
//! .unwrap();
//! assert_eq!(tx.apply_to("hello world"), "hello rust");
//! ```
//!
//! # Error Handling
//!
//! - **InvalidRange** - Change range has start > end
//! - **RangeOutOfBounds** - Change range extends past document end
//! - **OverlappingRange** - Changes overlap or are not sorted

use smallvec::SmallVec;
use the_core::chars::{
  char_to_byte,
  len_chars,
};
use thiserror::Error;

use crate::{
  Tendril,
  selection::Selection,
};

pub type Result<T> = std::result::Result<T, TransactionError>;

/// (from, to) replacement.
pub type Change = (usize, usize, Option<Tendril>);

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionError {
  #[error("invalid change range: start {from} is after end {to}")]
  InvalidRange { from: usize, to: usize },
  #[error("change range {from}..{to} is out of bounds for document length {len}")]
  RangeOutOfBounds {
    from: usize,
    to:   usize,
    len:  usize,
  },
  #[error("change range {from}..{to} overlaps previous end {prev_end}")]
  OverlappingRange {
    prev_end: usize,
    from:     usize,
    to:       usize,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
  changes:   SmallVec<[Change; 2]>,
  selection: Selection,
}

impl Transaction {
  /// Build a transaction from sorted, non-overlapping changes against `text`.
  pub fn change<I>(text: &str, changes: I, selection: Selection) -> Result<Self>
  where
    I: IntoIterator<Item = Change>,
  {
    let len = len_chars(text);
    let changes: SmallVec<[Change; 2]> = changes.into_iter().collect();

    let mut prev_end = 0;
    for (from, to, _) in &changes {
      let (from, to) = (*from, *to);
      if from > to {
        return Err(TransactionError::InvalidRange { from, to });
      }
      if to > len {
        return Err(TransactionError::RangeOutOfBounds { from, to, len });
      }
      if from < prev_end {
        return Err(TransactionError::OverlappingRange { prev_end, from, to });
      }
      prev_end = to;
    }

    Ok(Self { changes, selection })
  }

  /// Insert `fragment` at `pos`.
  pub fn insert(text: &str, pos: usize, fragment: Tendril, selection: Selection) -> Result<Self> {
    Self::change(text, [(pos, pos, Some(fragment))], selection)
  }

  /// A transaction that only moves the selection.
  pub fn select(selection: Selection) -> Self {
    Self {
      changes: SmallVec::new(),
      selection,
    }
  }

  pub fn changes(&self) -> &[Change] {
    &self.changes
  }

  pub fn selection(&self) -> Selection {
    self.selection
  }

  pub fn is_empty(&self) -> bool {
    self
      .changes
      .iter()
      .all(|(from, to, insert)| from == to && insert.as_ref().is_none_or(|s| s.is_empty()))
  }

  /// Produce the text that results from applying the changes to `text`.
  ///
  /// `text` must be the text the transaction was built against.
  pub fn apply_to(&self, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + self.inserted_bytes());
    let mut last = 0;
    for (from, to, insert) in &self.changes {
      let from = char_to_byte(text, *from);
      out.push_str(&text[last..from]);
      if let Some(insert) = insert {
        out.push_str(insert);
      }
      last = char_to_byte(text, *to);
    }
    out.push_str(&text[last..]);
    out
  }

  fn inserted_bytes(&self) -> usize {
    self
      .changes
      .iter()
      .filter_map(|(_, _, insert)| insert.as_ref().map(|s| s.len()))
      .sum()
  }
}
