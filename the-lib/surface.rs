//! The editable element a host exposes to the composer.
//!
//! Hosts wrap their real input (a DOM textarea, a TUI widget, ...) in a
//! [`TextSurface`]; the composer only ever talks to that trait, which keeps
//! the algorithmic core free of any UI dependency.

use crate::{
  document::Document,
  selection::{
    self,
    Selection,
  },
  transaction::Transaction,
};

pub trait TextSurface {
  fn text(&self) -> String;
  fn set_text(&mut self, text: &str);
  fn selection(&self) -> Selection;
  fn set_selection(&mut self, selection: Selection);
  fn focus(&mut self);

  /// Read text and selection as a [`Document`].
  fn document(&self) -> selection::Result<Document> {
    Document::with_selection(&self.text(), self.selection())
  }

  /// Write the outcome of `transaction` back. Text is written before the
  /// selection so the selection is never applied to stale text.
  fn apply(&mut self, transaction: &Transaction) -> selection::Result<Document> {
    let mut doc = self.document()?;
    doc.apply(transaction)?;
    self.set_text(doc.text());
    self.set_selection(doc.selection());
    Ok(doc)
  }
}

/// In-memory surface used by tests and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSurface {
  doc:     Document,
  focused: bool,
}

impl BufferSurface {
  pub fn new(text: &str) -> Self {
    Self {
      doc:     Document::new(text),
      focused: false,
    }
  }

  pub fn with_selection(text: &str, selection: Selection) -> selection::Result<Self> {
    Ok(Self {
      doc:     Document::with_selection(text, selection)?,
      focused: false,
    })
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn blur(&mut self) {
    self.focused = false;
  }

  /// Simulate the user typing `text` at the caret, replacing any selection.
  pub fn type_text(&mut self, text: &str) {
    let selection = self.doc.selection();
    let cursor = selection.start + text.chars().count();
    let tx = Transaction::change(
      self.doc.text(),
      [(selection.start, selection.end, Some(text.into()))],
      Selection::point(cursor),
    );
    match tx {
      Ok(tx) => {
        if let Err(err) = self.doc.apply(&tx) {
          tracing::warn!("failed to type into buffer surface: {err}");
        }
      },
      Err(err) => tracing::warn!("failed to type into buffer surface: {err}"),
    }
  }
}

impl TextSurface for BufferSurface {
  fn text(&self) -> String {
    self.doc.text().to_string()
  }

  fn set_text(&mut self, text: &str) {
    let selection = self.doc.selection();
    self.doc = Document::new(text);
    // keep the old selection when it still fits, like a textarea would
    let _ = self.doc.set_selection(selection);
  }

  fn selection(&self) -> Selection {
    self.doc.selection()
  }

  fn set_selection(&mut self, selection: Selection) {
    if let Err(err) = self.doc.set_selection(selection) {
      tracing::warn!("ignoring selection for buffer surface: {err}");
    }
  }

  fn focus(&mut self) {
    self.focused = true;
  }

  fn document(&self) -> selection::Result<Document> {
    Ok(self.doc.clone())
  }
}
