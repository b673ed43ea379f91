use the_core::{
  chars::{
    self,
    len_chars,
  },
  line_ending,
};

use crate::{
  selection::{
    self,
    Selection,
    SelectionError,
  },
  transaction::Transaction,
};

/// The composer text together with its selection.
///
/// Text and selection only ever change together through [`Document::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  text:      String,
  selection: Selection,
}

impl Document {
  /// Seed a document from initial text, caret at the end.
  pub fn new(text: &str) -> Self {
    let text = line_ending::normalize(text).into_owned();
    let selection = Selection::point(len_chars(&text));
    Self { text, selection }
  }

  pub fn with_selection(text: &str, selection: Selection) -> selection::Result<Self> {
    let text = line_ending::normalize(text).into_owned();
    selection.ensure_within(len_chars(&text))?;
    Ok(Self { text, selection })
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn selection(&self) -> Selection {
    self.selection
  }

  pub fn len_chars(&self) -> usize {
    len_chars(&self.text)
  }

  pub fn selected_text(&self) -> &str {
    chars::slice(&self.text, self.selection.start, self.selection.end)
  }

  /// Text from the start of the document up to the caret.
  pub fn text_before_cursor(&self) -> &str {
    chars::slice(&self.text, 0, self.selection.cursor())
  }

  pub fn set_selection(&mut self, selection: Selection) -> selection::Result<()> {
    selection.ensure_within(self.len_chars())?;
    self.selection = selection;
    Ok(())
  }

  /// Apply `transaction`, replacing text and selection in one step. On error
  /// the document is left untouched.
  pub fn apply(&mut self, transaction: &Transaction) -> Result<(), SelectionError> {
    let text = transaction.apply_to(&self.text);
    let selection = transaction.selection();
    selection.ensure_within(len_chars(&text))?;
    self.text = text;
    self.selection = selection;
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn seeds_with_caret_at_end() {
    let doc = Document::new("line\r\nnext");
    assert_eq!(doc.text(), "line\nnext");
    assert_eq!(doc.selection(), Selection::point(9));
    assert_eq!(doc.text_before_cursor(), "line\nnext");
  }

  #[test]
  fn apply_replaces_text_and_selection_together() {
    let mut doc = Document::with_selection("hello", Selection::new(0, 5)).unwrap();
    assert_eq!(doc.selected_text(), "hello");
    let tx = Transaction::change(doc.text(), [(5, 5, Some(" world".into()))], Selection::point(11))
      .unwrap();
    doc.apply(&tx).unwrap();
    assert_eq!(doc.text(), "hello world");
    assert_eq!(doc.selection(), Selection::point(11));
  }

  #[test]
  fn apply_rejects_selection_past_new_text() {
    let mut doc = Document::new("abc");
    let tx = Transaction::change(doc.text(), [(0, 3, None)], Selection::point(2)).unwrap();
    assert!(doc.apply(&tx).is_err());
    assert_eq!(doc.text(), "abc");
  }
}
