//! Text transform primitives the markup toggles are built from.
//!
//! Every function here is pure: it reads the current text and selection and
//! returns either a value or a [`Transaction`] describing the edit. Offsets
//! are char indices and must lie within `[0, len]`; a transaction built from
//! bad offsets is rejected with a [`TransactionError`].

use regex::Regex;
use the_core::{
  chars::{
    self,
    ends_with_at,
    len_chars,
    starts_with_at,
  },
  line_ending::{
    self,
    preceding_line_endings,
    previous_line,
  },
};

use crate::{
  Tendril,
  selection::Selection,
  transaction::{
    Transaction,
    TransactionError,
  },
};

pub type Result<T> = std::result::Result<T, TransactionError>;

/// `text` with the char range `[start, end)` replaced by `replacement`.
///
/// # Panics
///
/// Panics unless `start <= end <= len_chars(text)`.
pub fn replace_at(text: &str, replacement: &str, start: usize, end: usize) -> String {
  let len = len_chars(text);
  assert!(
    start <= end && end <= len,
    "replace_at: range {start}..{end} out of bounds for length {len}"
  );
  let from = chars::char_to_byte(text, start);
  let to = chars::char_to_byte(text, end);
  let mut out = String::with_capacity(text.len() - (to - from) + replacement.len());
  out.push_str(&text[..from]);
  out.push_str(replacement);
  out.push_str(&text[to..]);
  out
}

/// Wrap the selection in `accent`, or unwrap it when it is already wrapped.
///
/// With a caret, `accent + placeholder + accent` is inserted and the
/// placeholder is selected. Only the `accent`-sized runs directly outside the
/// selection are inspected, so nested accents wrap again rather than unwrap.
pub fn toggle_in_accent(
  text: &str,
  placeholder: &str,
  accent: &str,
  selection: Selection,
) -> Result<Transaction> {
  let accent_len = len_chars(accent);
  let Selection { start, end } = selection;

  if selection.is_empty() {
    let mut insert = Tendril::new();
    insert.push_str(accent);
    insert.push_str(placeholder);
    insert.push_str(accent);
    let from = start + accent_len;
    return Transaction::insert(
      text,
      start,
      insert,
      Selection::new(from, from + len_chars(placeholder)),
    );
  }

  if ends_with_at(text, start, accent) && starts_with_at(text, end, accent) {
    tracing::trace!(accent, start, end, "unwrapping accent");
    return Transaction::change(
      text,
      [(start - accent_len, start, None), (end, end + accent_len, None)],
      selection.shift(-(accent_len as isize)),
    );
  }

  Transaction::change(
    text,
    [
      (start, start, Some(accent.into())),
      (end, end, Some(accent.into())),
    ],
    selection.shift(accent_len as isize),
  )
}

/// Toggle a line marker such as `"# "` on the line containing the selection
/// start.
///
/// When `detect` matches at the start of that line the matched prefix is
/// removed. Otherwise `marker` is inserted at the line start, preceded by a
/// newline when the line above is not blank so the block stays separated.
pub fn insert_block_at_first_newline(
  text: &str,
  selection: Selection,
  marker: &str,
  detect: &Regex,
) -> Result<Transaction> {
  let line_start = line_ending::line_start(text, selection.start);
  let line_end = line_ending::line_end(text, line_start);
  let line = chars::slice(text, line_start, line_end);

  if let Some(found) = detect.find(line).filter(|m| m.start() == 0 && !m.is_empty()) {
    let stripped = len_chars(found.as_str());
    let unshift = |pos: usize| pos.saturating_sub(stripped).max(line_start);
    return Transaction::change(
      text,
      [(line_start, line_start + stripped, None)],
      Selection::new(unshift(selection.start), unshift(selection.end)),
    );
  }

  let mut insert = Tendril::new();
  if previous_line(text, line_start).is_some_and(|line| !line.trim().is_empty()) {
    insert.push('\n');
  }
  insert.push_str(marker);
  let shift = len_chars(&insert) as isize;
  Transaction::insert(text, line_start, insert, selection.shift(shift))
}

/// The newlines needed before `start` so a block inserted there is separated
/// from preceding text by a blank line.
pub fn leading_newlines(text: &str, start: usize) -> &'static str {
  if start == 0 {
    return "";
  }
  match preceding_line_endings(text, start, 2) {
    2 => "",
    // the document starts with a blank line
    1 if start == 1 => "",
    1 => "\n",
    _ => "\n\n",
  }
}

pub fn is_beginning_of_line(text: &str, start: usize) -> bool {
  start == 0 || chars::char_before(text, start) == Some(line_ending::LINE_ENDING)
}

/// Whether the line above the one containing `start` matches `item`.
pub fn is_previous_line_list(text: &str, start: usize, item: &Regex) -> bool {
  previous_line(text, start).is_some_and(|line| item.is_match(line))
}

/// Backslash-escape every char of `text` that appears in `chars_to_escape`.
pub fn escape_text(text: &str, chars_to_escape: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    if chars_to_escape.contains(ch) {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

#[cfg(test)]
mod test {
  use quickcheck::quickcheck;

  use super::*;

  fn apply(text: &str, tx: &Transaction) -> (String, Selection) {
    (tx.apply_to(text), tx.selection())
  }

  #[test]
  fn replace_at_char_offsets() {
    assert_eq!(replace_at("héllo", "a", 1, 2), "hallo");
    assert_eq!(replace_at("abc", "", 0, 3), "");
    assert_eq!(replace_at("", "x", 0, 0), "x");
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn replace_at_out_of_range_panics() {
    replace_at("abc", "x", 2, 4);
  }

  #[test]
  fn accent_caret_inserts_placeholder() {
    let tx = toggle_in_accent("hello", "strong text", "**", Selection::point(5)).unwrap();
    let (text, selection) = apply("hello", &tx);
    assert_eq!(text, "hello**strong text**");
    assert_eq!(selection, Selection::new(7, 18));
  }

  #[test]
  fn accent_wraps_and_unwraps() {
    let text = "make it bold";
    let tx = toggle_in_accent(text, "", "**", Selection::new(8, 12)).unwrap();
    let (wrapped, selection) = apply(text, &tx);
    assert_eq!(wrapped, "make it **bold**");
    assert_eq!(selection, Selection::new(10, 14));

    let tx = toggle_in_accent(&wrapped, "", "**", selection).unwrap();
    let (unwrapped, selection) = apply(&wrapped, &tx);
    assert_eq!(unwrapped, text);
    assert_eq!(selection, Selection::new(8, 12));
  }

  #[test]
  fn accent_nested_wraps_again() {
    // only the bordering chars are inspected
    let text = "**a b**";
    let tx = toggle_in_accent(text, "", "**", Selection::new(2, 3)).unwrap();
    assert_eq!(tx.apply_to(text), "****a** b**");
  }

  quickcheck! {
    fn accent_round_trip(text: String, a: usize, b: usize, which: u8) -> bool {
      let text: String = text.chars().filter(|c| *c != '*' && *c != '~').collect();
      let len = len_chars(&text);
      if len == 0 {
        return true;
      }
      let accent = ["**", "*", "~~"][which as usize % 3];
      let selection = Selection::new(a % (len + 1), b % (len + 1));
      if selection.is_empty() {
        return true;
      }
      let Ok(first) = toggle_in_accent(&text, "", accent, selection) else {
        return false;
      };
      let wrapped = first.apply_to(&text);
      let Ok(second) = toggle_in_accent(&wrapped, "", accent, first.selection()) else {
        return false;
      };
      second.apply_to(&wrapped) == text && second.selection() == selection
    }
  }

  #[test]
  fn header_round_trip() {
    let header = Regex::new(r"^#+[ \t]*").unwrap();
    let text = "intro\n\nTitle here\nbody";
    let selection = Selection::point(10);

    let tx = insert_block_at_first_newline(text, selection, "# ", &header).unwrap();
    let (on, selection) = apply(text, &tx);
    assert_eq!(on, "intro\n\n# Title here\nbody");
    assert_eq!(selection, Selection::point(12));

    let tx = insert_block_at_first_newline(&on, selection, "# ", &header).unwrap();
    let (off, selection) = apply(&on, &tx);
    assert_eq!(off, text);
    assert_eq!(selection, Selection::point(10));
  }

  #[test]
  fn header_separates_from_paragraph() {
    let header = Regex::new(r"^#+[ \t]*").unwrap();
    let text = "para\nTitle";
    let tx = insert_block_at_first_newline(text, Selection::new(5, 10), "# ", &header).unwrap();
    let (on, selection) = apply(text, &tx);
    assert_eq!(on, "para\n\n# Title");
    assert_eq!(selection, Selection::new(8, 13));
  }

  #[test]
  fn strip_clamps_selection_inside_marker() {
    let cite = Regex::new(r"^(?:>[ \t]?)+").unwrap();
    let text = "> > quoted";
    let tx = insert_block_at_first_newline(text, Selection::new(1, 6), "> ", &cite).unwrap();
    let (off, selection) = apply(text, &tx);
    assert_eq!(off, "quoted");
    assert_eq!(selection, Selection::new(0, 2));
  }

  #[test]
  fn leading_newline_counts() {
    assert_eq!(leading_newlines("", 0), "");
    assert_eq!(leading_newlines("abc", 3), "\n\n");
    assert_eq!(leading_newlines("abc\n", 4), "\n");
    assert_eq!(leading_newlines("abc\n\n", 5), "");
    assert_eq!(leading_newlines("\n", 1), "");
  }

  #[test]
  fn line_predicates() {
    let item = Regex::new(r"^[-*+][ \t]").unwrap();
    let text = "- one\nnext";
    assert!(is_beginning_of_line(text, 0));
    assert!(is_beginning_of_line(text, 6));
    assert!(!is_beginning_of_line(text, 7));
    assert!(is_previous_line_list(text, 6, &item));
    assert!(is_previous_line_list(text, 9, &item));
    assert!(!is_previous_line_list(text, 2, &item));
    assert!(!is_previous_line_list("one\ntwo", 5, &item));
  }

  #[test]
  fn escapes_requested_chars() {
    assert_eq!(escape_text("a [b] (c)", "[]"), r"a \[b\] (c)");
    assert_eq!(escape_text(r#"x"y"#, "()\""), r#"x\"y"#);
    assert_eq!(escape_text("plain", "[]"), "plain");
  }
}
