//! Char-indexed views over plain `&str`.
//!
//! Offsets handed around the composer are char indices, the unit a host text
//! input reports for its selection. These helpers translate between char and
//! byte offsets so the rest of the workspace can slice ordinary strings.

use ropey::str_utils::{
  byte_to_char_idx,
  char_to_byte_idx,
};

#[inline]
pub fn len_chars(text: &str) -> usize {
  text.chars().count()
}

/// Byte offset of `char_idx`. Past-the-end indices map to `text.len()`.
#[inline]
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
  char_to_byte_idx(text, char_idx)
}

#[inline]
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
  byte_to_char_idx(text, byte_idx)
}

/// The `[from, to)` char range of `text`. Bounds past the end are clamped.
pub fn slice(text: &str, from: usize, to: usize) -> &str {
  let from = char_to_byte(text, from);
  let to = char_to_byte(text, to).max(from);
  &text[from..to]
}

pub fn char_at(text: &str, char_idx: usize) -> Option<char> {
  text[char_to_byte(text, char_idx)..].chars().next()
}

pub fn char_before(text: &str, char_idx: usize) -> Option<char> {
  char_idx.checked_sub(1).and_then(|idx| char_at(text, idx))
}

/// Whether the text right before `pos` is exactly `needle`.
pub fn ends_with_at(text: &str, pos: usize, needle: &str) -> bool {
  text[..char_to_byte(text, pos)].ends_with(needle)
}

/// Whether the text starting at `pos` begins with `needle`.
pub fn starts_with_at(text: &str, pos: usize, needle: &str) -> bool {
  text[char_to_byte(text, pos)..].starts_with(needle)
}

#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn slices_by_char_not_byte() {
    let text = "héllo wörld";
    assert_eq!(len_chars(text), 11);
    assert_eq!(slice(text, 1, 5), "éllo");
    assert_eq!(slice(text, 6, 99), "wörld");
    assert_eq!(slice(text, 4, 2), "");
    assert_eq!(char_at(text, 7), Some('ö'));
    assert_eq!(char_at(text, 11), None);
    assert_eq!(char_before(text, 0), None);
    assert_eq!(char_before(text, 2), Some('é'));
  }

  #[test]
  fn boundary_matches() {
    let text = "a **ö** b";
    assert!(ends_with_at(text, 4, "**"));
    assert!(starts_with_at(text, 5, "**"));
    assert!(!starts_with_at(text, 4, "**"));
    assert!(ends_with_at(text, 0, ""));
  }
}
