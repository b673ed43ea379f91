//! Line helpers for composer text.
//!
//! Browser text inputs report `\n` only, so the composer treats LF as the sole
//! line ending and normalizes anything else on the way in.

use std::borrow::Cow;

use crate::chars::{
  byte_to_char,
  char_at,
  char_to_byte,
  len_chars,
};

pub const LINE_ENDING: char = '\n';

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,
  /// U+000A -- LineFeed
  LF,
  /// U+000D -- CarriageReturn
  CR,
}

impl LineEnding {
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::LF => "\u{000A}",
      Self::CR => "\u{000D}",
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      '\u{000D}' => Some(LineEnding::CR),
      _ => None,
    }
  }
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  ch == LINE_ENDING
}

/// Rewrite CRLF and lone CR as LF. Borrows when nothing needs changing.
pub fn normalize(text: &str) -> Cow<'_, str> {
  if !text.contains(LineEnding::CR.as_str()) {
    return Cow::Borrowed(text);
  }
  Cow::Owned(
    text
      .replace(LineEnding::Crlf.as_str(), LineEnding::LF.as_str())
      .replace(LineEnding::CR.as_str(), LineEnding::LF.as_str()),
  )
}

/// Char index of the first char on the line containing `pos`.
pub fn line_start(text: &str, pos: usize) -> usize {
  let byte = char_to_byte(text, pos);
  match text[..byte].rfind(LINE_ENDING) {
    Some(idx) => byte_to_char(text, idx + 1),
    None => 0,
  }
}

/// Char index of the line ending terminating the line containing `pos`, or
/// the end of the text for the last line.
pub fn line_end(text: &str, pos: usize) -> usize {
  let byte = char_to_byte(text, pos);
  match text[byte..].find(LINE_ENDING) {
    Some(idx) => byte_to_char(text, byte + idx),
    None => len_chars(text),
  }
}

/// The line before the one containing `pos`, without its line ending.
pub fn previous_line(text: &str, pos: usize) -> Option<&str> {
  let start = line_start(text, pos);
  if start == 0 {
    return None;
  }
  let prev_start = line_start(text, start - 1);
  let from = char_to_byte(text, prev_start);
  let to = char_to_byte(text, start - 1);
  Some(&text[from..to])
}

/// Number of consecutive line endings right before `pos`, up to `max`.
pub fn preceding_line_endings(text: &str, pos: usize, max: usize) -> usize {
  (1..=max.min(pos))
    .take_while(|offset| char_at(text, pos - offset) == Some(LINE_ENDING))
    .count()
}
