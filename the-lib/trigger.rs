//! End-anchored patterns that decide when a suggestion provider wakes up.

use regex::Regex;
use the_core::chars::byte_to_char;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriggerError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriggerError {
  #[error("invalid trigger pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
  #[error("trigger pattern '{0}' must be anchored at the end with '$'")]
  Unanchored(String),
}

/// Where a trigger matched the text before the caret.
///
/// `start..end` is the char range of the `token` group, the span a
/// completion replaces. `query` is the text handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
  pub start: usize,
  pub end:   usize,
  pub token: String,
  pub query: String,
}

/// A regex matched against the text ending at the caret.
///
/// The optional named groups `token` and `query` select the replaced span
/// and the provider query; both default to the whole match.
#[derive(Debug, Clone)]
pub struct Trigger {
  regex: Regex,
}

impl Trigger {
  pub fn new(pattern: &str) -> Result<Self> {
    let anchored = pattern.ends_with('$') && (!pattern.ends_with(r"\$") || pattern.ends_with(r"\\$"));
    if !anchored {
      return Err(TriggerError::Unanchored(pattern.to_string()));
    }
    Ok(Self {
      regex: Regex::new(pattern)?,
    })
  }

  pub fn as_str(&self) -> &str {
    self.regex.as_str()
  }

  /// Match against `before_caret`, the document text up to the caret.
  /// Returned offsets are char offsets into `before_caret`.
  pub fn find(&self, before_caret: &str) -> Option<TriggerMatch> {
    let captures = self.regex.captures(before_caret)?;
    let whole = captures.get(0)?;
    let token = captures.name("token").unwrap_or(whole);
    let query = captures.name("query").unwrap_or(token);

    Some(TriggerMatch {
      start: byte_to_char(before_caret, token.start()),
      end:   byte_to_char(before_caret, token.end()),
      token: token.as_str().to_string(),
      query: query.as_str().to_string(),
    })
  }

  pub fn is_match(&self, before_caret: &str) -> bool {
    self.regex.is_match(before_caret)
  }
}
