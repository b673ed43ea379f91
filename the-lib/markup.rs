//! Markup toggles for the composer toolbar.
//!
//! Each [`Toggle`] reads the current [`Document`] and produces either an edit
//! or a request for more input from the host (a link target or a code
//! language). Nothing is remembered between calls: whether a selection is
//! "already bold" is worked out from the text around it every time.

use std::{
  fmt,
  str::FromStr,
  sync::LazyLock,
};

use regex::Regex;
use serde::{
  Deserialize,
  Serialize,
};
use the_core::{
  chars::{
    self,
    len_chars,
    starts_with_at,
  },
  line_ending::{
    self,
    previous_line,
  },
};
use thiserror::Error;

use crate::{
  Tendril,
  document::Document,
  selection::Selection,
  transaction::{
    Transaction,
    TransactionError,
  },
  transform::{
    escape_text,
    insert_block_at_first_newline,
    is_beginning_of_line,
    is_previous_line_list,
    leading_newlines,
    toggle_in_accent,
  },
};

pub type Result<T> = std::result::Result<T, MarkupError>;

const FENCE: &str = "~~~";
const FENCE_CLOSE: &str = "\n~~~";

pub const LINK_TEXT_ESCAPES: &str = "[]";
pub const LINK_TARGET_ESCAPES: &str = "()\"";

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+[ \t]*").unwrap());
static CITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:>[ \t]?)+").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+][ \t]").unwrap());
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.[ \t]").unwrap());
static FENCE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^~~~[\w+#.\-]*$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkupError {
  #[error("link target must not be empty")]
  EmptyLinkTarget,
  #[error("unknown markup toggle '{0}'")]
  UnknownToggle(String),
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Toggle {
  Bold,
  Italic,
  Strike,
  Header,
  Cite,
  UnorderedList,
  OrderedList,
  Code,
  Link,
}

impl Toggle {
  pub const ALL: [Toggle; 9] = [
    Toggle::Bold,
    Toggle::Italic,
    Toggle::Strike,
    Toggle::Header,
    Toggle::Cite,
    Toggle::UnorderedList,
    Toggle::OrderedList,
    Toggle::Code,
    Toggle::Link,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Toggle::Bold => "bold",
      Toggle::Italic => "italic",
      Toggle::Strike => "strike",
      Toggle::Header => "header",
      Toggle::Cite => "cite",
      Toggle::UnorderedList => "unordered-list",
      Toggle::OrderedList => "ordered-list",
      Toggle::Code => "code",
      Toggle::Link => "link",
    }
  }
}

impl fmt::Display for Toggle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Toggle {
  type Err = MarkupError;

  fn from_str(s: &str) -> Result<Self> {
    Toggle::ALL
      .into_iter()
      .find(|op| op.name() == s)
      .ok_or_else(|| MarkupError::UnknownToggle(s.to_string()))
  }
}

/// Text inserted when a toggle is applied to a caret. Hosts usually load
/// these from their translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Placeholders {
  pub strong:    String,
  pub emphasis:  String,
  pub strike:    String,
  pub code:      String,
  pub list_item: String,
}

impl Default for Placeholders {
  fn default() -> Self {
    Self {
      strong:    "strong text".to_string(),
      emphasis:  "emphasized text".to_string(),
      strike:    "strikethrough text".to_string(),
      code:      "code text".to_string(),
      list_item: "List item".to_string(),
    }
  }
}

/// Input the host has to collect before a toggle can finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
  /// Ask for a link target; finish with [`insert_link`].
  LinkTarget { text: String, selection: Selection },
  /// Ask for a code block language; finish with [`insert_code_block`].
  CodeLanguage { selection: Selection },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
  Edit(Transaction),
  Prompt(Prompt),
}

pub fn toggle(doc: &Document, op: Toggle, placeholders: &Placeholders) -> Result<ToggleOutcome> {
  let text = doc.text();
  let selection = doc.selection();

  let edit = match op {
    Toggle::Bold => toggle_in_accent(text, &placeholders.strong, "**", selection)?,
    Toggle::Italic => toggle_in_accent(text, &placeholders.emphasis, "*", selection)?,
    Toggle::Strike => toggle_in_accent(text, &placeholders.strike, "~~", selection)?,
    Toggle::Header => insert_block_at_first_newline(text, selection, "# ", &HEADER)?,
    Toggle::Cite => insert_block_at_first_newline(text, selection, "> ", &CITE)?,
    Toggle::UnorderedList => toggle_list(doc, false, placeholders)?,
    Toggle::OrderedList => toggle_list(doc, true, placeholders)?,
    Toggle::Code => return toggle_code(doc, placeholders),
    Toggle::Link => {
      return Ok(ToggleOutcome::Prompt(Prompt::LinkTarget {
        text: doc.selected_text().to_string(),
        selection,
      }));
    },
  };

  tracing::debug!(%op, ?selection, "applied markup toggle");
  Ok(ToggleOutcome::Edit(edit))
}

fn toggle_list(doc: &Document, ordered: bool, placeholders: &Placeholders) -> Result<Transaction> {
  let text = doc.text();
  let selection = doc.selection();
  let item: &Regex = if ordered { &ORDERED_ITEM } else { &UNORDERED_ITEM };
  // a trailing line ending stays outside the list
  let (selected, selection) = match doc.selected_text().strip_suffix('\n') {
    Some(body) if !body.is_empty() => (body, Selection::new(selection.start, selection.end - 1)),
    _ => (doc.selected_text(), selection),
  };

  if !selection.is_empty() && selected.split('\n').all(|line| item.is_match(line)) {
    let block = selected
      .split('\n')
      .map(|line| item.find(line).map_or(line, |found| &line[found.end()..]))
      .collect::<Vec<_>>()
      .join("\n");
    let end = selection.start + len_chars(&block);
    return Ok(Transaction::change(
      text,
      [(selection.start, selection.end, Some(block.into()))],
      Selection::new(selection.start, end),
    )?);
  }

  let line_end = line_ending::line_end(text, selection.start);
  let current_line = chars::slice(
    text,
    line_ending::line_start(text, selection.start),
    line_end,
  );
  let leading = if is_beginning_of_line(text, selection.start)
    && is_previous_line_list(text, selection.start, item)
  {
    ""
  } else if selection.start == line_end && item.is_match(current_line) {
    "\n"
  } else {
    leading_newlines(text, selection.start)
  };

  let mut insert = Tendril::from(leading);
  let block_start = selection.start + len_chars(leading);

  if selection.is_empty() {
    insert.push_str(list_marker(ordered, 1).as_str());
    let from = selection.start + len_chars(&insert);
    insert.push_str(&placeholders.list_item);
    return Ok(Transaction::insert(
      text,
      selection.start,
      insert,
      Selection::new(from, from + len_chars(&placeholders.list_item)),
    )?);
  }

  for (idx, line) in selected.split('\n').enumerate() {
    if idx > 0 {
      insert.push('\n');
    }
    insert.push_str(list_marker(ordered, idx + 1).as_str());
    insert.push_str(line);
  }
  let end = selection.start + len_chars(&insert);
  Ok(Transaction::change(
    text,
    [(selection.start, selection.end, Some(insert))],
    Selection::new(block_start, end),
  )?)
}

fn list_marker(ordered: bool, number: usize) -> Tendril {
  if ordered {
    Tendril::from(format!("{number}. "))
  } else {
    Tendril::from("- ")
  }
}

fn toggle_code(doc: &Document, placeholders: &Placeholders) -> Result<ToggleOutcome> {
  let text = doc.text();
  let selection = doc.selection();
  let Selection { start, end } = selection;
  let selected = doc.selected_text();

  // the selection is a whole fenced block
  if let Some(inner) = selected
    .strip_prefix("~~~\n")
    .and_then(|rest| rest.strip_suffix(FENCE_CLOSE))
  {
    let tx = Transaction::change(
      text,
      [(start, end, Some(inner.into()))],
      Selection::new(start, start + len_chars(inner)),
    )?;
    return Ok(ToggleOutcome::Edit(tx));
  }

  // the selection is the body of a fenced block
  if let Some(open_len) = surrounding_fence(text, selection) {
    let tx = Transaction::change(
      text,
      [
        (start - open_len, start, None),
        (end, end + len_chars(FENCE_CLOSE), None),
      ],
      selection.shift(-(open_len as isize)),
    )?;
    return Ok(ToggleOutcome::Edit(tx));
  }

  if let Some(inner) = strip_backticks(selected) {
    let tx = Transaction::change(
      text,
      [(start, end, Some(inner.into()))],
      Selection::new(start, start + len_chars(inner)),
    )?;
    return Ok(ToggleOutcome::Edit(tx));
  }

  if is_inside_backticks(text, selection) {
    let tx = Transaction::change(
      text,
      [(start - 1, start, None), (end, end + 1, None)],
      selection.shift(-1),
    )?;
    return Ok(ToggleOutcome::Edit(tx));
  }

  let body = if selection.is_empty() {
    placeholders.code.as_str()
  } else {
    selected
  };

  if body.contains('\n') {
    return Ok(ToggleOutcome::Edit(fenced_block(text, selection, "", body)?));
  }

  let preceded_by_blank_line = start == 0 || leading_newlines(text, start).is_empty();
  let ends_line = end == len_chars(text) || chars::char_at(text, end) == Some('\n');
  if preceded_by_blank_line && ends_line {
    tracing::debug!(?selection, "requesting code block language");
    return Ok(ToggleOutcome::Prompt(Prompt::CodeLanguage { selection }));
  }

  let mut insert = Tendril::from("`");
  insert.push_str(body);
  insert.push('`');
  let from = start + 1;
  let tx = Transaction::change(
    text,
    [(start, end, Some(insert))],
    Selection::new(from, from + len_chars(body)),
  )?;
  Ok(ToggleOutcome::Edit(tx))
}

/// Length of the opening fence line (including its newline) when `selection`
/// is exactly the body of a fenced block.
fn surrounding_fence(text: &str, selection: Selection) -> Option<usize> {
  if selection.start == 0 || !is_beginning_of_line(text, selection.start) {
    return None;
  }
  let open = previous_line(text, selection.start).filter(|line| FENCE_LINE.is_match(line))?;
  if !starts_with_at(text, selection.end, FENCE_CLOSE) {
    return None;
  }
  let after = selection.end + len_chars(FENCE_CLOSE);
  if line_ending::line_end(text, after) != after {
    return None;
  }
  Some(len_chars(open) + 1)
}

fn strip_backticks(selected: &str) -> Option<&str> {
  if selected.starts_with("``") || selected.ends_with("``") {
    return None;
  }
  selected
    .strip_prefix('`')
    .and_then(|rest| rest.strip_suffix('`'))
}

fn is_inside_backticks(text: &str, selection: Selection) -> bool {
  chars::char_before(text, selection.start) == Some('`')
    && chars::char_at(text, selection.end) == Some('`')
    && chars::char_before(text, selection.start.saturating_sub(1)) != Some('`')
    && chars::char_at(text, selection.end + 1) != Some('`')
}

fn fenced_block(
  text: &str,
  selection: Selection,
  language: &str,
  body: &str,
) -> std::result::Result<Transaction, TransactionError> {
  let leading = leading_newlines(text, selection.start);
  let trailing = match chars::char_at(text, selection.end) {
    Some(ch) if ch != '\n' => "\n",
    _ => "",
  };

  let mut insert = Tendril::from(leading);
  insert.push_str(FENCE);
  insert.push_str(language);
  insert.push('\n');
  let from = selection.start + len_chars(&insert);
  insert.push_str(body);
  insert.push_str(FENCE_CLOSE);
  insert.push_str(trailing);

  Transaction::change(
    text,
    [(selection.start, selection.end, Some(insert))],
    Selection::new(from, from + len_chars(body)),
  )
}

/// Finish a [`Prompt::CodeLanguage`] by inserting a fenced block tagged with
/// `language` around the text at `selection`.
pub fn insert_code_block(
  doc: &Document,
  selection: Selection,
  language: &str,
  placeholders: &Placeholders,
) -> Result<Transaction> {
  let selected = chars::slice(doc.text(), selection.start, selection.end);
  let body = if selected.is_empty() {
    placeholders.code.as_str()
  } else {
    selected
  };
  Ok(fenced_block(doc.text(), selection, language.trim(), body)?)
}

/// Finish a [`Prompt::LinkTarget`]. An empty target is rejected and leaves
/// the document as it is.
pub fn insert_link(
  doc: &Document,
  selection: Selection,
  text: &str,
  target: &str,
) -> Result<Transaction> {
  let target = target.trim();
  if target.is_empty() {
    tracing::warn!("rejecting link with empty target");
    return Err(MarkupError::EmptyLinkTarget);
  }

  let target = escape_text(target, LINK_TARGET_ESCAPES);
  let markup = if text.is_empty() {
    format!("<{target}>")
  } else {
    format!("[{}]({target})", escape_text(text, LINK_TEXT_ESCAPES))
  };
  let cursor = selection.start + len_chars(&markup);
  Ok(Transaction::change(
    doc.text(),
    [(selection.start, selection.end, Some(markup.into()))],
    Selection::point(cursor),
  )?)
}
