use the_core::chars::len_chars;
use the_lib::{
  provider::{
    Suggestion,
    SuggestionProvider,
  },
  selection::Selection,
  trigger::{
    self,
    Trigger,
  },
};

pub const SYMBOL_TRIGGER: &str =
  r#"(?P<token>\(c\)|\(r\)|\(tm\)|\.\.\.|--|->|<-|=>|<=|>=|!=|\+-|<<|>>|"|')$"#;

/// Typed sequence and the typographic replacements it offers.
pub static SYMBOLS: &[(&str, &[&str])] = &[
  ("(c)", &["©"]),
  ("(r)", &["®"]),
  ("(tm)", &["™"]),
  ("...", &["…"]),
  ("--", &["–", "—"]),
  ("->", &["→"]),
  ("<-", &["←"]),
  ("=>", &["⇒"]),
  ("<=", &["≤", "⇐"]),
  (">=", &["≥"]),
  ("!=", &["≠"]),
  ("+-", &["±"]),
  ("<<", &["«"]),
  (">>", &["»"]),
  ("\"", &["“”", "«»", "„“"]),
  ("'", &["‘’", "‹›"]),
];

const QUOTES: &str = "“”«»„‘’‹›";

pub struct SymbolProvider {
  trigger: Trigger,
}

impl SymbolProvider {
  pub fn new() -> trigger::Result<Self> {
    Ok(Self {
      trigger: Trigger::new(SYMBOL_TRIGGER)?,
    })
  }
}

impl SuggestionProvider for SymbolProvider {
  fn name(&self) -> &str {
    "symbols"
  }

  fn trigger(&self) -> &Trigger {
    &self.trigger
  }

  fn data(&self, query: &str) -> Vec<Suggestion> {
    SYMBOLS
      .iter()
      .filter(|(sequence, _)| *sequence == query)
      .flat_map(|&(sequence, replacements)| {
        replacements
          .iter()
          .map(move |replacement| Suggestion::new(sequence, *replacement))
      })
      .collect()
  }

  fn render(&self, suggestion: &Suggestion) -> String {
    format!("{} {}", suggestion.value, suggestion.key)
  }

  /// Quote pairs put the caret between the quotes.
  fn cursor_position(&self, default: Selection, replacement: &str) -> Selection {
    if len_chars(replacement) == 2 && replacement.chars().all(|ch| QUOTES.contains(ch)) {
      default.shift(-1)
    } else {
      default
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn matches_sequences_at_the_caret() {
    let provider = SymbolProvider::new().unwrap();
    assert_eq!(provider.trigger().find("a -->").unwrap().token, "->");
    assert_eq!(provider.trigger().find("(tm)").unwrap().token, "(tm)");
    assert_eq!(provider.trigger().find("say \"").unwrap().start, 4);
    assert!(provider.trigger().find("a - >").is_none());
  }

  #[test]
  fn quotes_offer_pairs() {
    let provider = SymbolProvider::new().unwrap();
    let values: Vec<String> = provider
      .data("\"")
      .into_iter()
      .map(|suggestion| suggestion.value)
      .collect();
    assert_eq!(values, vec!["“”", "«»", "„“"]);
    assert_eq!(provider.data("--").len(), 2);
    assert!(provider.data("~~").is_empty());
  }

  #[test]
  fn caret_goes_between_quote_pairs() {
    let provider = SymbolProvider::new().unwrap();
    let default = Selection::point(6);
    assert_eq!(provider.cursor_position(default, "‘’"), Selection::point(5));
    assert_eq!(provider.cursor_position(default, "«"), default);
    assert_eq!(provider.cursor_position(default, "–"), default);
  }
}
