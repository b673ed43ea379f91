//! The contract every suggestion source implements.

use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

use crate::{
  Tendril,
  selection::Selection,
  trigger::Trigger,
};

/// Index of a provider in the engine's registration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub usize);

impl fmt::Display for ProviderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// One entry offered by a provider. What `key` and `value` hold is up to the
/// provider; the emoji provider stores the shortcode and the emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
  pub key:   String,
  pub value: String,
}

impl Suggestion {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key:   key.into(),
      value: value.into(),
    }
  }
}

pub type SuggestionCallback = Box<dyn FnOnce(Vec<Suggestion>) + Send>;

pub trait SuggestionProvider: Send + Sync {
  fn name(&self) -> &str;

  fn trigger(&self) -> &Trigger;

  /// Produce suggestions for `query` and hand them to `reply`, possibly
  /// later and from another task. Failures are logged and answered with an
  /// empty list, never propagated.
  fn suggestions(&self, query: &str, reply: SuggestionCallback) {
    reply(self.data(query));
  }

  fn data(&self, _query: &str) -> Vec<Suggestion> {
    Vec::new()
  }

  fn render(&self, suggestion: &Suggestion) -> String {
    suggestion.key.clone()
  }

  fn complete(&self, suggestion: &Suggestion) -> Tendril {
    Tendril::from(suggestion.value.as_str())
  }

  /// Adjust where the caret lands after `replacement` was inserted.
  /// `default` is a caret right after the replacement.
  fn cursor_position(&self, default: Selection, _replacement: &str) -> Selection {
    default
  }
}

#[cfg(test)]
mod test {
  use std::sync::{
    Arc,
    Mutex,
  };

  use super::*;

  struct Fixed {
    trigger: Trigger,
  }

  impl SuggestionProvider for Fixed {
    fn name(&self) -> &str {
      "fixed"
    }

    fn trigger(&self) -> &Trigger {
      &self.trigger
    }

    fn data(&self, query: &str) -> Vec<Suggestion> {
      vec![Suggestion::new(query, query.to_uppercase())]
    }
  }

  #[test]
  fn default_methods_delegate_to_data() {
    let provider = Fixed {
      trigger: Trigger::new(r"!\w+$").unwrap(),
    };
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    provider.suggestions("ab", Box::new(move |items| sink.lock().unwrap().extend(items)));

    let items = seen.lock().unwrap().clone();
    assert_eq!(items, vec![Suggestion::new("ab", "AB")]);
    assert_eq!(provider.render(&items[0]), "ab");
    assert_eq!(provider.complete(&items[0]).as_str(), "AB");
    assert_eq!(
      provider.cursor_position(Selection::point(3), "AB"),
      Selection::point(3)
    );
  }
}
