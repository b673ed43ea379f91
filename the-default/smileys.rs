use the_lib::{
  provider::{
    Suggestion,
    SuggestionProvider,
  },
  trigger::{
    self,
    Trigger,
  },
};

/// Text smileys and the emoji they turn into.
pub static SMILEYS: &[(&str, &str)] = &[
  (":)", "🙂"),
  (":-)", "🙂"),
  (":(", "🙁"),
  (":-(", "🙁"),
  (";)", "😉"),
  (";-)", "😉"),
  (":D", "😃"),
  (":-D", "😃"),
  (":P", "😛"),
  (":-P", "😛"),
  (":p", "😛"),
  (":-p", "😛"),
  (":O", "😮"),
  (":-O", "😮"),
  (":o", "😮"),
  (":-o", "😮"),
  (":|", "😐"),
  (":-|", "😐"),
  (":/", "😕"),
  (":-/", "😕"),
  (":*", "😘"),
  (":-*", "😘"),
  (":'(", "😢"),
  ("8)", "😎"),
  ("8-)", "😎"),
  ("B-)", "😎"),
  ("^^", "😊"),
  ("^_^", "😊"),
  (">:(", "😠"),
  ("<3", "❤️"),
  ("</3", "💔"),
];

fn smiley_trigger() -> String {
  let mut keys: Vec<&str> = SMILEYS.iter().map(|(key, _)| *key).collect();
  // longer keys first so ":-)" wins over ":)"
  keys.sort_by_key(|key| std::cmp::Reverse(key.len()));
  keys.dedup();
  let alternation = keys
    .iter()
    .map(|key| regex::escape(key))
    .collect::<Vec<_>>()
    .join("|");
  format!(r"(?:^|\s)(?P<token>{alternation})$")
}

pub struct SmileyProvider {
  trigger: Trigger,
}

impl SmileyProvider {
  pub fn new() -> trigger::Result<Self> {
    Ok(Self {
      trigger: Trigger::new(&smiley_trigger())?,
    })
  }
}

impl SuggestionProvider for SmileyProvider {
  fn name(&self) -> &str {
    "smileys"
  }

  fn trigger(&self) -> &Trigger {
    &self.trigger
  }

  fn data(&self, query: &str) -> Vec<Suggestion> {
    SMILEYS
      .iter()
      .filter(|(key, _)| *key == query)
      .map(|(key, emoji)| Suggestion::new(*key, *emoji))
      .collect()
  }

  fn render(&self, suggestion: &Suggestion) -> String {
    format!("{} {}", suggestion.value, suggestion.key)
  }
}
