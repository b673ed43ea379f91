//! Trigger-driven autocomplete state machine.
//!
//! The engine never talks to a surface or a runtime. Hosts feed it key events
//! and provider results and carry out the [`Effect`]s it returns. Every
//! key-up that re-evaluates the triggers starts a new [`Generation`]; results
//! tagged with an older generation are dropped, so a slow provider can never
//! reopen a list the user already moved past.

use std::sync::Arc;

use the_core::chars::len_chars;

use crate::{
  document::Document,
  input::Key,
  provider::{
    ProviderId,
    Suggestion,
    SuggestionProvider,
  },
  selection::Selection,
  transaction::Transaction,
  trigger::TriggerMatch,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
  #[must_use]
  pub const fn next(self) -> Self {
    Self(self.0.wrapping_add(1))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
  /// Ask `provider` for suggestions; answer with [`Autocomplete::resolve`].
  Fetch {
    provider:   ProviderId,
    query:      String,
    generation: Generation,
  },
  Apply(Transaction),
  Focus,
  RequestRender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDown {
  /// The list consumed the key.
  Handled(Vec<Effect>),
  /// The list reacted, the host still handles the key.
  PassThrough(Vec<Effect>),
  /// No list is open.
  Ignored,
}

impl KeyDown {
  pub fn is_consumed(&self) -> bool {
    matches!(self, KeyDown::Handled(_))
  }

  pub fn into_effects(self) -> Vec<Effect> {
    match self {
      KeyDown::Handled(effects) | KeyDown::PassThrough(effects) => effects,
      KeyDown::Ignored => Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Idle,
  Suggesting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSuggestion {
  pub provider:   ProviderId,
  pub suggestion: Suggestion,
}

#[derive(Debug, Clone)]
struct Armed {
  provider: ProviderId,
  found:    TriggerMatch,
  resolved: bool,
}

#[derive(Default)]
pub struct Autocomplete {
  providers:   Vec<Arc<dyn SuggestionProvider>>,
  armed:       Vec<Armed>,
  suggestions: Vec<TaggedSuggestion>,
  highlighted: Option<usize>,
  generation:  Generation,
}

impl Autocomplete {
  pub fn new(providers: Vec<Arc<dyn SuggestionProvider>>) -> Self {
    Self {
      providers,
      ..Self::default()
    }
  }

  pub fn register(&mut self, provider: Arc<dyn SuggestionProvider>) -> ProviderId {
    self.providers.push(provider);
    ProviderId(self.providers.len() - 1)
  }

  pub fn provider(&self, id: ProviderId) -> Option<&Arc<dyn SuggestionProvider>> {
    self.providers.get(id.0)
  }

  pub fn providers(&self) -> &[Arc<dyn SuggestionProvider>] {
    &self.providers
  }

  pub fn generation(&self) -> Generation {
    self.generation
  }

  pub fn state(&self) -> State {
    if self.armed.is_empty() && self.suggestions.is_empty() {
      State::Idle
    } else {
      State::Suggesting
    }
  }

  pub fn suggestions(&self) -> &[TaggedSuggestion] {
    &self.suggestions
  }

  pub fn highlighted(&self) -> Option<usize> {
    self.highlighted
  }

  pub fn is_open(&self) -> bool {
    !self.suggestions.is_empty()
  }

  /// Whether an armed provider has not answered yet.
  pub fn is_waiting(&self) -> bool {
    self.armed.iter().any(|armed| !armed.resolved)
  }

  pub fn is_armed(&self, provider: ProviderId) -> bool {
    self.armed.iter().any(|armed| armed.provider == provider)
  }

  /// The trigger match `provider` was armed with on the last key-up.
  pub fn armed_match(&self, provider: ProviderId) -> Option<&TriggerMatch> {
    self
      .armed
      .iter()
      .find(|armed| armed.provider == provider)
      .map(|armed| &armed.found)
  }

  pub fn key_up(&mut self, key: Key, doc: &Document) -> Vec<Effect> {
    if key.skips_trigger_check() {
      return Vec::new();
    }

    let was_open = self.is_open();
    self.reset();

    let mut effects = Vec::new();
    if was_open {
      effects.push(Effect::RequestRender);
    }
    if !doc.selection().is_empty() {
      return effects;
    }

    let before_caret = doc.text_before_cursor();
    for (idx, provider) in self.providers.iter().enumerate() {
      let Some(found) = provider.trigger().find(before_caret) else {
        continue;
      };
      let id = ProviderId(idx);
      tracing::trace!(provider = provider.name(), query = %found.query, "trigger matched");
      effects.push(Effect::Fetch {
        provider:   id,
        query:      found.query.clone(),
        generation: self.generation,
      });
      self.armed.push(Armed {
        provider: id,
        found,
        resolved: false,
      });
    }
    effects
  }

  /// Merge a provider's answer into the list. Answers for an older
  /// generation, or from a provider that is not armed, are dropped.
  pub fn resolve(
    &mut self,
    generation: Generation,
    provider: ProviderId,
    items: Vec<Suggestion>,
  ) -> Vec<Effect> {
    if generation != self.generation {
      tracing::trace!(%provider, ?generation, current = ?self.generation, "dropping stale suggestions");
      return Vec::new();
    }
    let Some(armed) = self
      .armed
      .iter_mut()
      .find(|armed| armed.provider == provider && !armed.resolved)
    else {
      tracing::trace!(%provider, "dropping suggestions from a provider that is not armed");
      return Vec::new();
    };
    armed.resolved = true;

    if items.is_empty() {
      return Vec::new();
    }
    self.suggestions.extend(
      items
        .into_iter()
        .map(|suggestion| TaggedSuggestion { provider, suggestion }),
    );
    vec![Effect::RequestRender]
  }

  pub fn key_down(&mut self, key: Key, doc: &Document) -> KeyDown {
    if !self.is_open() || key.is_modifier() {
      return KeyDown::Ignored;
    }
    let count = self.suggestions.len();

    match key {
      Key::Down => {
        self.highlighted = Some(self.highlighted.map_or(0, |idx| (idx + 1) % count));
        KeyDown::Handled(vec![Effect::RequestRender])
      },
      Key::Up => {
        self.highlighted = Some(match self.highlighted {
          None | Some(0) => count - 1,
          Some(idx) => idx - 1,
        });
        KeyDown::Handled(vec![Effect::RequestRender])
      },
      Key::Tab => KeyDown::Handled(self.complete(self.highlighted.unwrap_or(0), doc)),
      Key::Enter => {
        match self.highlighted {
          Some(idx) => KeyDown::Handled(self.complete(idx, doc)),
          None => KeyDown::PassThrough(self.dismiss()),
        }
      },
      _ => {
        let mut effects = self.dismiss();
        effects.push(Effect::Focus);
        KeyDown::PassThrough(effects)
      },
    }
  }

  /// Replace the trigger token before the caret with suggestion `index`.
  ///
  /// The trigger is matched again against the current text; when it no
  /// longer matches the list is only dismissed.
  pub fn complete(&mut self, index: usize, doc: &Document) -> Vec<Effect> {
    let chosen = self.suggestions.get(index).cloned();
    let mut effects = self.dismiss();

    let Some(TaggedSuggestion { provider, suggestion }) = chosen else {
      tracing::debug!(index, "no suggestion to complete");
      return effects;
    };
    let Some(provider) = self.providers.get(provider.0).cloned() else {
      return effects;
    };

    let selection = doc.selection();
    let found = if selection.is_empty() {
      provider.trigger().find(doc.text_before_cursor())
    } else {
      None
    };
    let Some(found) = found else {
      tracing::debug!(provider = provider.name(), "trigger no longer matches, dismissing");
      return effects;
    };

    let replacement = provider.complete(&suggestion);
    let default = Selection::point(found.start + len_chars(&replacement));
    let cursor = provider.cursor_position(default, &replacement);

    match Transaction::change(
      doc.text(),
      [(found.start, selection.cursor(), Some(replacement))],
      cursor,
    ) {
      Ok(tx) => {
        effects.push(Effect::Apply(tx));
        effects.push(Effect::Focus);
      },
      Err(err) => tracing::warn!(provider = provider.name(), "failed to complete suggestion: {err}"),
    }
    effects
  }

  pub fn click(&mut self, index: usize, doc: &Document) -> Vec<Effect> {
    self.complete(index, doc)
  }

  /// Close the list and start a new generation so late answers are dropped.
  pub fn dismiss(&mut self) -> Vec<Effect> {
    let was_open = self.is_open();
    self.reset();
    if was_open {
      vec![Effect::RequestRender]
    } else {
      Vec::new()
    }
  }

  fn reset(&mut self) {
    self.generation = self.generation.next();
    self.armed.clear();
    self.suggestions.clear();
    self.highlighted = None;
  }
}
