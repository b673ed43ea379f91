//! Ties the autocomplete engine, the markup toggles and a [`TextSurface`]
//! together.
//!
//! Provider answers travel back through an unbounded channel tagged with the
//! generation they were requested for. Hosts drain it with
//! [`Composer::pump`] from their event loop or await
//! [`Composer::wait_for_suggestions`].

use std::sync::Arc;

use the_lib::{
  autocomplete::{
    Autocomplete,
    Effect,
    Generation,
  },
  input::Key,
  markup::{
    self,
    MarkupError,
    Placeholders,
    Prompt,
    Toggle,
    ToggleOutcome,
  },
  provider::{
    ProviderId,
    Suggestion,
    SuggestionProvider,
  },
  selection::SelectionError,
  surface::TextSurface,
  transaction::Transaction,
};
use thiserror::Error;
use tokio::sync::mpsc::{
  UnboundedReceiver,
  UnboundedSender,
  unbounded_channel,
};

use crate::completion_menu::CompletionMenuState;

pub type Result<T> = std::result::Result<T, ComposerError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComposerError {
  #[error(transparent)]
  Markup(#[from] MarkupError),
  #[error(transparent)]
  Selection(#[from] SelectionError),
  #[error("no {0} prompt is pending")]
  NoPendingPrompt(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleResult {
  Applied,
  /// The toggle needs input; answer with [`Composer::confirm_link`] or
  /// [`Composer::confirm_code_language`].
  Prompt(Prompt),
}

#[derive(Debug)]
struct Resolved {
  generation: Generation,
  provider:   ProviderId,
  items:      Vec<Suggestion>,
}

type TextChangeCallback = Box<dyn FnMut(&str) + Send>;

pub struct Composer<S: TextSurface> {
  surface:        S,
  engine:         Autocomplete,
  placeholders:   Placeholders,
  pending:        Option<Prompt>,
  results_tx:     UnboundedSender<Resolved>,
  results_rx:     UnboundedReceiver<Resolved>,
  on_change:      Option<TextChangeCallback>,
  render_pending: bool,
}

impl<S: TextSurface> Composer<S> {
  pub fn new(
    surface: S,
    providers: Vec<Arc<dyn SuggestionProvider>>,
    placeholders: Placeholders,
  ) -> Self {
    let (results_tx, results_rx) = unbounded_channel();
    Self {
      surface,
      engine: Autocomplete::new(providers),
      placeholders,
      pending: None,
      results_tx,
      results_rx,
      on_change: None,
      render_pending: false,
    }
  }

  pub fn surface(&self) -> &S {
    &self.surface
  }

  pub fn surface_mut(&mut self) -> &mut S {
    &mut self.surface
  }

  pub fn engine(&self) -> &Autocomplete {
    &self.engine
  }

  pub fn pending_prompt(&self) -> Option<&Prompt> {
    self.pending.as_ref()
  }

  /// Called with the new text after every toggle and completion.
  pub fn on_text_change(&mut self, callback: impl FnMut(&str) + Send + 'static) {
    self.on_change = Some(Box::new(callback));
  }

  /// Whether the menu changed since the last call.
  pub fn take_render_request(&mut self) -> bool {
    std::mem::take(&mut self.render_pending)
  }

  pub fn menu(&self) -> CompletionMenuState {
    CompletionMenuState::from_engine(&self.engine)
  }

  pub fn key_up(&mut self, key: Key) -> Result<()> {
    let doc = self.surface.document()?;
    let effects = self.engine.key_up(key, &doc);
    self.run(effects)?;
    // synchronous providers have already answered
    self.pump()?;
    Ok(())
  }

  /// Returns `true` when the open list consumed the key.
  pub fn key_down(&mut self, key: Key) -> Result<bool> {
    let doc = self.surface.document()?;
    let outcome = self.engine.key_down(key, &doc);
    let consumed = outcome.is_consumed();
    self.run(outcome.into_effects())?;
    Ok(consumed)
  }

  pub fn click(&mut self, index: usize) -> Result<()> {
    let doc = self.surface.document()?;
    let effects = self.engine.click(index, &doc);
    self.run(effects)
  }

  pub fn apply_toggle(&mut self, op: Toggle) -> Result<ToggleResult> {
    let dismissed = self.engine.dismiss();
    self.run(dismissed)?;

    let doc = self.surface.document()?;
    match markup::toggle(&doc, op, &self.placeholders)? {
      ToggleOutcome::Edit(tx) => {
        self.apply(&tx)?;
        self.surface.focus();
        Ok(ToggleResult::Applied)
      },
      ToggleOutcome::Prompt(prompt) => {
        tracing::debug!(%op, "waiting for prompt answer");
        self.pending = Some(prompt.clone());
        Ok(ToggleResult::Prompt(prompt))
      },
    }
  }

  /// Answer a pending link prompt. An empty target is rejected and the
  /// prompt stays pending.
  pub fn confirm_link(&mut self, target: &str) -> Result<()> {
    let Some(Prompt::LinkTarget { text, selection }) = &self.pending else {
      return Err(ComposerError::NoPendingPrompt("link"));
    };
    let doc = self.surface.document()?;
    let tx = markup::insert_link(&doc, *selection, text, target)?;
    self.pending = None;
    self.apply(&tx)?;
    self.surface.focus();
    Ok(())
  }

  pub fn confirm_code_language(&mut self, language: &str) -> Result<()> {
    let Some(Prompt::CodeLanguage { selection }) = &self.pending else {
      return Err(ComposerError::NoPendingPrompt("code language"));
    };
    let doc = self.surface.document()?;
    let tx = markup::insert_code_block(&doc, *selection, language, &self.placeholders)?;
    self.pending = None;
    self.apply(&tx)?;
    self.surface.focus();
    Ok(())
  }

  pub fn cancel_prompt(&mut self) -> Option<Prompt> {
    let prompt = self.pending.take();
    if prompt.is_some() {
      self.surface.focus();
    }
    prompt
  }

  /// Merge every answer that has already arrived. Returns how many were
  /// received, stale ones included.
  pub fn pump(&mut self) -> Result<usize> {
    let mut received = 0;
    while let Ok(resolved) = self.results_rx.try_recv() {
      received += 1;
      self.resolve(resolved)?;
    }
    Ok(received)
  }

  /// Wait for the next provider answer and merge it. The answer may turn
  /// out to be stale, in which case the list is left as it is. Returns right
  /// away when no armed provider is still due to answer.
  pub async fn wait_for_suggestions(&mut self) -> Result<()> {
    // the composer holds a sender, so the channel never closes
    if !self.engine.is_waiting() {
      return Ok(());
    }
    if let Some(resolved) = self.results_rx.recv().await {
      self.resolve(resolved)?;
    }
    Ok(())
  }

  fn resolve(&mut self, resolved: Resolved) -> Result<()> {
    let Resolved {
      generation,
      provider,
      items,
    } = resolved;
    let effects = self.engine.resolve(generation, provider, items);
    self.run(effects)
  }

  fn run(&mut self, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
      match effect {
        Effect::Fetch {
          provider,
          query,
          generation,
        } => {
          let Some(source) = self.engine.provider(provider).cloned() else {
            continue;
          };
          let tx = self.results_tx.clone();
          source.suggestions(
            &query,
            Box::new(move |items| {
              let resolved = Resolved {
                generation,
                provider,
                items,
              };
              if tx.send(resolved).is_err() {
                tracing::trace!("composer closed before suggestions arrived");
              }
            }),
          );
        },
        Effect::Apply(tx) => self.apply(&tx)?,
        Effect::Focus => self.surface.focus(),
        Effect::RequestRender => self.render_pending = true,
      }
    }
    Ok(())
  }

  fn apply(&mut self, tx: &Transaction) -> Result<()> {
    let doc = self.surface.apply(tx)?;
    if let Some(callback) = self.on_change.as_mut() {
      callback(doc.text());
    }
    Ok(())
  }
}
