//! Default providers and the host-facing composer.
//!
//! This crate puts concrete suggestion sources and a [`Composer`] on top of
//! `the-lib`, which itself knows nothing about runtimes or networking.

mod completion_menu;
mod composer;
mod emoji;
mod mention;
mod smileys;
mod symbols;

use std::sync::Arc;

pub use completion_menu::{
  CompletionMenuItem,
  CompletionMenuState,
  MAX_VISIBLE_ITEMS,
};
pub use composer::{
  Composer,
  ComposerError,
  ToggleResult,
};
pub use emoji::{
  EMOJI,
  EmojiProvider,
};
pub use mention::{
  HttpUserDirectory,
  MentionHook,
  MentionProvider,
  User,
  UserDirectory,
};
pub use smileys::{
  SMILEYS,
  SmileyProvider,
};
pub use symbols::{
  SYMBOLS,
  SymbolProvider,
};
use the_lib::{
  provider::SuggestionProvider,
  trigger,
};
use the_loader::config::Config;

/// Providers in registration order: symbols, emoji, smileys, then mentions
/// when a user directory is available.
///
/// The mention provider spawns its lookup hook on the current tokio runtime.
pub fn default_providers(
  config: &Config,
  directory: Option<Arc<dyn UserDirectory>>,
) -> trigger::Result<Vec<Arc<dyn SuggestionProvider>>> {
  let mut providers: Vec<Arc<dyn SuggestionProvider>> = vec![
    Arc::new(SymbolProvider::new()?),
    Arc::new(EmojiProvider::new(config.autocomplete.max_emoji)?),
    Arc::new(SmileyProvider::new()?),
  ];
  if let Some(directory) = directory {
    providers.push(Arc::new(MentionProvider::new(
      directory,
      config.mention.debounce(),
    )?));
  }
  Ok(providers)
}
