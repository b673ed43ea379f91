use std::{
  io,
  path::Path,
  time::Duration,
};

use eyre::{
  Result,
  WrapErr,
};
use serde::{
  Deserialize,
  Serialize,
};
use the_lib::markup::Placeholders;

/// Built-in composer.toml.
const DEFAULT_CONFIG: &str = include_str!("composer.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub placeholders: Placeholders,
  pub autocomplete: AutocompleteConfig,
  pub mention:      MentionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AutocompleteConfig {
  /// Upper bound on emoji offered for one shortcode query.
  pub max_emoji: usize,
}

impl Default for AutocompleteConfig {
  fn default() -> Self {
    Self { max_emoji: 8 }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MentionConfig {
  /// Base URL of the user directory. Mentions are disabled without one.
  pub endpoint:    Option<String>,
  pub debounce_ms: u64,
}

impl MentionConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

impl Default for MentionConfig {
  fn default() -> Self {
    Self {
      endpoint:    None,
      debounce_ms: 400,
    }
  }
}

pub fn default_config() -> Result<toml::Value> {
  toml::from_str(DEFAULT_CONFIG).wrap_err("failed to parse built-in composer.toml")
}

/// Parse a user config and merge it over the built-in defaults.
pub fn parse_config(user: &str) -> Result<Config> {
  let user: toml::Value = toml::from_str(user).wrap_err("failed to parse composer.toml")?;
  let merged = crate::merge_toml_values(default_config()?, user, 3);
  merged
    .try_into::<Config>()
    .wrap_err("invalid composer configuration")
}

/// Load the config from `path`, or from the default location when `path` is
/// `None`. A missing file at the default location yields the defaults; a
/// missing file that was asked for explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
  let file = match path {
    Some(path) => path.to_path_buf(),
    None => {
      match crate::config_file() {
        Some(file) => file,
        None => return parse_config(""),
      }
    },
  };

  match std::fs::read_to_string(&file) {
    Ok(text) => {
      tracing::debug!("loading config from {}", file.display());
      parse_config(&text).wrap_err_with(|| format!("failed to load {}", file.display()))
    },
    Err(err) if path.is_none() && err.kind() == io::ErrorKind::NotFound => {
      tracing::debug!("no config at {}, using defaults", file.display());
      parse_config("")
    },
    Err(err) => Err(err).wrap_err_with(|| format!("failed to read {}", file.display())),
  }
}
