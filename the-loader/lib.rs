pub mod config;

use std::path::{
  Path,
  PathBuf,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

pub const APP_NAME: &str = "the-composer";

/// Directory holding `composer.toml`.
///
/// `THE_COMPOSER_CONFIG_DIR` takes precedence over the platform default.
pub fn config_dir() -> Option<PathBuf> {
  if let Ok(dir) = std::env::var("THE_COMPOSER_CONFIG_DIR") {
    return Some(expand_tilde(Path::new(&dir)));
  }
  match choose_base_strategy() {
    Ok(strategy) => Some(strategy.config_dir().join(APP_NAME)),
    Err(err) => {
      tracing::warn!("unable to find the config directory: {err}");
      None
    },
  }
}

pub fn config_file() -> Option<PathBuf> {
  config_dir().map(|dir| dir.join("composer.toml"))
}

fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(rest) = path.strip_prefix("~") else {
    return path.to_path_buf();
  };
  match etcetera::home_dir() {
    Ok(home) => home.join(rest),
    Err(_) => path.to_path_buf(),
  }
}

/// Merge `right` onto `left`.
///
/// Tables present on both sides are merged key by key up to `merge_depth`
/// levels deep; below that, and for every other kind of value, `right` wins.
///
/// ```
/// let left: toml::Value = toml::from_str("[mention]\ndebounce-ms = 400").unwrap();
/// let right: toml::Value = toml::from_str("[mention]\nendpoint = \"https://x\"").unwrap();
/// let merged = the_loader::merge_toml_values(left, right, 3);
/// assert_eq!(merged["mention"]["debounce-ms"].as_integer(), Some(400));
/// assert_eq!(merged["mention"]["endpoint"].as_str(), Some("https://x"));
/// ```
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (key, rvalue) in right_map {
        let merged = match left_map.remove(&key) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(key, merged);
      }
      Value::Table(left_map)
    },
    (_, value) => value,
  }
}
