//! Key events as the composer sees them.
//!
//! Hosts translate their native keyboard events into [`Key`]; modifier keys
//! are reported as keys of their own because a DOM fires key-up for them too.

use serde::{
  Deserialize,
  Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
  Char(char),
  Enter,
  Escape,
  Backspace,
  Tab,
  Delete,
  Home,
  End,
  PageUp,
  PageDown,
  Left,
  Right,
  Up,
  Down,
  Shift,
  Control,
  Alt,
  Meta,
  CapsLock,
  Other,
}

impl Key {
  #[must_use]
  pub const fn is_modifier(self) -> bool {
    matches!(
      self,
      Key::Shift | Key::Control | Key::Alt | Key::Meta | Key::CapsLock
    )
  }

  #[must_use]
  pub const fn is_arrow(self) -> bool {
    matches!(self, Key::Left | Key::Right | Key::Up | Key::Down)
  }

  /// Keys whose release never changes the text near the caret, so the
  /// autocomplete triggers are not re-evaluated for them.
  #[must_use]
  pub const fn skips_trigger_check(self) -> bool {
    self.is_modifier() || self.is_arrow() || matches!(self, Key::Tab | Key::Enter | Key::Escape)
  }
}

impl From<char> for Key {
  fn from(ch: char) -> Self {
    match ch {
      '\n' => Key::Enter,
      '\t' => Key::Tab,
      ch => Key::Char(ch),
    }
  }
}
