use the_lib::autocomplete::Autocomplete;

pub const MAX_VISIBLE_ITEMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMenuItem {
  pub label:  String,
  /// Name of the provider that offered the item.
  pub detail: Option<String>,
}

impl CompletionMenuItem {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label:  label.into(),
      detail: None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMenuState {
  pub active:   bool,
  pub items:    Vec<CompletionMenuItem>,
  pub selected: Option<usize>,
  pub scroll:   usize,
}

impl CompletionMenuState {
  /// Snapshot of the engine's merged list, rendered by each item's provider.
  pub fn from_engine(engine: &Autocomplete) -> Self {
    let items = engine
      .suggestions()
      .iter()
      .map(|tagged| {
        match engine.provider(tagged.provider) {
          Some(provider) => {
            CompletionMenuItem {
              label:  provider.render(&tagged.suggestion),
              detail: Some(provider.name().to_string()),
            }
          },
          None => CompletionMenuItem::new(tagged.suggestion.key.clone()),
        }
      })
      .collect();

    let mut state = Self::default();
    state.set_items(items, engine.highlighted());
    state
  }

  pub fn clear(&mut self) {
    self.active = false;
    self.items.clear();
    self.selected = None;
    self.scroll = 0;
  }

  pub fn set_items(&mut self, items: Vec<CompletionMenuItem>, selected: Option<usize>) {
    self.items = items;
    self.active = !self.items.is_empty();
    self.selected = selected;
    self.scroll = 0;
    self.clamp();
  }

  /// The rows currently inside the scroll window.
  pub fn visible(&self) -> &[CompletionMenuItem] {
    let end = self.items.len().min(self.scroll + MAX_VISIBLE_ITEMS);
    &self.items[self.scroll.min(end)..end]
  }

  fn clamp(&mut self) {
    if self.items.is_empty() {
      self.clear();
      return;
    }

    let max_index = self.items.len() - 1;
    self.selected = self.selected.map(|selected| selected.min(max_index));
    let selected = self.selected.unwrap_or(0);

    if selected < self.scroll {
      self.scroll = selected;
    } else {
      let visible_end = self
        .scroll
        .saturating_add(MAX_VISIBLE_ITEMS)
        .saturating_sub(1);
      if selected > visible_end {
        self.scroll = selected + 1 - MAX_VISIBLE_ITEMS;
      }
    }

    let max_scroll = self.items.len().saturating_sub(MAX_VISIBLE_ITEMS);
    self.scroll = self.scroll.min(max_scroll);
  }
}
