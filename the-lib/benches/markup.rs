//! Benchmarks for markup toggles and trigger matching in the-lib.
//!
//! Run with: `cargo bench -p the-lib --bench markup`

use divan::{
  Bencher,
  black_box,
};
use the_lib::{
  document::Document,
  markup::{
    Placeholders,
    Toggle,
    toggle,
  },
  selection::Selection,
  trigger::Trigger,
};

fn main() {
  divan::main();
}

fn make_text(size: usize) -> String {
  let line = "The quick brown fox jumps over the lazy dog.\n";
  let mut s = String::with_capacity(size);
  while s.len() < size {
    s.push_str(line);
  }
  s.truncate(size);
  s
}

mod accent {
  use super::*;

  #[divan::bench(args = [1024, 64 * 1024, 1024 * 1024])]
  fn bold_selection_mid_document(bencher: Bencher, size: usize) {
    let text = make_text(size);
    let mid = text.chars().count() / 2;
    let doc = Document::with_selection(&text, Selection::new(mid, mid + 5)).unwrap();
    let placeholders = Placeholders::default();

    bencher.bench(|| black_box(toggle(black_box(&doc), Toggle::Bold, &placeholders).unwrap()));
  }
}

mod lists {
  use super::*;

  #[divan::bench(args = [10, 100, 1000])]
  fn ordered_list_over_lines(bencher: Bencher, lines: usize) {
    let text = make_text(lines * 45);
    let len = text.chars().count();
    let doc = Document::with_selection(&text, Selection::new(0, len)).unwrap();
    let placeholders = Placeholders::default();

    bencher.bench(|| {
      black_box(toggle(black_box(&doc), Toggle::OrderedList, &placeholders).unwrap())
    });
  }
}

mod triggers {
  use super::*;

  #[divan::bench(args = [1024, 64 * 1024])]
  fn emoji_trigger_at_caret(bencher: Bencher, size: usize) {
    let mut text = make_text(size);
    text.push_str(" :smi");
    let trigger = Trigger::new(r"(?:^|\s)(?P<token>:(?P<query>[a-z0-9_+\-]{2,}))$").unwrap();

    bencher.bench(|| black_box(trigger.find(black_box(&text))));
  }
}
