use std::{
  sync::{
    Arc,
    Mutex,
  },
  time::Duration,
};

use async_trait::async_trait;
use the_default::{
  Composer,
  ComposerError,
  MentionProvider,
  ToggleResult,
  User,
  UserDirectory,
  default_providers,
};
use the_lib::{
  input::Key,
  markup::{
    MarkupError,
    Placeholders,
    Prompt,
    Toggle,
  },
  provider::SuggestionProvider,
  selection::Selection,
  surface::{
    BufferSurface,
    TextSurface,
  },
};
use the_loader::config::Config;

struct Directory {
  users:   Vec<&'static str>,
  queries: Mutex<Vec<String>>,
}

impl Directory {
  fn new(users: &[&'static str]) -> Arc<Self> {
    Arc::new(Self {
      users:   users.to_vec(),
      queries: Mutex::default(),
    })
  }
}

#[async_trait]
impl UserDirectory for Directory {
  async fn search(&self, term: &str) -> eyre::Result<Vec<User>> {
    self.queries.lock().unwrap().push(term.to_string());
    Ok(
      self
        .users
        .iter()
        .enumerate()
        .filter(|(_, name)| name.starts_with(term))
        .map(|(id, name)| {
          User {
            id:       id as u64,
            username: name.to_string(),
          }
        })
        .collect(),
    )
  }
}

fn mention_composer(text: &str, directory: Arc<Directory>) -> Composer<BufferSurface> {
  let mention: Arc<dyn SuggestionProvider> =
    Arc::new(MentionProvider::new(directory, Duration::from_millis(400)).unwrap());
  Composer::new(BufferSurface::new(text), vec![mention], Placeholders::default())
}

fn type_text(composer: &mut Composer<BufferSurface>, text: &str) {
  for ch in text.chars() {
    composer.key_down(Key::Char(ch)).unwrap();
    composer.surface_mut().type_text(&ch.to_string());
    composer.key_up(Key::Char(ch)).unwrap();
  }
}

#[tokio::test(start_paused = true)]
async fn mention_completes_after_debounce() {
  let directory = Directory::new(&["anna", "bob"]);
  let mut composer = mention_composer("@ann", directory.clone());

  composer.key_up(Key::Char('n')).unwrap();
  assert!(!composer.menu().active);

  tokio::time::timeout(Duration::from_secs(1), composer.wait_for_suggestions())
    .await
    .unwrap()
    .unwrap();
  let menu = composer.menu();
  assert_eq!(menu.items.len(), 1);
  assert_eq!(menu.items[0].label, "@anna");
  assert_eq!(menu.items[0].detail.as_deref(), Some("mentions"));

  assert!(composer.key_down(Key::Tab).unwrap());
  assert_eq!(composer.surface().text(), "@anna");
  assert_eq!(composer.surface().selection(), Selection::point(5));
  assert!(composer.surface().is_focused());
  assert!(!composer.menu().active);
}

#[tokio::test(start_paused = true)]
async fn typing_fast_queries_once() {
  let directory = Directory::new(&["anna"]);
  let mut composer = mention_composer("", directory.clone());

  type_text(&mut composer, "@ann");
  tokio::time::timeout(Duration::from_secs(1), composer.wait_for_suggestions())
    .await
    .unwrap()
    .unwrap();

  assert_eq!(*directory.queries.lock().unwrap(), vec!["ann".to_string()]);
  assert_eq!(composer.menu().items.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_answer_does_not_reopen_the_list() {
  let directory = Directory::new(&["anna"]);
  let mut composer = mention_composer("@ann", directory);

  composer.key_up(Key::Char('n')).unwrap();
  // the user moves on before the lookup finishes
  composer.surface_mut().type_text(" ");
  composer.key_up(Key::Char(' ')).unwrap();

  assert!(!composer.engine().is_waiting());
  tokio::time::sleep(Duration::from_secs(1)).await;
  // the old lookup still answers and is dropped
  assert_eq!(composer.pump().unwrap(), 1);
  assert!(!composer.menu().active);
  assert!(!composer.key_down(Key::Tab).unwrap());
}

#[tokio::test]
async fn waiting_without_armed_providers_returns() {
  let providers = default_providers(&Config::default(), None).unwrap();
  let mut composer = Composer::new(BufferSurface::new("plain"), providers, Placeholders::default());

  composer.key_up(Key::Char('n')).unwrap();
  assert!(!composer.engine().is_waiting());
  tokio::time::timeout(Duration::from_millis(50), composer.wait_for_suggestions())
    .await
    .unwrap()
    .unwrap();
  assert!(!composer.menu().active);
}

#[tokio::test]
async fn smiley_does_not_arm_mentions() {
  let directory: Arc<dyn UserDirectory> = Directory::new(&["anna"]);
  let providers = default_providers(&Config::default(), Some(directory)).unwrap();
  let mut composer = Composer::new(BufferSurface::new("hi :-)"), providers, Placeholders::default());

  composer.key_up(Key::Char(')')).unwrap();

  let engine = composer.engine();
  let armed: Vec<&str> = engine
    .providers()
    .iter()
    .enumerate()
    .filter(|(idx, _)| engine.is_armed(the_lib::provider::ProviderId(*idx)))
    .map(|(_, provider)| provider.name())
    .collect();
  assert_eq!(armed, vec!["smileys"]);

  assert_eq!(composer.menu().items[0].label, "🙂 :-)");
  composer.click(0).unwrap();
  assert_eq!(composer.surface().text(), "hi 🙂");
}

#[tokio::test]
async fn quote_pair_leaves_caret_inside() {
  let providers = default_providers(&Config::default(), None).unwrap();
  let mut composer = Composer::new(BufferSurface::new("say "), providers, Placeholders::default());

  type_text(&mut composer, "\"");
  let labels: Vec<String> = composer
    .menu()
    .items
    .into_iter()
    .map(|item| item.label)
    .collect();
  assert_eq!(labels, vec!["“” \"", "«» \"", "„“ \""]);

  assert!(composer.key_down(Key::Tab).unwrap());
  assert_eq!(composer.surface().text(), "say “”");
  assert_eq!(composer.surface().selection(), Selection::point(5));
}

#[tokio::test]
async fn emoji_arrow_selection() {
  let providers = default_providers(&Config::default(), None).unwrap();
  let mut composer = Composer::new(BufferSurface::new("party "), providers, Placeholders::default());

  type_text(&mut composer, ":tad");
  assert!(composer.key_down(Key::Down).unwrap());
  assert_eq!(composer.menu().selected, Some(0));
  assert!(composer.key_down(Key::Enter).unwrap());
  assert_eq!(composer.surface().text(), "party 🎉");
}

#[test]
fn toggles_report_text_changes() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let mut composer = Composer::new(BufferSurface::new("hello"), Vec::new(), Placeholders::default());
  composer.on_text_change(move |text| sink.lock().unwrap().push(text.to_string()));

  assert_eq!(
    composer.apply_toggle(Toggle::Bold).unwrap(),
    ToggleResult::Applied
  );
  assert_eq!(composer.surface().text(), "hello**strong text**");
  assert_eq!(composer.surface().selection(), Selection::new(7, 18));
  assert_eq!(*seen.lock().unwrap(), vec!["hello**strong text**".to_string()]);
}

#[test]
fn link_prompt_round_trip() {
  let surface = BufferSurface::with_selection("read the docs", Selection::new(9, 13)).unwrap();
  let mut composer = Composer::new(surface, Vec::new(), Placeholders::default());

  let ToggleResult::Prompt(Prompt::LinkTarget { text, .. }) =
    composer.apply_toggle(Toggle::Link).unwrap()
  else {
    panic!("expected a link prompt");
  };
  assert_eq!(text, "docs");

  let err = composer.confirm_link("  ").unwrap_err();
  assert!(matches!(
    err,
    ComposerError::Markup(MarkupError::EmptyLinkTarget)
  ));
  assert_eq!(composer.surface().text(), "read the docs");
  assert!(composer.pending_prompt().is_some());

  composer.confirm_link("https://example.com").unwrap();
  assert_eq!(
    composer.surface().text(),
    "read the [docs](https://example.com)"
  );
  assert!(composer.pending_prompt().is_none());
  assert!(matches!(
    composer.confirm_link("x"),
    Err(ComposerError::NoPendingPrompt(_))
  ));
}

#[test]
fn code_language_prompt() {
  let mut composer = Composer::new(BufferSurface::new(""), Vec::new(), Placeholders::default());
  let result = composer.apply_toggle(Toggle::Code).unwrap();
  assert!(matches!(
    result,
    ToggleResult::Prompt(Prompt::CodeLanguage { .. })
  ));

  composer.confirm_code_language("rust").unwrap();
  assert_eq!(composer.surface().text(), "~~~rust\ncode text\n~~~");

  composer.apply_toggle(Toggle::Code).unwrap();
  assert_eq!(composer.surface().text(), "code text");
  assert!(composer.cancel_prompt().is_none());
}
