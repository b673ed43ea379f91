mod cli;
mod logging;

use std::{
  io::Read,
  path::Path,
  sync::Arc,
  time::Duration,
};

use clap::Parser;
use eyre::{
  Result,
  WrapErr,
  eyre,
};
use serde::Serialize;
use the_default::{
  Composer,
  HttpUserDirectory,
  ToggleResult,
  UserDirectory,
  default_providers,
};
use the_lib::{
  input::Key,
  markup::{
    Placeholders,
    Prompt,
  },
  selection::Selection,
  surface::{
    BufferSurface,
    TextSurface,
  },
};
use the_loader::config::{
  Config,
  load_config,
};

use crate::cli::{
  Cli,
  Command,
  SuggestArgs,
  ToggleArgs,
};

#[derive(Debug, Serialize)]
struct ToggleOutput {
  text:      String,
  selection: Selection,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  logging::setup_logging(cli.verbosity, cli.log_file.as_deref())?;
  let config = load_config(cli.config_file.as_deref())?;

  match cli.command {
    Command::Toggle(args) => {
      let text = read_input(args.file.as_deref())?;
      let output = toggle_text(&text, &args, &config.placeholders)?;
      if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
      } else {
        print!("{}", output.text);
      }
    },
    Command::Suggest(args) => {
      for line in suggest(&args, &config).await? {
        println!("{line}");
      }
    },
  }
  Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
  match file {
    Some(path) => {
      std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
    },
    None => {
      let mut text = String::new();
      std::io::stdin()
        .read_to_string(&mut text)
        .wrap_err("failed to read stdin")?;
      Ok(text)
    },
  }
}

fn toggle_text(text: &str, args: &ToggleArgs, placeholders: &Placeholders) -> Result<ToggleOutput> {
  let surface = match &args.select {
    Some(range) => BufferSurface::with_selection(text, Selection::from(range.clone()))?,
    None => BufferSurface::new(text),
  };
  let mut composer = Composer::new(surface, Vec::new(), placeholders.clone());

  match composer.apply_toggle(args.op)? {
    ToggleResult::Applied => {},
    ToggleResult::Prompt(Prompt::LinkTarget { .. }) => {
      let target = args
        .target
        .as_deref()
        .ok_or_else(|| eyre!("the link toggle needs --target"))?;
      composer.confirm_link(target)?;
    },
    ToggleResult::Prompt(Prompt::CodeLanguage { .. }) => {
      composer.confirm_code_language(args.language.as_deref().unwrap_or_default())?;
    },
  }

  let surface = composer.surface();
  Ok(ToggleOutput {
    text:      surface.text(),
    selection: surface.selection(),
  })
}

async fn suggest(args: &SuggestArgs, config: &Config) -> Result<Vec<String>> {
  let directory = match &config.mention.endpoint {
    Some(endpoint) => {
      let directory: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(endpoint)?);
      Some(directory)
    },
    None => None,
  };
  let providers = default_providers(config, directory)?;

  let caret = args.caret.unwrap_or_else(|| args.text.chars().count());
  let surface = BufferSurface::with_selection(&args.text, Selection::point(caret))
    .wrap_err("caret is outside the text")?;
  let mut composer = Composer::new(surface, providers, config.placeholders.clone());
  composer.key_up(Key::Other)?;

  let deadline = tokio::time::Instant::now() + Duration::from_millis(args.wait_ms);
  while composer.engine().is_waiting() {
    match tokio::time::timeout_at(deadline, composer.wait_for_suggestions()).await {
      Ok(result) => result?,
      Err(_) => {
        log::warn!("gave up waiting for suggestions after {}ms", args.wait_ms);
        break;
      },
    }
  }

  Ok(
    composer
      .menu()
      .items
      .into_iter()
      .map(|item| format!("{}\t{}", item.detail.unwrap_or_default(), item.label))
      .collect(),
  )
}

#[cfg(test)]
mod test {
  use the_lib::markup::Toggle;

  use super::*;

  fn args(op: Toggle) -> ToggleArgs {
    ToggleArgs {
      op,
      select: None,
      target: None,
      language: None,
      json: false,
      file: None,
    }
  }

  #[test]
  fn toggles_with_selection() {
    let mut args = args(Toggle::UnorderedList);
    args.select = Some(0..5);
    let output = toggle_text("a\nb\nc", &args, &Placeholders::default()).unwrap();
    assert_eq!(output.text, "- a\n- b\n- c");
  }

  #[test]
  fn link_needs_a_target() {
    let mut args = args(Toggle::Link);
    args.select = Some(0..4);
    assert!(toggle_text("docs", &args, &Placeholders::default()).is_err());

    args.target = Some("https://example.com".to_string());
    let output = toggle_text("docs", &args, &Placeholders::default()).unwrap();
    assert_eq!(output.text, "[docs](https://example.com)");
    assert_eq!(output.selection, Selection::point(27));
  }

  #[test]
  fn selection_must_fit() {
    let mut args = args(Toggle::Bold);
    args.select = Some(2..40);
    assert!(toggle_text("short", &args, &Placeholders::default()).is_err());
  }

  #[tokio::test]
  async fn lists_symbol_suggestions() {
    let args = SuggestArgs {
      caret:   None,
      wait_ms: 10,
      text:    "a ->".to_string(),
    };
    let lines = suggest(&args, &Config::default()).await.unwrap();
    assert_eq!(lines, vec!["symbols\t→ ->".to_string()]);
  }
}
