use std::{
  ops::Range,
  path::PathBuf,
};

use clap::{
  ArgAction,
  Args,
  Parser,
  Subcommand,
};
use the_lib::markup::Toggle;

#[derive(Parser, Debug)]
#[command(name = "the-composer", about, long_about = None, version)]
pub struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count, global = true)]
  pub verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE", global = true)]
  pub log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
  pub config_file: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Apply a markup toggle to text read from FILE or stdin
  Toggle(ToggleArgs),
  /// List the suggestions offered at the caret
  Suggest(SuggestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ToggleArgs {
  /// bold, italic, strike, header, cite, unordered-list, ordered-list, code or link
  #[arg(value_parser = parse_toggle)]
  pub op: Toggle,

  /// Char range to select, e.g. `4..9`; defaults to a caret at the end
  #[arg(long = "select", value_name = "START..END", value_parser = parse_range)]
  pub select: Option<Range<usize>>,

  /// Link target used when the toggle asks for one
  #[arg(long)]
  pub target: Option<String>,

  /// Code block language used when the toggle asks for one
  #[arg(long)]
  pub language: Option<String>,

  /// Print the text and selection as JSON
  #[arg(long)]
  pub json: bool,

  pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
  /// Caret position in chars; defaults to the end of TEXT
  #[arg(long)]
  pub caret: Option<usize>,

  /// How long to wait for asynchronous providers
  #[arg(long = "wait-ms", value_name = "MS", default_value_t = 1000)]
  pub wait_ms: u64,

  pub text: String,
}

fn parse_toggle(arg: &str) -> Result<Toggle, String> {
  arg.parse().map_err(|err| format!("{err}"))
}

fn parse_range(arg: &str) -> Result<Range<usize>, String> {
  let (start, end) = arg
    .split_once("..")
    .ok_or_else(|| format!("expected START..END, got '{arg}'"))?;
  let parse = |value: &str| {
    value
      .trim()
      .parse::<usize>()
      .map_err(|err| format!("invalid offset '{value}': {err}"))
  };
  Ok(parse(start)?..parse(end)?)
}
