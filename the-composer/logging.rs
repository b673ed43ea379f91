use std::path::Path;

use eyre::{
  Result,
  WrapErr,
};
use log::LevelFilter;

pub fn level_for(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Route `log` records (and `tracing` events through its `log` feature) to
/// stderr or `log_file`.
pub fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
  let dispatch = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} [{}] {}",
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level_for(verbosity));

  let dispatch = match log_file {
    Some(path) => {
      let file = fern::log_file(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
      dispatch.chain(file)
    },
    None => dispatch.chain(std::io::stderr()),
  };

  dispatch.apply().wrap_err("failed to install logger")
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn verbosity_levels() {
    assert_eq!(level_for(0), LevelFilter::Warn);
    assert_eq!(level_for(1), LevelFilter::Info);
    assert_eq!(level_for(2), LevelFilter::Debug);
    assert_eq!(level_for(9), LevelFilter::Trace);
  }
}
