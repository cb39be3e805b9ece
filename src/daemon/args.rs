use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};
use tracing::level_filters::LevelFilter;

use super::config::{AccumulatorConfig, DEFAULT_TICK_SECONDS, DEFAULT_UNIT_SECONDS};

#[derive(Parser)]
pub struct DaemonArgs {
  #[arg(long)]
  pub force: bool,
  #[arg(long)]
  pub dir: Option<PathBuf>,
  /// This option is for debugging purposes only.
  #[arg(long = "log-console")]
  pub log_console : bool,
  #[arg(long = "log-filter")]
  pub log: Option<LevelFilter>,
  #[command(flatten)]
  pub accumulation: AccumulationArgs,
}

/// Options shared by the daemon binary and `init`/`serve` commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct AccumulationArgs {
  #[arg(long = "unit-seconds", default_value_t = DEFAULT_UNIT_SECONDS, value_parser = clap::value_parser!(u64).range(1..), help = "Seconds of learning time represented by one unit")]
  pub unit_seconds: u64,
  #[arg(long = "tick-seconds", default_value_t = DEFAULT_TICK_SECONDS, value_parser = clap::value_parser!(u64).range(1..), help = "How often learning time is saved")]
  pub tick_seconds: u64,
}

impl AccumulationArgs {
  pub fn to_config(self) -> Result<AccumulatorConfig> {
    AccumulatorConfig::from_seconds(self.unit_seconds, self.tick_seconds)
  }

  /// Arguments reproducing these options on a daemon command line.
  pub fn to_command_args(self) -> Vec<String> {
    vec![
      "--unit-seconds".into(),
      self.unit_seconds.to_string(),
      "--tick-seconds".into(),
      self.tick_seconds.to_string(),
    ]
  }
}
