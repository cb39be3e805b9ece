pub mod daemon_path;
pub mod output;
pub mod process;
pub mod report;

use std::{env, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use daemon_path::to_daemon_path;
use output::format_minutes;
use process::{kill_previous_servers, restart_server};
use report::{process_report_command, ReportCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{
        args::AccumulationArgs, config::DEFAULT_UNIT_SECONDS,
        storage::counter_storage::JsonCounterStorage, start_daemon,
    },
    utils::{
        clock::{Clock, DefaultClock},
        dir::{data_file_path, resolve_application_path},
        logging::{enable_logging, CLI_PREFIX},
        time::{date_to_key, learning_minutes},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Learntime", version, long_about = None)]
#[command(about = "Tracks daily learning time for a contribution calendar", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts a daemon for the application")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default the directory containing the executable"
        )]
        dir: Option<PathBuf>,
        #[command(flatten)]
        accumulation: AccumulationArgs,
    },
    #[command(
        about = "Run the tracker directly in current console. Useful for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default the directory containing the executable"
        )]
        dir: Option<PathBuf>,
        #[command(flatten)]
        accumulation: AccumulationArgs,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Display learning time tracked today")]
    Today {
        #[arg(
            long,
            help = "Application directory. By default the directory containing the executable"
        )]
        dir: Option<PathBuf>,
        #[arg(
            long = "unit-seconds",
            default_value_t = DEFAULT_UNIT_SECONDS,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Seconds of learning time represented by one unit"
        )]
        unit_seconds: u64,
    },
    #[command(about = "Display learning time for a range of days")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
}

impl Commands {
    fn dir(&self) -> Option<PathBuf> {
        match self {
            Commands::Init { dir, .. } | Commands::Serve { dir, .. } | Commands::Today { dir, .. } => {
                dir.clone()
            }
            Commands::Report { command } => command.dir.clone(),
            Commands::Stop {} => None,
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let application_dir = resolve_application_path(args.commands.dir())?;
    enable_logging(CLI_PREFIX, &application_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Init { accumulation, .. } => {
            // Validate here, a detached daemon can only report problems into its logs.
            accumulation.to_config()?;
            let daemon_path = to_daemon_path(env::current_exe()?);
            restart_server(&daemon_path, &application_dir, accumulation)?;
            Ok(())
        }
        Commands::Stop {} => {
            let daemon_path = to_daemon_path(env::current_exe()?);
            let stopped = kill_previous_servers(&daemon_path)?;
            println!("Stopped {stopped} daemon(s)");
            Ok(())
        }
        Commands::Serve { accumulation, .. } => {
            start_daemon(application_dir, accumulation.to_config()?).await
        }
        Commands::Today { unit_seconds, .. } => {
            print_today(&application_dir, Duration::from_secs(unit_seconds)).await
        }
        Commands::Report { command } => process_report_command(command, &application_dir).await,
    }
}

async fn print_today(application_dir: &std::path::Path, unit: Duration) -> Result<()> {
    let counts = JsonCounterStorage::new(data_file_path(application_dir))
        .read()
        .await?;
    let today = DefaultClock.today();
    let count = counts.get(today);
    println!(
        "{}\t{}\t{}",
        date_to_key(today),
        count,
        format_minutes(learning_minutes(count, unit))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Args, Commands};

    #[test]
    fn test_dir_is_taken_from_any_command() {
        let args = Args::parse_from(["learntime", "report", "--dir", "/tmp/learn", "--skip-empty"]);
        assert_eq!(args.commands.dir(), Some(PathBuf::from("/tmp/learn")));

        let args = Args::parse_from(["learntime", "init", "--dir", "/tmp/learn", "--unit-seconds", "10"]);
        assert_eq!(args.commands.dir(), Some(PathBuf::from("/tmp/learn")));
        assert!(matches!(
            args.commands,
            Commands::Init { accumulation, .. } if accumulation.unit_seconds == 10 && accumulation.tick_seconds == 20
        ));

        let args = Args::parse_from(["learntime", "stop"]);
        assert_eq!(args.commands.dir(), None);
    }

    #[test]
    fn test_zero_unit_is_rejected() {
        assert!(Args::try_parse_from(["learntime", "today", "--unit-seconds", "0"]).is_err());
        assert!(Args::try_parse_from(["learntime", "serve", "--unit-seconds", "0"]).is_err());
    }
}
