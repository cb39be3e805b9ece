use std::{fmt::Display, path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use futures::StreamExt;
use now::DateTimeNow;

use crate::{
    daemon::{config::DEFAULT_UNIT_SECONDS, storage::counter_storage::JsonCounterStorage},
    utils::{
        dir::data_file_path,
        time::{date_from_key, date_to_key},
    },
};

use super::{
    output::{daily_usage, format_minutes, intensity_bar},
    Args,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(
        long = "start",
        short,
        help = "First day of the report. Examples are \"yesterday\", \"2025-03-15\", \"15/03/2025\". Defaults to the start of the current month"
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "Last day of the report. Examples are \"yesterday\", \"2025-03-15\", \"15/03/2025\". Defaults to today"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long = "skip-empty", help = "Don't print days without learning time")]
    skip_empty: bool,
    #[arg(
        long = "unit-seconds",
        default_value_t = DEFAULT_UNIT_SECONDS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Seconds of learning time represented by one unit"
    )]
    unit_seconds: u64,
    #[arg(
        long,
        help = "Application directory. By default the directory containing the executable"
    )]
    pub(super) dir: Option<PathBuf>,
}

const BAR_WIDTH: usize = 20;

/// Command to process `report` command. Report prints learning time of every day from `start_date`
/// to `end_date`.
pub async fn process_report_command(
    ReportCommand {
        start_date,
        end_date,
        date_style,
        skip_empty,
        unit_seconds,
        dir: _,
    }: ReportCommand,
    application_dir: &std::path::Path,
) -> Result<()> {
    let (start, end) = parse_range(start_date, end_date, date_style, Local::now())?;
    let unit = Duration::from_secs(unit_seconds);

    let counts = JsonCounterStorage::new(data_file_path(application_dir))
        .read()
        .await?;

    let usage = daily_usage(&counts, start, end, unit).collect::<Vec<_>>().await;
    let max = usage.iter().map(|v| v.count).max().unwrap_or(0);

    for day in usage.iter().filter(|v| !skip_empty || v.count > 0) {
        println!(
            "{}\t{}\t{}\t{}",
            date_to_key(day.date),
            day.count,
            format_minutes(day.minutes),
            intensity_bar(day.count, max, BAR_WIDTH)
        );
    }

    let total_count = usage.iter().map(|v| v.count).fold(0u64, u64::saturating_add);
    let total_minutes = usage.iter().map(|v| v.minutes).fold(0u64, u64::saturating_add);
    println!("Total\t{}\t{}", total_count, format_minutes(total_minutes));
    Ok(())
}

fn parse_day(value: &str, now: DateTime<Local>, date_style: DateStyle) -> Result<NaiveDate> {
    if let Ok(date) = date_from_key(value) {
        return Ok(date);
    }
    parse_date_string(value, now, date_style.into())
        .map(|v| v.date_naive())
        .map_err(|e| anyhow!("Can't parse {value}: {e}"))
}

/// Also provides sensible defaults for `report` command.
fn parse_range(
    start_date: Option<String>,
    end_date: Option<String>,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<(NaiveDate, NaiveDate)> {
    let start = match start_date.map(|s| parse_day(&s, now, date_style)) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate start date {e}"),
                )
                .into());
        }
        None => now.beginning_of_month().date_naive(),
    };
    let end = match end_date.map(|s| parse_day(&s, now, date_style)) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate end date {e}"),
                )
                .into());
        }
        None => now.date_naive(),
    };
    if start > end {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!(
                    "Start {} is after end {}",
                    date_to_key(start),
                    date_to_key(end)
                ),
            )
            .into());
    }
    Ok((start, end))
}
