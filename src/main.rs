//! Binary entry point: parse flags, set up logging, run the program.

use anyhow::{bail, Context, Result};
use bubbletea_rs::Program;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use datedown::app::{App, Options, OPTIONS};
use std::fs::File;

#[derive(Debug, Parser)]
#[command(author, version, about = "A terminal countdown to a chosen date and time")]
struct Cli {
    /// Pre-select a target, e.g. "2026-12-31 23:59" or "2026-12-31 23:59:30".
    /// Must be in the future.
    #[arg(short, long, value_parser = parse_future_target)]
    target: Option<DateTime<Local>>,

    /// Pre-fill the note label shown next to the countdown.
    #[arg(short, long)]
    note: Option<String>,
}

/// Parses a local date/time and rejects instants that are not in the
/// future; the picker enforces the same constraint interactively.
fn parse_future_target(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        })
        .map_err(|_| format!("invalid date/time {s:?}, expected \"YYYY-MM-DD HH:MM[:SS]\""))?;

    let target = naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| format!("{s:?} does not exist in the local time zone"))?;

    if target <= Local::now() {
        return Err(format!("target {s:?} is not in the future"));
    }
    Ok(target)
}

/// Sends log output to a file when `RUST_LOG` is set; the terminal itself
/// belongs to the alternate screen.
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = File::create("datedown.log").context("creating datedown.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    if OPTIONS
        .set(Options {
            target: cli.target,
            note: cli.note,
        })
        .is_err()
    {
        bail!("startup options already set");
    }

    let program = Program::<App>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .context("setting up the terminal")?;
    program.run().await.context("running the program")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_future_formats() {
        assert!(parse_future_target("2099-12-31 23:59:30").is_ok());
        assert!(parse_future_target("2099-12-31 23:59").is_ok());
        assert!(parse_future_target("2099-12-31").is_ok());
    }

    #[test]
    fn test_parse_rejects_past_and_garbage() {
        assert!(parse_future_target("2001-01-01 00:00").is_err());
        assert!(parse_future_target("tomorrow").is_err());
        assert!(parse_future_target("2099-13-01 00:00").is_err());
    }
}
