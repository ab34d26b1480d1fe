//! Command-line front-end for the scheduler core.
//!
//! # Responsibility
//! - Run the standalone next-date computation from the shell.
//! - List stored tasks from the same database the server uses.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scheduler_core::db::open_db;
use scheduler_core::{next_date_text, CalendarDate, SqliteTaskRepository, TaskService};
use std::path::PathBuf;

const DB_FILE_ENV: &str = "SCHEDULER_DB_FILE";
const DEFAULT_DB_FILE: &str = "scheduler.db";

#[derive(Debug, Parser)]
#[command(name = "scheduler_cli", version, about = "Recurring task scheduler tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the next occurrence strictly after `now`.
    NextDate {
        /// Reference date (YYYYMMDD); defaults to today.
        #[arg(long)]
        now: Option<String>,
        /// Anchor date (YYYYMMDD).
        #[arg(long)]
        date: String,
        /// Rule text: `y`, `d <N>` or `w <d1,d2,...>`.
        #[arg(long, default_value = "")]
        repeat: String,
    },
    /// List stored tasks by ascending date.
    Tasks {
        #[arg(long)]
        limit: Option<u32>,
        /// Database file; falls back to $SCHEDULER_DB_FILE, then ./scheduler.db.
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print the core crate version.
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    for line in run(cli.command)? {
        println!("{line}");
    }
    Ok(())
}

fn run(command: Command) -> anyhow::Result<Vec<String>> {
    match command {
        Command::NextDate { now, date, repeat } => {
            let now = now.unwrap_or_else(|| CalendarDate::today().to_string());
            let next = next_date_text(&now, &date, &repeat)?;
            Ok(vec![next])
        }
        Command::Tasks { limit, db } => {
            let path = db.unwrap_or_else(resolve_db_path);
            let conn = open_db(&path)
                .with_context(|| format!("failed to open database `{}`", path.display()))?;
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            let lines = service
                .list_tasks(limit)?
                .into_iter()
                .map(|task| {
                    format!(
                        "{}\t{}\t{}\t{}",
                        task.id, task.date, task.repeat, task.title
                    )
                })
                .collect();
            Ok(lines)
        }
        Command::Version => Ok(vec![format!(
            "scheduler_core version={}",
            scheduler_core::core_version()
        )]),
    }
}

fn resolve_db_path() -> PathBuf {
    std::env::var(DB_FILE_ENV)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command};
    use clap::Parser;
    use scheduler_core::db::open_db;
    use scheduler_core::{CalendarDate, SqliteTaskRepository, TaskDraft, TaskService};

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).expect("args should parse").command
    }

    #[test]
    fn next_date_prints_computed_date() {
        let command = parse(&[
            "scheduler_cli",
            "next-date",
            "--now",
            "20240301",
            "--date",
            "20240101",
            "--repeat",
            "d 7",
        ]);
        assert_eq!(run(command).unwrap(), vec!["20240304".to_string()]);
    }

    #[test]
    fn next_date_surfaces_rule_errors() {
        let command = parse(&[
            "scheduler_cli",
            "next-date",
            "--now",
            "20240301",
            "--date",
            "20240101",
            "--repeat",
            "d 500",
        ]);
        let err = run(command).unwrap_err();
        assert!(err.to_string().contains("d 500"));
    }

    #[test]
    fn next_date_requires_anchor() {
        assert!(Cli::try_parse_from(["scheduler_cli", "next-date", "--repeat", "y"]).is_err());
    }

    #[test]
    fn tasks_lists_rows_from_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.db");
        {
            let conn = open_db(&path).unwrap();
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            let today = CalendarDate::parse("20240301").unwrap();
            let draft = TaskDraft {
                date: "20240310".to_string(),
                title: "water plants".to_string(),
                comment: String::new(),
                repeat: "y".to_string(),
            };
            service.create_task(today, &draft).unwrap();
        }

        let path_arg = path.to_str().unwrap();
        let lines = run(parse(&["scheduler_cli", "tasks", "--db", path_arg])).unwrap();
        assert_eq!(lines, vec!["1\t20240310\ty\twater plants".to_string()]);
    }

    #[test]
    fn version_reports_core_version() {
        let lines = run(parse(&["scheduler_cli", "version"])).unwrap();
        assert!(lines[0].starts_with("scheduler_core version="));
    }
}
