//! CLI entry point for ponpon-journal.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ponpon_app::{AppConfig, HabitService, StorageConfig};
use ponpon_core::{Category, DateKey, MonthCursor, SystemClock};
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

/// Habit-tracking journal for daily journaling, weekly reviews and monthly belief extraction.
#[derive(Parser, Debug)]
#[command(
    name = "ponpon",
    version,
    about = "ponpon: track daily journaling, weekly reviews and monthly belief extraction"
)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the state file location from the config.
    #[arg(long)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show today's dashboard.
    Status,

    /// Mark or unmark an activity as completed.
    Toggle {
        /// daily, weekly or monthly.
        category: Category,
        /// Date to toggle (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<DateKey>,
    },

    /// Show a month calendar.
    Calendar {
        /// Month to show (YYYY-MM); defaults to the current month.
        #[arg(long)]
        month: Option<MonthCursor>,
        /// Print the projection as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show what was completed on a single day.
    Day {
        /// Date to inspect (YYYY-MM-DD).
        date: DateKey,
    },

    /// Show streak and counters.
    Stats {
        /// Print the stats as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the stored record as JSON.
    Show,

    /// Track extracted beliefs.
    Belief {
        #[command(subcommand)]
        action: BeliefAction,
    },

    /// Track emotional sessions.
    Emotional {
        #[command(subcommand)]
        action: DoneAction,
    },

    /// First-run onboarding.
    Onboarding {
        #[command(subcommand)]
        action: DoneAction,
    },
}

#[derive(Subcommand, Debug)]
enum BeliefAction {
    /// Add extracted beliefs to the counter.
    Add {
        #[arg(default_value_t = 1)]
        count: u64,
    },
}

#[derive(Subcommand, Debug)]
enum DoneAction {
    /// Mark as done.
    Done,
}

fn main() -> Result<()> {
    let Cli { config, state, cmd } = Cli::parse();
    install_tracing();

    let mut app_config = AppConfig::load(config.as_deref())?;
    if let Some(state) = state {
        app_config.storage = StorageConfig::with_state_file(state);
    }

    let mut service = HabitService::open_configured(&app_config, SystemClock)?;
    let stdout = io::stdout();
    commands::run(
        cmd.unwrap_or(Command::Status),
        &mut service,
        app_config.calendar,
        &mut stdout.lock(),
    )
}

fn install_tracing() {
    // RUST_LOG overrides; default is WARN so command output stays readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
