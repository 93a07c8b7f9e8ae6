//! `scheduler` command-line front end.
//!
//! # Responsibility
//! - Resolve database/log locations and bootstrap logging.
//! - Open the SQLite-backed record store once and hand it to commands.
//! - Map every core operation onto a subcommand.

mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppPaths;
use scheduler_core::db::open_db;
use scheduler_core::{EventType, Priority, RecordStore, SqliteMedium, Theme};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scheduler", version)]
#[command(about = "Calendar events, to-do tasks and reminders in one local store")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SCHEDULER_DB")]
    db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "SCHEDULER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "SCHEDULER_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage calendar events
    #[command(subcommand)]
    Event(EventCommand),
    /// Manage to-do tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Write all collections as one JSON document
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Overwrite collections from an exported JSON document
    Import { path: PathBuf },
    /// Reset events, tasks and settings
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Event and task counters
    Stats,
    /// Poll for reminders every minute until Ctrl-C
    Watch {
        /// Fire each reminder once, even if its exact minute was missed
        #[arg(long)]
        fire_once: bool,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    Add {
        title: String,
        /// YYYY-MM-DD
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// HH:MM
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long = "type", default_value = "meeting")]
        kind: EventType,
        /// Minutes before the event (defaults to the settings value)
        #[arg(short, long)]
        reminder: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        #[arg(long, value_enum, default_value_t = EventView::Upcoming)]
        view: EventView,
    },
    Show { id: String },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long = "type")]
        kind: Option<EventType>,
        #[arg(short, long)]
        reminder: Option<u32>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    Complete { id: String },
    Delete { id: String },
    /// Events on one day (today when omitted)
    On { date: Option<NaiveDate> },
    /// Events in one calendar month
    Month {
        year: i32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EventView {
    All,
    Upcoming,
    Attended,
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        title: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "all")]
        priority: String,
        /// all|pending|completed
        #[arg(long, default_value = "all")]
        status: String,
    },
    Show { id: String },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Flip completion
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        theme: Option<Theme>,
        /// Reminder minutes applied to new events
        #[arg(long)]
        default_reminder: Option<u32>,
        #[arg(long)]
        notifications: Option<bool>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.db, cli.log_dir)?;
    paths.init_logging(cli.log_level.as_deref())?;

    let conn = open_db(&paths.db)
        .with_context(|| format!("failed to open database `{}`", paths.db.display()))?;
    let store = RecordStore::open(SqliteMedium::try_new(&conn)?)?;

    match cli.command {
        Commands::Event(command) => commands::event::run(&store, command),
        Commands::Task(command) => commands::task::run(&store, command),
        Commands::Settings(command) => commands::settings::run(&store, command),
        Commands::Export { output } => commands::data::export(&store, output.as_deref()),
        Commands::Import { path } => commands::data::import(&store, &path),
        Commands::Clear { yes } => commands::data::clear(&store, yes),
        Commands::Stats => commands::data::stats(&store),
        Commands::Watch { fire_once } => commands::watch::run(&store, fire_once),
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    scheduler_core::parse_clock_time(value)
        .ok_or_else(|| format!("invalid time `{value}`; expected HH:MM"))
}
