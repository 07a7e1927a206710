mod http;
mod storage;
mod table;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use solvetrack_core::{DirectoryLoad, Tracker};

use http::HttpStatsSource;
use storage::JsonFileStore;

/// Backend serving per-user solved counts.
const DEFAULT_API_URL: &str = "https://leetcode-backend-ge9p.onrender.com";
/// Host of the shared roster files.
const DEFAULT_ROSTER_URL: &str =
    "https://raw.githubusercontent.com/College-Notes/leetcode-data/refs/heads/main";

#[derive(Debug, Parser)]
#[command(name = "solvetrack", version = "0.1.0")]
#[command(about = "Ranked solved-count leaderboard with daily and monthly progress")]
struct Args {
    /// Base URL of the stats backend
    #[arg(long, default_value = DEFAULT_API_URL)]
    api: String,

    /// Base URL of the shared roster files
    #[arg(long, default_value = DEFAULT_ROSTER_URL)]
    roster: String,

    /// Path of the local data file
    #[arg(long, default_value = "solvetrack.json")]
    data: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch everyone's stats and print the ranked board
    Board,
    /// Verify a username on the platform and add it to the board
    AddUser {
        /// Username on the platform
        username: String,

        /// Display name shown on the board (defaults to the username)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the tracked users without fetching any stats
    ListUsers,
}

type CliTracker = Tracker<HttpStatsSource, JsonFileStore>;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let client = HttpStatsSource::new(&args.api, &args.roster, Duration::from_secs(args.timeout))
        .context("failed to build the HTTP client")?;
    let store = JsonFileStore::new(args.data.clone());
    let tracker = Tracker::new(client, store);

    match &args.command {
        Command::Board => run_board(&tracker, args.verbose).await,
        Command::AddUser { username, name } => {
            run_add_user(&tracker, username, name.as_deref()).await
        }
        Command::ListUsers => run_list_users(&tracker).await,
    }
}

fn announce_banner() {
    println!("{}", "🏆 Solvetrack Leaderboard".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn warn_on_degraded_load(load: &DirectoryLoad) {
    if let Some(warning) = &load.warning {
        eprintln!("⚠️  {}", warning.yellow());
    }
}

async fn run_board(tracker: &CliTracker, verbose: bool) -> Result<()> {
    announce_banner();

    let load = tracker.load_directory().await;
    warn_on_degraded_load(&load);
    if load.directory.is_empty() {
        println!(
            "No users tracked yet. Add one with {}.",
            "solvetrack add-user <username>".cyan()
        );
        return Ok(());
    }
    if verbose {
        println!("Refreshing {} users...", load.directory.len());
    }

    let report = tracker.run_cycle(&load.directory, Utc::now()).await;
    print!("{}", table::render_board(&report));
    Ok(())
}

async fn run_add_user(tracker: &CliTracker, username: &str, name: Option<&str>) -> Result<()> {
    let mut load = tracker.load_directory().await;
    warn_on_degraded_load(&load);

    match tracker.add_user(&mut load.directory, username, name).await {
        Ok(()) => {
            println!(
                "✅ Added {} to the board",
                load.directory.display_name(username).green()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

async fn run_list_users(tracker: &CliTracker) -> Result<()> {
    let load = tracker.load_directory().await;
    warn_on_degraded_load(&load);

    let entries = load.directory.entries();
    if entries.is_empty() {
        println!("No users tracked yet.");
        return Ok(());
    }
    print!("{}", table::render_directory(&entries));
    Ok(())
}
