//! Unplug Control - CLI harness for the progression engine.
//!
//! Drives a local profile the same way the mobile shell does: record
//! sessions, inspect stats and achievements, work with goals. Useful for
//! development and for poking at a profile without the app.

mod display;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use unplug_core::{FileStore, ProgressionEngine};

#[derive(Parser)]
#[command(name = "unplugctl")]
#[command(about = "Unplug - progression engine control", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory holding the profile (defaults to ~/.unplug)
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP, streak, and weekly stats
    Stats,

    /// List achievements with unlock state and progress
    Achievements,

    /// Record a completed offline session
    Session {
        /// Session length in minutes
        minutes: u64,

        /// Hour of day the session started (0-23, defaults to now)
        #[arg(long)]
        hour: Option<u32>,
    },

    /// List session goals
    Goals,

    /// Record a completion attempt against a goal
    CompleteGoal {
        /// Goal id (from `goals`)
        id: uuid::Uuid,

        /// Attempt duration in minutes
        minutes: u64,
    },

    /// Attach a note to today's sessions
    Note {
        /// Note text
        text: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let dir = cli.data_dir.unwrap_or_else(FileStore::default_dir);
    let mut engine = ProgressionEngine::new(Box::new(FileStore::new(dir)));

    match cli.command {
        Commands::Stats => {
            display::print_stats(&engine);
        }
        Commands::Achievements => {
            display::print_achievements(&engine);
        }
        Commands::Session { minutes, hour } => {
            let start = hour.and_then(|h| {
                let today = Utc::now().date_naive();
                today
                    .and_hms_opt(h, 0, 0)
                    .map(|ndt| Utc.from_utc_datetime(&ndt))
            });
            engine.record_session(minutes, start);
            display::print_events(engine.drain_events());
            display::print_today(&engine);
        }
        Commands::Goals => {
            display::print_goals(&engine);
        }
        Commands::CompleteGoal { id, minutes } => {
            let achieved = engine.complete_session_goal(id, minutes);
            if achieved {
                display::print_events(engine.drain_events());
            } else {
                println!("Not achieved (unknown goal or session too short).");
            }
        }
        Commands::Note { text } => {
            let id = engine.add_session_note(&text);
            println!("Noted ({id}).");
        }
    }

    Ok(())
}
