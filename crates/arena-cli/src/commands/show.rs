//! Show command - Replay a saved debate with its analysis
//!
//! Usage:
//! ```bash
//! arena show college.json
//! arena show 3f6c0a52-... --store ./debates
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use uuid::Uuid;

use arena_debate::DebateSession;
use arena_persist::{import_session, FileBackend, SessionStore};

use super::{print_analysis, print_message};
use crate::print_warning;

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// A file written by `arena debate --save`, or a session id with --store
    pub target: String,

    /// Session store directory to look the id up in
    #[arg(long, env = "ARENA_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// Include the personas' system prompts
    #[arg(long)]
    pub system: bool,

    /// Print the raw session JSON instead of the formatted transcript
    #[arg(long)]
    pub json: bool,
}

/// Run the show command
pub async fn run(args: ShowArgs) -> Result<()> {
    let session = match &args.store {
        Some(dir) => load_from_store(dir, &args.target).await?,
        None => {
            let path = Path::new(&args.target);
            import_session(path)
                .await
                .with_context(|| format!("Failed to read session from {}", path.display()))?
                .session
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!("{} {}", "📜 Debate".bold().cyan(), session.id);
    println!(
        "  {} {}   {} {}",
        "Created:".dimmed(),
        session.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        "Status:".dimmed(),
        format!("{:?}", session.status()).green()
    );
    if let Some(topic) = session.topic() {
        println!("  {} {}", "Topic:".dimmed(), topic.bold());
    }
    println!();

    for message in session.transcript() {
        print_message(message, args.system);
    }

    if session.is_failed() {
        print_warning("This session ended after repeated provider failures");
        println!();
    }

    print_analysis(&session.analysis(), session.registry());
    Ok(())
}

async fn load_from_store(dir: &Path, target: &str) -> Result<DebateSession> {
    let id = Uuid::parse_str(target).with_context(|| format!("'{}' is not a session id", target))?;
    let store = SessionStore::new(Arc::new(FileBackend::new(dir)));

    store
        .load(id)
        .await
        .with_context(|| format!("Failed to read session store {}", dir.display()))?
        .with_context(|| format!("No session {} in {}", id, dir.display()))
}
