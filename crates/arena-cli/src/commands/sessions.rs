//! Sessions command - List debates in a session store
//!
//! Usage:
//! ```bash
//! arena sessions --store ./debates
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color};

use arena_persist::{FileBackend, SessionStore};

use super::new_table;
use crate::print_info;

/// Arguments for the sessions command
#[derive(Args)]
pub struct SessionsArgs {
    /// Session store directory
    #[arg(long, env = "ARENA_STORE_DIR")]
    pub store: PathBuf,
}

/// Run the sessions command
pub async fn run(args: SessionsArgs) -> Result<()> {
    let store = SessionStore::new(Arc::new(FileBackend::new(&args.store)));
    if !store.is_healthy().await {
        bail!("Session store {} is not a usable directory", args.store.display());
    }
    let sessions = store
        .load_all()
        .await
        .with_context(|| format!("Failed to read session store {}", args.store.display()))?;

    if sessions.is_empty() {
        print_info(&format!("No saved debates in {}", args.store.display()));
        return Ok(());
    }

    println!("{}", "🗂 Saved Debates".bold().cyan());
    println!();

    let mut table = new_table(&["Id", "Created", "Topic", "Turns", "Phase", "Status"]);
    for session in &sessions {
        let status_color = if session.is_failed() { Color::Red } else { Color::Green };
        table.add_row(vec![
            Cell::new(session.id).fg(Color::Green),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(session.topic().unwrap_or("-")),
            Cell::new(session.turn_count()),
            Cell::new(session.phase().title()),
            Cell::new(format!("{:?}", session.status())).fg(status_color),
        ]);
    }
    println!("{table}");
    println!();
    println!("Replay one with {}", "arena show <id> --store <dir>".green());

    Ok(())
}
