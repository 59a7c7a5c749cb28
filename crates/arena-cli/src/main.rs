//! Arena CLI - AI persona debates in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Run a debate against the live models (needs NEBIUS_API_KEY)
//! arena debate --topic "Should public transit be free?" --turns 6
//!
//! # Run offline with canned replies and save the result
//! arena debate --topic "Should college be free?" --mock --save college.json
//!
//! # Replay a saved debate with its analysis
//! arena show college.json
//!
//! # List built-in personas, saved sessions, configuration
//! arena personas
//! arena sessions --store ./debates
//! arena info --check
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{debate, info, personas, sessions, show};

/// Arena - AI persona debates
///
/// Two language-model personas with opposing political stances argue a
/// topic turn by turn while the debate moves through five phases.
#[derive(Parser)]
#[command(
    name = "arena",
    version,
    about = "Arena CLI - AI persona debates",
    long_about = "Arena runs a structured debate between AI personas.\n\n\
                  Personas speak in strict round-robin order and the debate\n\
                  advances from opening to reflection as turns accumulate."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate on a topic
    #[command(name = "debate")]
    Debate(debate::DebateArgs),

    /// List the built-in personas
    #[command(name = "personas")]
    Personas(personas::PersonasArgs),

    /// Show a saved debate and its analysis
    #[command(name = "show")]
    Show(show::ShowArgs),

    /// List debates saved in a session store
    #[command(name = "sessions")]
    Sessions(sessions::SessionsArgs),

    /// Show version and configuration
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Debate(args) => debate::run(args).await,
        Commands::Personas(args) => personas::run(args),
        Commands::Show(args) => show::run(args).await,
        Commands::Sessions(args) => sessions::run(args).await,
        Commands::Info(args) => info::run(args).await,
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
