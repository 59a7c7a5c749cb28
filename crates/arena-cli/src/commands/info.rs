//! Info command - Show version and configuration
//!
//! Usage:
//! ```bash
//! arena info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;

use arena_core::{DebatePhase, PersonaRegistry};
use arena_debate::EngineConfig;
use arena_llm::{LlmConfig, LlmProvider, OpenAiCompatibleProvider};

use super::new_table;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Check that the configured endpoint is reachable
    #[arg(long)]
    pub check: bool,
}

/// Run the info command
pub async fn run(args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!("{}", "Arena - AI Persona Debates".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Configuration:".bold());
    match LlmConfig::from_env() {
        Ok(config) => {
            let key_status = if config.is_configured() {
                format!("{} set", "✓".green())
            } else {
                format!("{} missing (set NEBIUS_API_KEY or use --mock)", "✗".red())
            };
            println!("  {} {}", "API key:".dimmed(), key_status);
            println!("  {} {}", "Endpoint:".dimmed(), config.api_base);
            println!("  {} {}s", "Timeout:".dimmed(), config.timeout_secs);
            println!("  {} {}", "Max tokens:".dimmed(), config.params.max_tokens);
            println!("  {} {}", "Temperature:".dimmed(), config.params.temperature);
            println!("  {} {}", "Top p:".dimmed(), config.params.top_p);
            if args.check {
                check_endpoint(&config).await;
            }
        }
        Err(e) => println!("  {} {}", "✗".red(), e),
    }
    println!(
        "  {} {}",
        "Max consecutive errors:".dimmed(),
        EngineConfig::default().max_errors
    );
    println!();

    println!("{}", "Personas:".bold());
    for persona in PersonaRegistry::builtin().list_personas() {
        println!("  {} {} ({})", "•".cyan(), persona.name.green(), persona.model);
    }
    println!();

    println!("{}", "Phases:".bold());
    let mut table = new_table(&["Phase", "Leaves after assistant messages"]);
    for phase in DebatePhase::ALL {
        let threshold = phase
            .exit_threshold()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "terminal".to_string());
        table.add_row(vec![Cell::new(phase.title()), Cell::new(threshold)]);
    }
    println!("{table}");
    println!();

    Ok(())
}

async fn check_endpoint(config: &LlmConfig) {
    let label = "Reachable:".dimmed();
    match OpenAiCompatibleProvider::from_config(config) {
        Ok(provider) if provider.is_available().await => println!("  {} {}", label, "✓".green()),
        Ok(_) => println!("  {} {} no answer from the models endpoint", label, "✗".red()),
        Err(e) => println!("  {} {} {}", label, "✗".red(), e),
    }
}
