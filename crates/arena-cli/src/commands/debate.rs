//! Debate command - Run a debate between the built-in personas
//!
//! Usage:
//! ```bash
//! arena debate --topic "Should public transit be free?" --turns 6
//! arena debate --topic "Should college be free?" --mock --seed 7 --save college.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use arena_core::{GenerationParams, PersonaRegistry};
use arena_debate::{DebateEngine, DebateSession, EngineConfig};
use arena_llm::{LlmConfig, LlmProvider, MockProvider, OpenAiCompatibleProvider};
use arena_persist::{export_session, FileBackend, SessionStore};

use super::{print_analysis, print_message, print_phase_banner};
use crate::{print_error, print_info, print_success, print_warning};

/// Arguments for the debate command
#[derive(Args)]
pub struct DebateArgs {
    /// Topic the personas will debate
    #[arg(short, long)]
    pub topic: String,

    /// Number of successful turns to generate
    #[arg(short = 'n', long, default_value_t = 6)]
    pub turns: usize,

    /// Seed for personality dynamics (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use canned replies instead of calling the API
    #[arg(long)]
    pub mock: bool,

    /// Consecutive failures before the session is abandoned
    #[arg(long, default_value_t = 3)]
    pub max_errors: u32,

    /// Override the completion token limit
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Override the sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Write the finished session to this JSON file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Also save into a session store directory
    #[arg(long, env = "ARENA_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// Print the personas' system prompts before the debate
    #[arg(long)]
    pub show_system: bool,
}

/// Run the debate command
pub async fn run(args: DebateArgs) -> Result<()> {
    let config = LlmConfig::from_env().context("Invalid environment configuration")?;
    let (provider, mut params) = build_provider(args.mock, &config)?;
    if let Some(max_tokens) = args.max_tokens {
        params = params.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = args.temperature {
        params = params.with_temperature(temperature);
    }

    let engine = DebateEngine::new(
        provider,
        EngineConfig {
            max_errors: args.max_errors,
            params,
        },
    );

    let store = match &args.store {
        Some(dir) => {
            let store = SessionStore::new(Arc::new(FileBackend::new(dir)));
            if !store.is_healthy().await {
                bail!("Session store {} is not a writable directory", dir.display());
            }
            Some(store)
        }
        None => None,
    };

    let registry = PersonaRegistry::builtin();
    let mut session = match args.seed {
        Some(seed) => DebateSession::with_seed(registry, seed),
        None => DebateSession::from_entropy(registry),
    };
    session
        .add_user_message(&args.topic)
        .context("Cannot start the debate")?;

    println!("{}", "⚔ Arena Debate".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!("{} {}", "Session:".dimmed(), session.id);
    println!("{} {}", "Provider:".dimmed(), engine.provider().name());
    println!();

    for message in session.transcript() {
        print_message(message, args.show_system);
    }
    print_phase_banner(session.phase());

    let mut generated = 0;
    while generated < args.turns {
        let phase_before = session.phase();
        match engine.generate_turn(&mut session).await {
            Ok(message) => {
                generated += 1;
                print_message(&message, false);
                if session.phase() != phase_before {
                    print_phase_banner(session.phase());
                }
            }
            Err(e) if session.is_failed() => {
                print_error(&e.to_string());
                break;
            }
            Err(e) => {
                print_warning(&format!("{} (retrying)", e));
            }
        }
    }

    print_analysis(&session.analysis(), session.registry());

    if let Some(path) = &args.save {
        export_session(path, &session)
            .await
            .with_context(|| format!("Failed to save session to {}", path.display()))?;
        print_success(&format!("Saved to {}", path.display()));
    }

    if let (Some(store), Some(dir)) = (&store, &args.store) {
        store
            .save(&session)
            .await
            .with_context(|| format!("Failed to save session in {}", dir.display()))?;
        print_success(&format!("Stored as {} in {}", session.id, dir.display()));
    }

    if session.is_failed() {
        bail!(
            "Debate stopped after {} consecutive errors; {} of {} turns completed",
            session.consecutive_errors(),
            generated,
            args.turns
        );
    }

    Ok(())
}

/// The provider to debate against, with params from `config`
fn build_provider(mock: bool, config: &LlmConfig) -> Result<(Arc<dyn LlmProvider>, GenerationParams)> {
    if mock {
        print_info("Using canned replies (--mock); no API calls will be made");
        return Ok((Arc::new(MockProvider::debate()), config.params));
    }

    let provider = OpenAiCompatibleProvider::from_config(config)
        .context("Set NEBIUS_API_KEY (or ARENA_API_KEY), or pass --mock to run offline")?;

    tracing::info!(endpoint = provider.endpoint(), "Using chat-completions endpoint");
    Ok((Arc::new(provider), config.params))
}
