//! Personas command - List the built-in personas
//!
//! Usage:
//! ```bash
//! arena personas
//! arena personas --prompts
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color};

use arena_core::PersonaRegistry;

use super::{new_table, stance_colored};

/// Arguments for the personas command
#[derive(Args)]
pub struct PersonasArgs {
    /// Also print each persona's debate prompt
    #[arg(long)]
    pub prompts: bool,
}

/// Run the personas command
pub fn run(args: PersonasArgs) -> Result<()> {
    let registry = PersonaRegistry::builtin();

    println!("{}", "🎭 Arena Personas".bold().cyan());
    println!();

    let mut table = new_table(&["Order", "Id", "Name", "Model", "Stance", "Style", "Expertise"]);
    for (order, persona) in registry.list_personas().iter().enumerate() {
        table.add_row(vec![
            Cell::new(order + 1),
            Cell::new(&persona.id).fg(Color::Green),
            Cell::new(&persona.name),
            Cell::new(&persona.model),
            Cell::new(persona.stance.as_str()),
            Cell::new(persona.rhetorical_style.as_str()),
            Cell::new(persona.expertise_areas.join(", ")).fg(Color::Yellow),
        ]);
    }
    println!("{table}");

    if args.prompts {
        for persona in registry.list_personas() {
            println!();
            println!("{}", stance_colored(&persona.name, Some(persona.stance)));
            println!("{}", persona.debate_prompt());
        }
    }

    println!();
    println!(
        "Personas speak in the order above; start a debate with {}",
        "arena debate --topic \"...\"".green()
    );

    Ok(())
}
