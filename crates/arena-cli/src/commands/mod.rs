//! Subcommands and the terminal rendering they share

pub mod debate;
pub mod info;
pub mod personas;
pub mod sessions;
pub mod show;

use arena_core::{DebatePhase, Message, PersonaRegistry, Role, Stance};
use arena_debate::DebateAnalysis;
use colored::{ColoredString, Colorize};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

/// Color a label by the stance it belongs to
pub fn stance_colored(label: &str, stance: Option<Stance>) -> ColoredString {
    match stance {
        Some(Stance::Left) => label.blue().bold(),
        Some(Stance::Right) => label.red().bold(),
        _ => label.yellow().bold(),
    }
}

fn stance_cell_color(stance: Stance) -> Color {
    match stance {
        Stance::Left => Color::Blue,
        Stance::Right => Color::Red,
        Stance::Neutral => Color::Yellow,
    }
}

/// A fresh table in the house style
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn print_phase_banner(phase: DebatePhase) {
    println!();
    println!("{}", format!("── {} ──", phase.title()).bold().cyan());
    println!();
}

/// Print one transcript entry; system prompts only when asked for
pub fn print_message(message: &Message, show_system: bool) {
    match message.role {
        Role::System => {
            if show_system {
                let who = message.meta("persona_id").unwrap_or("system");
                println!("{} {}", format!("[system:{}]", who).dimmed(), message.content.dimmed());
                println!();
            }
        }
        Role::User => {
            println!("{} {}", "Moderator:".green().bold(), message.content);
            println!();
        }
        Role::Assistant => {
            let name = message.meta("persona_name").unwrap_or(&message.speaker_model);
            let turn = message.meta("turn").unwrap_or("?");
            println!(
                "{} {}",
                stance_colored(&format!("{}:", name), message.stance),
                format!("(turn {}, {})", turn, message.speaker_model).dimmed()
            );
            println!("{}", message.content);
            if message.meta("empty_completion").is_some() {
                println!("{}", "(model returned no content)".yellow());
            }
            println!();
        }
    }
}

/// Per-persona analysis table plus the stance key points
pub fn print_analysis(analysis: &DebateAnalysis, registry: &PersonaRegistry) {
    println!("{}", "Debate Analysis".bold().cyan());
    println!(
        "  {} {}   {} {}   {} {}",
        "Phase:".dimmed(),
        analysis.phase.title().green(),
        "Turns:".dimmed(),
        analysis.turn_count,
        "Messages:".dimmed(),
        analysis.message_count
    );
    println!();

    let mut table = new_table(&[
        "Persona",
        "Messages",
        "Effectiveness",
        "Emotion (avg)",
        "Emotion (last 3)",
        "Markers",
    ]);
    for persona in registry.list_personas() {
        let id = &persona.id;
        let trajectory = analysis
            .emotional_trajectory
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let average = if trajectory.is_empty() {
            0.0
        } else {
            trajectory.iter().sum::<f64>() / trajectory.len() as f64
        };
        let recent: Vec<String> = analysis
            .recent_trajectory(id, 3)
            .iter()
            .map(|s| format!("{:.2}", s))
            .collect();
        let effectiveness = analysis.argument_effectiveness.get(id).copied().unwrap_or(0.0);
        let markers = analysis
            .intensity_markers
            .get(id)
            .filter(|m| !m.is_empty())
            .map(|m| m.join(", "))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&persona.name).fg(stance_cell_color(persona.stance)),
            Cell::new(trajectory.len()),
            Cell::new(format!("{:.3}", effectiveness)),
            Cell::new(format!("{:.2}", average)),
            Cell::new(recent.join(" → ")),
            Cell::new(markers),
        ]);
    }
    println!("{table}");

    for (stance, points) in &analysis.stance_summary {
        if points.is_empty() {
            continue;
        }
        println!();
        let parsed = stance.parse::<Stance>().ok();
        println!("{}", stance_colored(&format!("Key points ({})", stance), parsed));
        for point in points {
            println!("  {} {}", "•".cyan(), point);
        }
    }
    println!();
}
