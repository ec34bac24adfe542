//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Standardized formatting for all notesync output: errors, successes,
//! status summaries and colored diff rendering.
//!
//! # Design Principles
//! - **Consistent color scheme**: red for errors and removals, green for
//!   successes and additions, bright_black for metadata
//! - **Standardized spacing**: newline before and after command output

use crate::core::diff::{DiffHunk, DiffLineKind};
use crate::core::history::NoteHistoryEntry;
use crate::core::status::RepoStatus;
use colored::*;

/// Formats and prints an error message with consistent styling
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Render a status snapshot as a short summary block.
pub fn print_status(status: &RepoStatus) {
    println!();
    println!(
        "{} {} {}",
        "provider:".bright_black(),
        status.provider.to_string().white(),
        format!("[{}]", status.branch).blue()
    );

    let mut parts: Vec<String> = Vec::new();
    if status.ahead > 0 {
        parts.push(format!("+{}", status.ahead));
    }
    if status.behind > 0 {
        parts.push(format!("-{}", status.behind));
    }
    if status.has_uncommitted {
        parts.push("uncommitted changes".to_string());
    }
    if status.pending_push_count > 0 {
        parts.push(format!("{} pending push", status.pending_push_count));
    }
    if status.needs_pull {
        parts.push("pull needed".to_string());
    }

    if parts.is_empty() {
        println!("{}", "up to date".green());
    } else {
        println!("{}", parts.join(", ").yellow());
    }
    println!();
}

/// Render history entries, newest first, one line each.
pub fn print_history(entries: &[NoteHistoryEntry]) {
    println!();
    for entry in entries {
        let short_hash: String = entry.hash.chars().take(8).collect();
        println!(
            "{} {} {} {}",
            short_hash.yellow(),
            entry.date.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            entry.author.blue(),
            entry.message.white()
        );
    }
    println!();
}

/// Render parsed hunks the way `git diff` colors them.
pub fn print_hunks(hunks: &[DiffHunk]) {
    println!();
    for hunk in hunks {
        println!(
            "{}",
            format!(
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines
            )
            .cyan()
        );
        for line in &hunk.lines {
            match line.kind {
                DiffLineKind::Add => println!("{}", format!("+{}", line.content).green()),
                DiffLineKind::Remove => println!("{}", format!("-{}", line.content).red()),
                DiffLineKind::Context => println!(" {}", line.content),
            }
        }
    }
    println!();
}
