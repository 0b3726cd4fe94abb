//! Terminal UI helpers for the task list.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::ai::PrioritizedTask;
use crate::entities::{PriorityBadge, Task};

/// Get colored badge string
pub fn badge_colored(badge: PriorityBadge, priority: u32) -> String {
    let label = format!("Priority {priority}");
    match badge {
        PriorityBadge::Urgent => label.red().bold().to_string(),
        PriorityBadge::High => label.yellow().to_string(),
        PriorityBadge::Normal => label.dimmed().to_string(),
    }
}

fn badge_color(badge: PriorityBadge) -> Color {
    match badge {
        PriorityBadge::Urgent => Color::Red,
        PriorityBadge::High => Color::Yellow,
        PriorityBadge::Normal => Color::DarkGrey,
    }
}

/// Table of tasks; priority is only shown for active ones
pub fn task_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Created").fg(Color::Cyan),
    ]);

    for task in tasks {
        let priority = match (task.badge(), task.priority) {
            (Some(badge), Some(priority)) => Cell::new(priority).fg(badge_color(badge)),
            _ => Cell::new("-"),
        };
        let title = if task.completed {
            Cell::new(&task.title).fg(Color::DarkGrey)
        } else {
            Cell::new(&task.title)
        };

        table.add_row(vec![
            Cell::new(short_id(&task.id)),
            title,
            priority,
            Cell::new(task.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    table
}

/// Table of a prioritization proposal, in the order the model returned it
pub fn proposal_table(records: &[PrioritizedTask]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Reason").fg(Color::Cyan),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.priority)
                .fg(badge_color(PriorityBadge::from_priority(record.priority))),
            Cell::new(&record.title),
            Cell::new(&record.reason),
        ]);
    }

    table
}

/// First eight characters of an id, enough to type back
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Display task details in a formatted way
pub fn display_task_details(task: &Task) {
    println!("{}", "═".repeat(60).dimmed());
    let state = if task.completed { "completed" } else { "active" };
    println!(
        "{} {} {}",
        "Task".cyan().bold(),
        task.id.cyan().bold(),
        format!("[{state}]").yellow()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!();

    println!("{}: {}", "Title".bold(), task.title);
    if let (Some(badge), Some(priority)) = (task.badge(), task.priority) {
        println!("{}: {}", "Priority".bold(), badge_colored(badge, priority));
    }
    if let Some(reason) = &task.reason {
        println!("{}: {}", "Reason".bold(), reason);
    }
    println!("{}: {}", "Created".bold(), task.created_at.to_rfc3339());
    println!("{}: {}", "Updated".bold(), task.updated_at.to_rfc3339());

    if let Some(description) = &task.description {
        println!();
        println!("{}", "Description".bold().underline());
        println!("{description}");
    }

    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}
