//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use std::env;

use crate::domain::models::Severity;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Result of a command that changes one record.
#[derive(Debug, Serialize)]
pub struct ActionOutput<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
}

impl<T: Serialize> ActionOutput<T> {
    pub fn new(message: impl Into<String>, record: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            record: Some(record),
        }
    }
}

impl ActionOutput<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            record: None,
        }
    }
}

impl<T: Serialize> CommandOutput for ActionOutput<T> {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if
/// truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Create a borderless list table with the given headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| {
            Cell::new(h.to_uppercase())
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Left)
        }));
    table
}

/// Render the table under a count line, or a "none found" message.
pub fn render_list(entity_name: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let noun = if total == 1 {
        entity_name.to_string()
    } else {
        format!("{entity_name}s")
    };
    format!("{total} {noun}:\n{table}")
}

/// Key-value detail block under a title line.
pub fn detail(title: &str, fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut lines = vec![title.to_string()];
    for (key, value) in fields {
        if !value.is_empty() {
            lines.push(format!("  {key:<width$}  {value}"));
        }
    }
    lines.join("\n")
}

pub fn severity_cell(severity: Severity) -> Cell {
    let cell = Cell::new(severity);
    if !supports_color() {
        return cell;
    }
    match severity {
        Severity::Critical => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        Severity::High => cell.fg(Color::Red),
        Severity::Medium => cell.fg(Color::Yellow),
        Severity::Low => cell.fg(Color::DarkGrey),
    }
}

/// Status cell colored by how settled the status is.
pub fn status_cell(status: &str) -> Cell {
    let cell = Cell::new(status);
    if !supports_color() {
        return cell;
    }
    match status {
        "resolved" | "closed" | "completed" | "implemented" | "authorized" => cell.fg(Color::Green),
        "open" | "not_implemented" | "denied" => cell.fg(Color::Red),
        "accepted" | "risk_accepted" | "not_applicable" => cell.fg(Color::DarkGrey),
        _ => cell.fg(Color::Yellow),
    }
}

/// Whether the terminal should receive ANSI colors
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

/// Human-readable optional value.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Multi-factor authentication", 10), "Multi-f...");
        assert_eq!(truncate("Sécurité des données", 8), "Sécur...");
    }

    #[test]
    fn test_render_list_pluralizes() {
        let table = list_table(&["id"]);
        assert_eq!(render_list("risk", &table, 0), "No risks found.");
        assert!(render_list("risk", &table, 1).starts_with("1 risk:"));
        assert!(render_list("risk", &table, 3).starts_with("3 risks:"));
    }

    #[test]
    fn test_detail_skips_empty_values() {
        let text = detail(
            "Risk 4",
            &[("Title", "Phishing".to_string()), ("Owner", String::new())],
        );
        assert!(text.contains("Title  Phishing"));
        assert!(!text.contains("Owner"));
    }
}
