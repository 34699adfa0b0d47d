//! Console rendering helpers for CLI surfaces.
//!
//! Status lines carry a colored glyph; key/value rows are aligned so record
//! dumps stay readable in an 80-column terminal.

use colored::Colorize;
use std::io::{self, BufRead, Write};

pub fn success(message: &str) {
    println!("{} {}", "✓".bright_green(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".bright_cyan(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".bright_yellow(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".bright_red(), message.red());
}

pub fn section(title: &str) {
    let rule = "=".repeat(60);
    println!();
    println!("{}", rule.bright_black());
    println!("  {}", title.to_uppercase().bold());
    println!("{}", rule.bright_black());
}

pub fn key_value(key: &str, value: impl std::fmt::Display) {
    println!("  {:<20} {}", format!("{}:", key), value);
}

/// Print `message` without a newline and read one trimmed line from stdin.
pub fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

pub fn read_line(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `y` / `yes`, any case. Anything else, including an empty answer, is no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn format_ugnot(amount: i64) -> String {
    format!("{} ugnot", amount)
}

pub fn truncate(input: &str, max_chars: usize) -> String {
    let count = input.chars().count();
    if count <= max_chars {
        return input.to_string();
    }
    if max_chars <= 3 {
        return input.chars().take(max_chars).collect();
    }
    let head: String = input.chars().take(max_chars - 3).collect();
    format!("{}...", head)
}

/// Collapse whitespace and greedily wrap at `width` columns.
pub fn wrap_text(input: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in input.split_whitespace() {
        if !line.is_empty() && line.chars().count() + word.chars().count() + 1 > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
