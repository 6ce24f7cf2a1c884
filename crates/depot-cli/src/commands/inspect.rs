//! Read-only commands: exists, stat and ls

use colored::Colorize;
use depot_core::{FileStore, StoredFile};

use super::Outcome;
use crate::error::Result;

/// Print `true` or `false`; absent files exit with [`Outcome::Absent`].
pub fn run_exists(store: &FileStore, id: &str) -> Result<Outcome> {
    let present = store.exists(id)?;
    println!("{present}");
    Ok(if present { Outcome::Done } else { Outcome::Absent })
}

pub fn run_stat(store: &FileStore, id: &str, json: bool) -> Result<Outcome> {
    let file = store.stat(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        println!("{:<10} {}", "id".bold(), file.id);
        println!(
            "{:<10} {}",
            "extension".bold(),
            file.extension.as_deref().unwrap_or("-")
        );
        println!("{:<10} {}", "size".bold(), format_size(file.size_bytes));
    }
    Ok(Outcome::Done)
}

pub fn run_ls(store: &FileStore, json: bool) -> Result<Outcome> {
    let files = store.list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(Outcome::Done);
    }

    if files.is_empty() {
        println!("{}", "No files stored.".dimmed());
        return Ok(Outcome::Done);
    }
    for file in &files {
        print_entry(file);
    }
    println!();
    println!("{} file(s), {}", files.len(), format_size(files.iter().map(|f| f.size_bytes).sum()));
    Ok(Outcome::Done)
}

fn print_entry(file: &StoredFile) {
    println!("  {:<40} {:>12}", file.file_name(), format_size(file.size_bytes));
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
