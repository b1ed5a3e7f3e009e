//! Plain-text rendering of the panel and id lookup for commands.

use std::fmt::Write;

use anyhow::{anyhow, bail, Result};
use todo_core::{Summary, TodoView, ViewKey};

/// Number of id characters shown per row. Commands accept any unique prefix.
const SHORT_ID: usize = 8;

/// One line per entry, then the summary footer and the last error, if any.
pub fn render(entries: &[TodoView], summary: Summary, last_error: Option<&str>) -> String {
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("  (no todos)\n");
    }
    for entry in entries {
        let check = if entry.is_checked() { "[x]" } else { "[ ]" };
        let id = entry
            .id()
            .map(|id| id.chars().take(SHORT_ID).collect::<String>())
            .unwrap_or_else(|| "-".repeat(SHORT_ID));
        let _ = write!(out, "{id}  {check} {}", entry.label());
        if entry.is_checked() {
            out.push_str("  Done");
        }
        if entry.is_deleting() {
            out.push_str("  (deleting…)");
        } else if entry.is_saving() {
            out.push_str("  (saving…)");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{summary}");
    if let Some(err) = last_error {
        let _ = writeln!(out, "! {err}");
    }
    out
}

/// Find the entry whose server id equals `id` or is the only one starting with it.
pub fn resolve(entries: &[TodoView], id: &str) -> Result<ViewKey> {
    if id.is_empty() {
        bail!("empty todo id");
    }
    if let Some(entry) = entries.iter().find(|entry| entry.id() == Some(id)) {
        return Ok(entry.key());
    }
    let mut matches = entries
        .iter()
        .filter(|entry| entry.id().is_some_and(|candidate| candidate.starts_with(id)));
    let first = matches.next().ok_or_else(|| anyhow!("no todo with id '{id}'"))?;
    if matches.next().is_some() {
        bail!("id prefix '{id}' matches more than one todo");
    }
    Ok(first.key())
}
