//! INI configuration parsing
//!
//! Sections are adaptor records; a reserved `[default]` section supplies
//! key defaults folded into every other section. The `alias` key carries a
//! newline-separated list and supports the heredoc form
//! `alias=<<TAG ... TAG` for multi-line values.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::Result;

/// Decode INI text into the normalized `{adaptors, aliases}` document.
///
/// An empty document, or one holding only `[default]`, decodes to an empty
/// registry. Sections missing `species` or `group` are skipped with a
/// warning.
pub fn parse_ini(text: &str) -> Result<Value> {
    let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();
    let mut defaults: Vec<(String, String)> = Vec::new();

    let lines: Vec<&str> = text.lines().collect();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index].trim();
        index += 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push((name.trim().to_string(), Vec::new()));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warn!(line, "unparseable configuration line, ignored");
            continue;
        };
        let key = key.trim().to_string();
        let mut value = value.trim().to_string();

        // Heredoc: collect raw lines until the terminator tag.
        if let Some(tag) = value.strip_prefix("<<") {
            let tag = tag.trim();
            let mut body = Vec::new();
            while index < lines.len() && lines[index].trim() != tag {
                body.push(lines[index]);
                index += 1;
            }
            if index < lines.len() {
                index += 1; // consume the terminator
            } else {
                warn!(%key, tag, "unterminated heredoc runs to end of file");
            }
            value = body.join("\n");
        }

        match sections.last_mut() {
            Some((_, entries)) => entries.push((key, value)),
            None => warn!(%key, "configuration key outside any section, ignored"),
        }
    }

    // Split off the reserved defaults section.
    sections.retain(|(name, entries)| {
        if name.eq_ignore_ascii_case("default") {
            defaults.extend(entries.clone());
            false
        } else {
            true
        }
    });

    let mut adaptors = Vec::new();
    let mut aliases: Map<String, Value> = Map::new();

    for (name, entries) in sections {
        let mut record: Map<String, Value> = Map::new();
        for (key, value) in &defaults {
            record.insert(key.clone(), Value::String(value.clone()));
        }
        let mut alias_text = None;
        for (key, value) in entries {
            if key == "alias" {
                alias_text = Some(match alias_text {
                    Some(prior) => format!("{prior}\n{value}"),
                    None => value,
                });
            } else {
                record.insert(key, Value::String(value));
            }
        }

        let species = record.get("species").and_then(Value::as_str);
        if species.is_none() || record.get("group").is_none() {
            warn!(section = %name, "section lacks species or group, skipped");
            continue;
        }
        let species = species.map(str::to_string);

        if let (Some(species), Some(alias_text)) = (species, alias_text) {
            let list = aliases
                .entry(species)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(list) = list.as_array_mut() {
                for alias in split_aliases(&alias_text) {
                    if !list.iter().any(|v| v.as_str() == Some(&alias)) {
                        list.push(Value::String(alias));
                    }
                }
            }
        }

        adaptors.push(Value::Object(record));
    }

    Ok(json!({ "adaptors": adaptors, "aliases": aliases }))
}

/// Split an alias value on line endings of either convention
fn split_aliases(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
