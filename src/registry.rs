//! The field-definition registry.
//!
//! Tracks which tracker fields the tool knows how to offer. A stock set is
//! compiled in, and field metadata scraped from a live tracker form (the
//! bookmarklet handoff format) can be merged in from a JSON export.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::store::{self, Result};

mod registry_test;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "custom".into()
}

/// The stock Jira fields offered before anything has been imported.
pub fn default_fields() -> Vec<FieldDef> {
    [
        ("summary", "Summary"),
        ("description", "Description"),
        ("priority", "Priority"),
        ("assignee", "Assignee"),
        ("labels", "Labels"),
        ("due date", "Due Date"),
        ("component", "Component"),
    ]
    .into_iter()
    .map(|(id, label)| FieldDef {
        id: id.into(),
        label: label.into(),
        category: "standard".into(),
    })
    .collect()
}

/// Load the registry. A missing file means the stock definitions; entries
/// without an id or label are dropped rather than failing the whole load.
pub fn load(path: &Path) -> Result<Vec<FieldDef>> {
    let Some(defs) = store::load_json::<Vec<FieldDef>>(path)? else {
        return Ok(default_fields());
    };
    Ok(defs
        .into_iter()
        .filter(|def| !def.id.is_empty() && !def.label.is_empty())
        .collect())
}

/// Save the registry, deduplicating by id. The later definition wins.
pub fn save(path: &Path, defs: &[FieldDef]) -> Result {
    let mut unique: Vec<FieldDef> = vec![];
    for def in defs {
        if let Some(existing) = unique.iter_mut().find(|it| it.id == def.id) {
            *existing = def.clone();
        } else {
            unique.push(def.clone());
        }
    }
    store::save_json(path, &unique)
}

/// One entry of the bookmarklet handoff format. The in-page scraper writes
/// a JSON array of these for the visible form fields; we only keep what the
/// registry needs and ignore the rest.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScrapedField {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
}

/// Parse a scraped-fields JSON export into registry definitions.
///
/// Entries without an id are dropped. Labels get cleaned of the form's
/// required-marker text; an empty label falls back to the id.
pub fn parse_scraped(json: &str) -> Result<Vec<FieldDef>> {
    let scraped: Vec<ScrapedField> = serde_json::from_str(json)?;
    let defs = scraped
        .into_iter()
        .filter(|it| !it.id.is_empty())
        .map(|it| {
            let raw_label = if it.label.is_empty() { &it.id } else { &it.label };
            FieldDef {
                label: clean_label(raw_label),
                id: it.id,
                category: "imported".into(),
            }
        })
        .collect();
    Ok(defs)
}

/// Merge definitions into the registry at `path`, replacing existing ids.
/// Returns how many were (added, replaced).
pub fn merge(path: &Path, incoming: Vec<FieldDef>) -> Result<(usize, usize)> {
    let mut defs = load(path)?;
    let mut added = 0;
    let mut replaced = 0;
    for def in incoming {
        if let Some(existing) = defs.iter_mut().find(|it| it.id == def.id) {
            *existing = def;
            replaced += 1;
        } else {
            defs.push(def);
            added += 1;
        }
    }
    save(path, &defs)?;
    Ok((added, replaced))
}

/// Scraped labels usually carry the form's "Required"/"Mandatory" marker
/// text. Strip a trailing marker (plus stray punctuation), then any marker
/// word left in the middle.
pub fn clean_label(label: &str) -> String {
    static TRAILING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\s+(Required|Mandatory)[\s.,;:!?]*$").expect("regex")
    });
    static INLINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\s+(Required|Mandatory)\b").expect("regex")
    });

    let label = TRAILING_MARKER.replace_all(label.trim(), "");
    let label = INLINE_MARKER.replace_all(label.trim(), "");
    label.trim().to_string()
}
