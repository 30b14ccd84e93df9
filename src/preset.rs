//! Saved configuration presets.
//!
//! A preset captures a complete link-generation setup (target, base URL,
//! routing ids, field values) under a name, stored as a JSON array on disk.
//! Field names are camelCase in the file so exports from the original web
//! tool import cleanly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::link::{FieldValue, Target, Tracker};
use crate::store::{self, Error, Result};


#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub target: Target,
    pub base_url: String,

    // Routing ids. Which ones apply depends on the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldValue>,
}

impl Preset {
    /// Resolve the routing enum for this preset's target.
    pub fn tracker(&self) -> Result<Tracker> {
        match self.target {
            Target::Jira => Ok(Tracker::Jira {
                project_id: self
                    .project_id
                    .clone()
                    .ok_or(Error::MissingRoutingId("projectId"))?,
                issue_type_id: self
                    .issue_type_id
                    .clone()
                    .ok_or(Error::MissingRoutingId("issueTypeId"))?,
            }),
            Target::ServiceNow => Ok(Tracker::ServiceNow {
                table_name: self
                    .table_name
                    .clone()
                    .ok_or(Error::MissingRoutingId("tableName"))?,
            }),
        }
    }
}

/// Load every preset. A missing file is an empty list.
pub fn load_all(path: &Path) -> Result<Vec<Preset>> {
    Ok(store::load_json(path)?.unwrap_or_default())
}

/// Save a preset, replacing any existing one with the same id.
pub fn upsert(path: &Path, preset: Preset) -> Result {
    if preset.id.is_empty() || preset.name.is_empty() {
        return Err(Error::InvalidPreset("a preset needs an id and a name".into()));
    }
    let mut presets = load_all(path)?;
    if let Some(existing) = presets.iter_mut().find(|it| it.id == preset.id) {
        *existing = preset;
    } else {
        presets.push(preset);
    }
    store::save_json(path, &presets)
}

/// Delete by id. Returns whether anything was removed.
pub fn delete(path: &Path, id: &str) -> Result<bool> {
    let mut presets = load_all(path)?;
    let before = presets.len();
    presets.retain(|it| it.id != id);
    let removed = presets.len() != before;
    if removed {
        store::save_json(path, &presets)?;
    }
    Ok(removed)
}

/// Look a preset up by id first, then by name.
pub fn find(path: &Path, key: &str) -> Result<Preset> {
    let presets = load_all(path)?;
    presets
        .iter()
        .find(|it| it.id == key)
        .or_else(|| presets.iter().find(|it| it.name == key))
        .cloned()
        .ok_or_else(|| Error::UnknownPreset(key.into()))
}
