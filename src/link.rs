//! Deep-link assembly for the supported trackers.
//!
//! Building a link is plain string work: no validation, no IO, no failure
//! modes. The CLI layer is responsible for handing us a sane base URL and
//! routing ids.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::markup;


/// Which tracker a link points at. The bare selector used by CLI flags and
/// stored presets; routing details live in [`Tracker`].
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Jira,
    ServiceNow,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "jira" => Ok(Target::Jira),
            "servicenow" | "snow" => Ok(Target::ServiceNow),
            other => Err(format!("Unknown target: {other} (expected jira or servicenow)")),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Jira => write!(f, "jira"),
            Target::ServiceNow => write!(f, "servicenow"),
        }
    }
}

/// Routing for one tracker target.
///
/// Jira routes by numeric ids in query parameters. ServiceNow routes by
/// table name as a path segment; its "issue type" concept *is* the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tracker {
    Jira {
        project_id: String,
        issue_type_id: String,
    },
    ServiceNow {
        table_name: String,
    },
}

/// One (field, value) pair captured from user input.
///
/// `value` may be a raw HTML fragment; conversion to tracker markup happens
/// at link-build time, never earlier.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Build the create-issue URL for `tracker`, populated from `fields`.
///
/// Fields with an empty value are skipped entirely, no empty parameter is
/// emitted. Decoding any emitted parameter reproduces the formatted value
/// exactly.
pub fn build_link(base_url: &str, tracker: &Tracker, fields: &[FieldValue]) -> String {
    match tracker {
        Tracker::Jira { project_id, issue_type_id } => {
            jira_link(base_url, project_id, issue_type_id, fields)
        }
        Tracker::ServiceNow { table_name } => servicenow_link(base_url, table_name, fields),
    }
}

fn jira_link(base_url: &str, project_id: &str, issue_type_id: &str, fields: &[FieldValue]) -> String {
    let mut url = format!(
        "{base_url}/secure/CreateIssueDetails!init.jspa?pid={}&issuetype={}",
        encode_component(project_id),
        encode_component(issue_type_id),
    );

    for field in fields {
        if field.value.is_empty() {
            continue;
        }
        let formatted = markup::normalize_lines(&markup::to_jira_markup(&field.value));
        debug!("jira field {}: {formatted:?}", field.name);
        url.push('&');
        url.push_str(&encode_component(&field.name));
        url.push('=');
        url.push_str(&encode_component(&formatted));
    }

    url
}

fn servicenow_link(base_url: &str, table_name: &str, fields: &[FieldValue]) -> String {
    let mut clauses: Vec<String> = vec![];
    for field in fields {
        // No markup conversion here: sysparm_query has no rich-text dialect.
        let value = strip_encoded_eq_prefix(&field.value);
        if value.is_empty() {
            continue;
        }
        clauses.push(format!("{}={value}", bare_field_name(&field.name)));
    }
    debug!("servicenow query clauses: {clauses:?}");

    let mut url = format!("{base_url}/{table_name}.do?sys_id=-1");
    if !clauses.is_empty() {
        url.push_str("&sysparm_query=");
        // Encoded as one parameter, so the ^ and = inside each clause get
        // percent-encoded along with everything else.
        url.push_str(&encode_component(&clauses.join("^")));
    }
    url
}

/// ServiceNow's sysparm_query wants bare field names. Scraped identifiers
/// arrive as "table.field", and the form silently ignores the qualified
/// form, so take whatever follows the last dot.
pub fn bare_field_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, bare)) => bare,
        None => name,
    }
}

/// Users paste sys_ids that still carry a percent-encoded `=`: the literal
/// characters `3D` followed by the 32-hex-char id. Drop the prefix,
/// otherwise the query double-encodes and the field arrives corrupted.
pub fn strip_encoded_eq_prefix(value: &str) -> &str {
    static ENCODED_EQ_SYS_ID: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^3D[0-9a-fA-F]{32}$").expect("regex")
    });

    if ENCODED_EQ_SYS_ID.is_match(value) {
        &value[2..]
    } else {
        value
    }
}

/// Everything outside the RFC 3986 unreserved set gets percent-encoded.
/// Stricter than browsers' encodeURIComponent (which leaves `*` and friends
/// bare); both trackers accept either and the strict form round-trips
/// cleanly.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
