//! Conversion from rich-text HTML fragments to Jira wiki markup.
//!
//! Rich-text edit regions emit a small, messy subset of HTML: inline tags
//! only, one `<div>` per visual line, and browser-dependent spellings of the
//! same intent (`<b>` vs `<strong>`, `<i>` vs `<em>`). Rather than parse a
//! DOM we run a fixed sequence of regex passes over the fragment, which is
//! lossy in exactly the ways we want.

use std::sync::LazyLock;

use regex::{Captures, Regex};


/// Convert an HTML fragment to Jira wiki markup.
///
/// Pure text-to-text. The passes run in a fixed order: list items first
/// (their contents get recursively converted before the bullet prefix goes
/// on), then the simple wrap tags, then line/block breaks, and finally a
/// catch-all pass that deletes any tag we don't recognize while keeping its
/// inner text.
///
/// Tag matches are case-insensitive and ignore attributes. Non-greedy tag
/// bodies don't cross newlines. Recursion depth is bounded by the nesting
/// depth of the input, since each recursive call sees a strictly smaller
/// string.
pub fn to_jira_markup(html: &str) -> String {
    static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<li[^>]*>(.*?)</li>").expect("regex")
    });
    static LIST_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</?(?:ul|ol)[^>]*>").expect("regex")
    });
    static BOLD: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<(?:b|strong)[^>]*>(.*?)</(?:b|strong)>").expect("regex")
    });
    static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<(?:i|em)[^>]*>(.*?)</(?:i|em)>").expect("regex")
    });
    static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<u[^>]*>(.*?)</u>").expect("regex")
    });
    static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<br\s*/?>").expect("regex")
    });
    static DIV_OPEN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<div[^>]*>").expect("regex")
    });
    static DIV_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</div>").expect("regex")
    });
    static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<[^>]+>").expect("regex")
    });

    let text = LIST_ITEM.replace_all(html, |caps: &Captures<'_>| {
        let item = to_jira_markup(&caps[1]);
        format!("* {}\n", item.trim())
    });
    let text = LIST_WRAPPER.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "*${1}*");
    let text = ITALIC.replace_all(&text, "_${1}_");
    let text = UNDERLINE.replace_all(&text, "+${1}+");
    let text = LINE_BREAK.replace_all(&text, "\n");
    // Divs act as block separators on entry: editors emit one <div> per
    // visual line, so the opening tag becomes the newline and the closing
    // tag just disappears.
    let text = DIV_OPEN.replace_all(&text, "\n");
    let text = DIV_CLOSE.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    text.into_owned()
}

/// Clean up the converter's output for use as a single field value.
///
/// Collapses runs of blank lines, trims each surviving line, and drops the
/// empty ones. Kept separate from [`to_jira_markup`] so that stays a pure
/// syntax transform. Idempotent.
pub fn normalize_lines(text: &str) -> String {
    static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\n{2,}").expect("regex")
    });

    let collapsed = BLANK_RUNS.replace_all(text, "\n");
    collapsed
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
