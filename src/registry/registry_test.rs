#![cfg(test)]

use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::registry::{self, FieldDef};

fn def(id: &str, label: &str, category: &str) -> FieldDef {
    FieldDef {
        id: id.into(),
        label: label.into(),
        category: category.into(),
    }
}

#[test]
fn missing_file_falls_back_to_stock_fields() {
    let dir = tempfile::tempdir().unwrap();
    let defs = registry::load(&dir.path().join("fields.json")).unwrap();
    assert_eq!(defs, registry::default_fields());
    assert_eq!(defs[0], def("summary", "Summary", "standard"));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    let defs = vec![def("summary", "Summary", "standard"), def("u_env", "Environment", "custom")];
    registry::save(&path, &defs).unwrap();
    assert_eq!(registry::load(&path).unwrap(), defs);
}

#[test]
fn save_dedupes_by_id_and_the_later_definition_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    registry::save(&path, &[
        def("summary", "Summary", "standard"),
        def("summary", "Short Summary", "custom"),
        def("priority", "Priority", "standard"),
    ])
    .unwrap();
    assert_eq!(registry::load(&path).unwrap(), vec![
        def("summary", "Short Summary", "custom"),
        def("priority", "Priority", "standard"),
    ]);
}

#[test]
fn load_drops_entries_missing_id_or_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    let json = indoc! {r#"
        [
            {"id": "summary", "label": "Summary"},
            {"label": "No id here"},
            {"id": "no_label"},
            {"id": "priority", "label": "Priority", "category": "standard"}
        ]
    "#};
    std::fs::write(&path, json).unwrap();

    assert_eq!(registry::load(&path).unwrap(), vec![
        def("summary", "Summary", "custom"),
        def("priority", "Priority", "standard"),
    ]);
}

#[test]
fn scraped_import_cleans_labels_and_ignores_extra_keys() {
    let json = indoc! {r#"
        [
            {
                "id": "change_request.short_description",
                "label": "Short Description Required",
                "fieldType": "text",
                "required": true,
                "options": []
            },
            {"id": "risk", "label": "Risk Mandatory", "fieldType": "select"},
            {"id": "u_env", "label": ""},
            {"label": "no id, dropped"}
        ]
    "#};
    let defs = registry::parse_scraped(json).unwrap();
    assert_eq!(defs, vec![
        def("change_request.short_description", "Short Description", "imported"),
        def("risk", "Risk", "imported"),
        def("u_env", "u_env", "imported"),
    ]);
}

#[test]
fn merge_reports_added_and_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    registry::save(&path, &[def("summary", "Summary", "standard")]).unwrap();

    let (added, replaced) = registry::merge(&path, vec![
        def("summary", "Short Description", "imported"),
        def("risk", "Risk", "imported"),
    ])
    .unwrap();
    assert_eq!((added, replaced), (1, 1));
    assert_eq!(registry::load(&path).unwrap(), vec![
        def("summary", "Short Description", "imported"),
        def("risk", "Risk", "imported"),
    ]);
}

#[test]
fn label_cleaning() {
    assert_eq!(registry::clean_label("Short Description Required"), "Short Description");
    assert_eq!(registry::clean_label("Risk Mandatory"), "Risk");
    assert_eq!(registry::clean_label("Summary Required."), "Summary");
    assert_eq!(registry::clean_label("Status Mandatory!"), "Status");
    assert_eq!(registry::clean_label("Priority  Required  "), "Priority");
    assert_eq!(registry::clean_label("Assignee"), "Assignee");
    // A label that *is* the marker word has nothing to strip.
    assert_eq!(registry::clean_label("Required"), "Required");
}
