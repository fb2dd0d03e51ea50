use notiq_core::{Category, KnownCategory, Note, NoteQuery, SortBy, SortOrder};
use uuid::Uuid;

#[test]
fn note_serialization_uses_client_field_names() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let note = Note {
        id,
        title: Some("Trip".to_string()),
        content: "Pack bags".to_string(),
        category: Category::from(KnownCategory::Personal),
        date_added: 1_700_000_000_000,
        date_edited: Some(1_700_000_360_000),
    };

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Trip");
    assert_eq!(json["content"], "Pack bags");
    assert_eq!(json["category"], "Personal");
    assert_eq!(json["dateAdded"], 1_700_000_000_000_i64);
    assert_eq!(json["dateEdited"], 1_700_000_360_000_i64);

    let decoded: Note = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn absent_optional_fields_are_omitted_and_defaulted() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "content": "meeting",
        "category": "work",
        "dateAdded": 5
    });

    let note: Note = serde_json::from_value(value).unwrap();
    assert_eq!(note.title, None);
    assert_eq!(note.date_edited, None);
    assert!(!note.has_title());
    assert_eq!(note.last_touched_ms(), 5);

    let json = serde_json::to_value(&note).unwrap();
    assert!(json.get("title").is_none());
    assert!(json.get("dateEdited").is_none());
}

#[test]
fn query_wire_values_parse_and_serialize() {
    assert_eq!(SortBy::parse("dateEdited"), Some(SortBy::DateEdited));
    assert_eq!(SortBy::parse("date_added"), Some(SortBy::DateAdded));
    assert_eq!(SortBy::parse("title"), None);
    assert_eq!(SortOrder::parse("Ascending"), Some(SortOrder::Asc));

    let query: NoteQuery = serde_json::from_str(
        r#"{"sortBy": "dateEdited", "sortOrder": "asc", "search": "pack", "category": "Personal"}"#,
    )
    .unwrap();
    assert_eq!(query.sort_by, SortBy::DateEdited);
    assert_eq!(query.sort_order, SortOrder::Asc);
    assert_eq!(query.category, Some(Category::new("Personal")));

    let json = serde_json::to_value(NoteQuery::default()).unwrap();
    assert_eq!(json["sortBy"], "dateAdded");
    assert_eq!(json["sortOrder"], "desc");
}

#[test]
fn unknown_categories_are_accepted() {
    let category = Category::new("Groceries");
    assert_eq!(category.known(), None);
    assert_eq!(category.key(), "groceries");
    assert_eq!(KnownCategory::parse(" Study "), Some(KnownCategory::Study));
}
