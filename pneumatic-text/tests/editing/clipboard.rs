use pneumatic_text::legacy::{
    copy_selection, copy_selection_with, get_selection_extended_for_safari, BrowserQuirks,
    ClipboardOptions, ClipboardPayload, ClipboardSink, ContentBlock, Entity, EntityKind,
    LegacyDocument, LegacyEditorState, LegacySelection,
};
use pneumatic_text::EditorError;

#[derive(Default)]
struct RecordingSink {
    payloads: Vec<ClipboardPayload>,
}

impl ClipboardSink for RecordingSink {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), EditorError> {
        self.payloads.push(payload.clone());
        Ok(())
    }
}

fn comment() -> LegacyDocument {
    LegacyDocument::new(vec![
        ContentBlock::new("k1", "Deadline is due date").with_entity(12, 8, "v"),
    ])
    .with_entity(
        "v",
        Entity::new(EntityKind::Variable)
            .with("apiName", "due_date")
            .with("title", "due date"),
    )
}

#[test]
fn test_safari_caret_copy_includes_trailing_variable() {
    let state = LegacyEditorState::new(comment(), LegacySelection::collapsed("k1", 20));
    let selection = get_selection_extended_for_safari(&state, &BrowserQuirks { safari: true });
    assert_eq!(selection, LegacySelection::range("k1", 0, "k1", 20));

    let mut sink = RecordingSink::default();
    let safari = BrowserQuirks { safari: true };
    let written =
        copy_selection_with(&state, &mut sink, &ClipboardOptions::default(), &safari).unwrap();

    assert_eq!(written.text, "Deadline is due date");
    assert!(written
        .html
        .unwrap()
        .contains(r#"data-variable-api-name="due_date">due date</span>"#));
    assert_eq!(sink.payloads.len(), 1);
}

#[test]
fn test_partial_copy_takes_the_whole_entity() {
    let state = LegacyEditorState::new(comment(), LegacySelection::range("k1", 9, "k1", 15));
    let mut sink = RecordingSink::default();
    let written = copy_selection(
        &state,
        &mut sink,
        &ClipboardOptions {
            write_html: false,
            write_json: true,
        },
    )
    .unwrap();

    assert_eq!(written.text, "is due date");
    assert_eq!(written.html, None);
    let snapshot: LegacyDocument = serde_json::from_str(&written.json.unwrap()).unwrap();
    assert_eq!(snapshot.blocks[0].entity_ranges[0].offset, 3);
    assert_eq!(snapshot.blocks[0].entity_ranges[0].length, 8);
    assert!(snapshot.entity_map.contains_key("v"));
}
