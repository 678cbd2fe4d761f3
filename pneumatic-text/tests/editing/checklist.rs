use pneumatic_text::document::{
    Block, ChecklistContainer, ChecklistItem, Document, Fragment, Inline, Point, Selection,
    SequentialIdGenerator,
};
use pneumatic_text::editor::{EditorCommand, Key};
use pneumatic_text::{DecodeOptions, RichEditor};
use std::cell::RefCell;
use std::rc::Rc;

fn editor(markdown: &str) -> RichEditor {
    RichEditor::open(markdown, &DecodeOptions::default())
        .with_id_generator(SequentialIdGenerator::new())
}

fn type_text(editor: &mut RichEditor, text: &str) {
    assert!(editor.handle_key(Key::Text(text.to_string())));
}

#[test]
fn test_build_a_checklist_from_scratch() {
    let saved = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&saved);
    let mut editor = editor("Groceries").on_change(move |markdown| {
        *sink.borrow_mut() = markdown.to_string();
    });

    editor.handle_key(Key::Enter);
    type_text(&mut editor, "milk");
    assert!(editor.dispatch(EditorCommand::InsertChecklist));
    // Converting puts the caret at the start of the item.
    assert_eq!(
        editor.state().selection,
        Some(Selection::collapsed(Point::in_item(1, 0, 0)))
    );
    editor.select(Some(Selection::collapsed(Point::in_item(1, 0, 4))));
    editor.handle_key(Key::Enter);
    type_text(&mut editor, "eggs");
    // The second Enter lands on an empty last item and leaves the list.
    editor.handle_key(Key::Enter);
    editor.handle_key(Key::Enter);
    type_text(&mut editor, "Done.");

    assert_eq!(
        *saved.borrow(),
        "Groceries\n\n\
         [clist:list-1|item-1]milk[/clist]\n\
         [clist:list-1|item-2]eggs[/clist]\n\n\
         Done."
    );
    assert_eq!(*saved.borrow(), editor.markdown());
}

#[test]
fn test_enter_in_the_middle_splits_the_item() {
    let mut editor = editor("[clist:L|a]buy milk[/clist]");
    editor.select(Some(Selection::collapsed(Point::in_item(0, 0, 3))));
    editor.handle_key(Key::Enter);

    let container = editor.document().checklists().next().unwrap().clone();
    let texts: Vec<Vec<Inline>> = container
        .items
        .iter()
        .map(|item| item.paragraph.content.clone())
        .collect();
    assert_eq!(
        texts,
        vec![vec![Inline::text("buy")], vec![Inline::text(" milk")]]
    );
    assert!(container.items.iter().all(|item| item.list_api_name == "L"));
    assert_eq!(
        editor.state().selection,
        Some(Selection::collapsed(Point::in_item(0, 1, 0)))
    );
}

#[test]
fn test_enter_on_sole_empty_item_replaces_the_container() {
    let doc = Document::new(vec![Block::Checklist(ChecklistContainer::new(
        "L",
        vec![ChecklistItem::new("L", "a", vec![])],
    ))]);
    let mut editor = RichEditor::from_state(
        pneumatic_text::EditorState::new(doc).with_caret(Point::in_item(0, 0, 0)),
    );

    assert!(editor.handle_key(Key::Enter));
    assert_eq!(editor.document().blocks, vec![Block::empty_paragraph()]);
    assert_eq!(
        editor.state().selection,
        Some(Selection::collapsed(Point::in_block(0, 0)))
    );
}

#[test]
fn test_backspace_removes_sole_empty_item_and_container() {
    let doc = Document::new(vec![
        Block::paragraph(vec![Inline::text("intro")]),
        Block::Checklist(ChecklistContainer::new(
            "L",
            vec![ChecklistItem::new("L", "a", vec![])],
        )),
    ]);
    let mut editor = RichEditor::from_state(
        pneumatic_text::EditorState::new(doc).with_caret(Point::in_item(1, 0, 0)),
    );

    assert!(editor.handle_key(Key::Backspace));
    assert_eq!(
        editor.document().blocks,
        vec![Block::paragraph(vec![Inline::text("intro")])]
    );
    assert!(editor.document().checklists().next().is_none());
    assert_eq!(
        editor.state().selection,
        Some(Selection::collapsed(Point::in_block(0, 5)))
    );
}

#[test]
fn test_backspace_in_text_falls_back_to_default_editing() {
    let mut editor = editor("[clist:L|a]ab[/clist]");
    assert!(editor.handle_key(Key::Backspace));
    assert_eq!(editor.markdown(), "[clist:L|a]a[/clist]");
}

#[test]
fn test_paste_never_merges_into_an_existing_list() {
    let mut editor = editor("[clist:L1|a]x[/clist]\n[clist:L1|b]y[/clist]");
    let fragment = Fragment::from_blocks(vec![Block::Checklist(ChecklistContainer::new(
        "L1",
        vec![ChecklistItem::new("L1", "a", vec![Inline::text("pasted")])],
    ))]);

    assert!(editor.paste(&fragment));
    let containers: Vec<_> = editor.document().checklists().collect();
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].items.len(), 2);

    let pasted = containers[1];
    let before = ["L1", "a", "b"];
    assert!(!before.contains(&pasted.list_api_name.as_str()));
    assert!(!before.contains(&pasted.items[0].item_api_name.as_str()));
    assert_eq!(
        editor.markdown(),
        "[clist:L1|a]x[/clist]\n[clist:L1|b]y[/clist]\n\n[clist:list-1|item-1]pasted[/clist]"
    );
}

#[test]
fn test_plain_paste_is_declined() {
    let mut editor = editor("x");
    let fragment = Fragment::from_blocks(vec![Block::paragraph(vec![Inline::text("y")])]);
    assert!(!editor.paste(&fragment));
    assert_eq!(editor.markdown(), "x");
}

#[test]
fn test_handlers_without_selection_do_nothing() {
    let mut editor = editor("[clist:L|a][/clist]");
    editor.select(None);
    assert!(!editor.handle_key(Key::Enter));
    assert!(!editor.handle_key(Key::Backspace));
    assert!(!editor.dispatch(EditorCommand::InsertChecklist));
    assert_eq!(editor.markdown(), "[clist:L|a][/clist]");
}
