use pneumatic_text::inline::{parse_inline_tokens, RunKind, VariableCatalog, VariableCatalogEntry};
use proptest::prelude::*;

#[test]
fn test_catalog_titles_and_fallback() {
    let catalog: VariableCatalog = vec![
        VariableCatalogEntry::new("due", "Due date").with_subtitle("Kickoff"),
    ]
    .into();
    let runs = parse_inline_tokens("{{due}} and {{unknown}}", &catalog);

    let tokens: Vec<(String, Option<String>)> = runs
        .iter()
        .filter_map(|run| match &run.kind {
            RunKind::Variable(token) => Some((token.title.clone(), token.subtitle.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        tokens,
        vec![
            ("Due date".to_string(), Some("Kickoff".to_string())),
            ("unknown".to_string(), None),
        ]
    );
}

#[test]
fn test_mention_with_non_numeric_id_is_text() {
    let source = "[Alice|notanumber]";
    let runs = parse_inline_tokens(source, &VariableCatalog::new());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].kind, RunKind::Text);
    assert_eq!(runs[0].raw(source), source);
}

#[test]
fn test_overlapping_patterns_keep_the_earliest() {
    // The mention starts first and swallows the variable inside it.
    let source = "[{{x}}|3] then {{y}}";
    let runs = parse_inline_tokens(source, &VariableCatalog::new());
    let kinds: Vec<&str> = runs
        .iter()
        .map(|run| match run.kind {
            RunKind::Text => "text",
            RunKind::Variable(_) => "variable",
            RunKind::Mention(_) => "mention",
        })
        .collect();
    assert_eq!(kinds, vec!["mention", "text", "variable"]);
    assert_eq!(runs[0].raw(source), "[{{x}}|3]");
}

fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,6}",
        Just("{{var}}".to_string()),
        Just("[Ann|12]".to_string()),
        Just("[{{inner}}|4]".to_string()),
        Just("{{[Bo|5]}}".to_string()),
        Just("[broken|x]".to_string()),
        Just("{{".to_string()),
        Just("|".to_string()),
        Just("]".to_string()),
    ]
}

proptest! {
    #[test]
    fn runs_reconstruct_the_input(pieces in prop::collection::vec(piece(), 0..12)) {
        let source = pieces.concat();
        let runs = parse_inline_tokens(&source, &VariableCatalog::new());
        let rebuilt: String = runs.iter().map(|run| run.raw(&source)).collect();
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn token_spans_never_overlap(pieces in prop::collection::vec(piece(), 0..12)) {
        let source = pieces.concat();
        let runs = parse_inline_tokens(&source, &VariableCatalog::new());
        let tokens: Vec<_> = runs.iter().filter(|run| run.is_token()).collect();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start);
        }
        for pair in runs.windows(2) {
            prop_assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }
}
