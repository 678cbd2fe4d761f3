//! Checklist marker pre-pass
//!
//! The checklist transformer only recognises `[clist:list|item]` at the start
//! of a line. Text produced elsewhere sometimes glues a marker to preceding
//! content (`Some text[clist:L|a]x[/clist]`), so every opening marker that
//! follows non-whitespace on its line gets a newline inserted before it.
//!
//! A marker whose bracket is backslash-escaped is literal text and is left
//! in place, as is anything inside a fenced code block or an inline code
//! span.
//!
//! After one pass no opening marker outside code is preceded by
//! non-whitespace on its line, so a second pass changes nothing.

use super::parser::fence_marker;
use super::transformers::CHECKLIST_START_ANYWHERE;
use std::ops::Range;

pub fn normalize_checklist_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut fence: Option<String> = None;

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if let Some(open) = &fence {
            if line.trim_start().starts_with(open.as_str()) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if let Some(open) = fence_marker(line) {
            fence = Some(open);
            out.push_str(line);
            continue;
        }
        split_line(line, &mut out);
    }
    out
}

fn split_line(line: &str, out: &mut String) {
    let spans = code_spans(line);
    let mut copied = 0;

    for marker in CHECKLIST_START_ANYWHERE.find_iter(line) {
        let before = &line[..marker.start()];
        if before.ends_with('\\') || spans.iter().any(|span| span.contains(&marker.start())) {
            continue;
        }
        if before.chars().any(|c| !c.is_whitespace()) {
            out.push_str(&line[copied..marker.start()]);
            out.push('\n');
            copied = marker.start();
        }
    }
    out.push_str(&line[copied..]);
}

/// Byte ranges of the inline code spans on one line: a backtick run up to the
/// next run of the same width. A run with no partner is literal.
fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let run_end = |mut index: usize| {
        while index < bytes.len() && bytes[index] == b'`' {
            index += 1;
        }
        index
    };

    let mut spans = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'`' {
            index += 1;
            continue;
        }
        let open = index;
        index = run_end(open);
        let width = index - open;

        let mut cursor = index;
        while cursor < bytes.len() {
            if bytes[cursor] != b'`' {
                cursor += 1;
                continue;
            }
            let close = run_end(cursor);
            if close - cursor == width {
                spans.push(open..close);
                index = close;
                break;
            }
            cursor = close;
        }
    }
    spans
}
