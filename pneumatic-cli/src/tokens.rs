//! Listing of the runs the inline resolver produces for a text.
//!
//! One line per run: kind, byte span, the raw source slice and, for tokens,
//! what they resolved to.
//!
//!     text      0..6    "Hello "
//!     variable  6..14   "{{name}}"  title="Name"
//!     mention   15..23  "[Ann|12]"  id=12 name="Ann"

use pneumatic_text::inline::{parse_inline_tokens, Run, RunKind, VariableCatalog};
use std::fmt::Write;

pub fn describe_runs(source: &str, catalog: &VariableCatalog) -> String {
    let runs = parse_inline_tokens(source, catalog);
    let mut out = String::new();
    for run in &runs {
        let _ = writeln!(out, "{}", describe_run(source, run));
    }
    out
}

fn describe_run(source: &str, run: &Run) -> String {
    let span = format!("{}..{}", run.span.start, run.span.end);
    let raw = format!("{:?}", run.raw(source));
    match &run.kind {
        RunKind::Text => format!("{:<9} {span:<7} {raw}", "text"),
        RunKind::Variable(token) => {
            let mut line = format!("{:<9} {span:<7} {raw}  title={:?}", "variable", token.title);
            if let Some(subtitle) = &token.subtitle {
                let _ = write!(line, " subtitle={subtitle:?}");
            }
            line
        }
        RunKind::Mention(token) => format!(
            "{:<9} {span:<7} {raw}  id={} name={:?}",
            "mention", token.id, token.name
        ),
    }
}
