//! Markdown format tests
//!
//! Tests for the decode / encode pair, including checklist, variable and
//! mention constructs.

mod export;
mod round_trip;

use std::path::PathBuf;

pub(crate) fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("markdown")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}
