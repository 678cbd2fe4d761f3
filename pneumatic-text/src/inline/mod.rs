//! Inline token resolution
//!
//! Finds `{{api_name}}` variables and `[name|id]` mentions inside plain text
//! and turns them into atomic tokens.
//!
//! Algorithm
//!
//!     1. Every pattern scans the whole text independently, collecting
//!        `[start, end)` byte spans. Matches that cannot build a token (a
//!        mention whose id is not an integer) are dropped here, so the raw
//!        text stays plain.
//!     2. All matches are sorted by start offset. The sort is stable, so on
//!        equal starts the pattern listed first wins.
//!     3. A single left-to-right sweep keeps a match only if it starts at or
//!        after the end of the previously kept one.
//!     4. The gaps between kept matches become text runs, so concatenating
//!        the raw text of all runs reproduces the input exactly.
//!
//! A flat sorted span list is enough at this scale; no interval tree.

pub mod catalog;

pub use catalog::{VariableCatalog, VariableCatalogEntry};

use crate::document::inline::normalize_inlines;
use crate::document::nodes::{Inline, MentionToken, VariableToken};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

pub static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").unwrap());
pub static MENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]|\n]+)\|([^\[\]|\n]+)\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Variable,
    Mention,
}

/// A raw pattern hit, before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub kind: MatchKind,
    pub start: usize,
    pub end: usize,
    pub raw: String,
}

/// A slice of the scanned text and what it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub span: Range<usize>,
    pub kind: RunKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunKind {
    Text,
    Variable(VariableToken),
    Mention(MentionToken),
}

impl Run {
    /// The source text this run covers.
    pub fn raw<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    pub fn is_token(&self) -> bool {
        !matches!(self.kind, RunKind::Text)
    }
}

/// One inline pattern: a regex plus the token it builds.
pub trait InlineTransformer: Send + Sync {
    fn kind(&self) -> MatchKind;
    fn pattern(&self) -> &Regex;
    /// Build the token, or `None` to leave the match as plain text.
    fn build(&self, captures: &Captures<'_>, catalog: &VariableCatalog) -> Option<RunKind>;
}

pub struct VariableTransformer;

impl InlineTransformer for VariableTransformer {
    fn kind(&self) -> MatchKind {
        MatchKind::Variable
    }

    fn pattern(&self) -> &Regex {
        &VARIABLE_PATTERN
    }

    fn build(&self, captures: &Captures<'_>, catalog: &VariableCatalog) -> Option<RunKind> {
        let api_name = captures.get(1)?.as_str();
        Some(RunKind::Variable(resolve_variable(api_name, catalog)))
    }
}

pub struct MentionTransformer;

impl InlineTransformer for MentionTransformer {
    fn kind(&self) -> MatchKind {
        MatchKind::Mention
    }

    fn pattern(&self) -> &Regex {
        &MENTION_PATTERN
    }

    fn build(&self, captures: &Captures<'_>, _catalog: &VariableCatalog) -> Option<RunKind> {
        let name = captures.get(1)?.as_str().trim();
        let id = captures.get(2)?.as_str().trim().parse::<i64>().ok()?;
        if name.is_empty() {
            return None;
        }
        Some(RunKind::Mention(MentionToken::new(id, name)))
    }
}

static DEFAULT_TRANSFORMERS: [&dyn InlineTransformer; 2] =
    [&VariableTransformer, &MentionTransformer];

/// Built-in patterns in priority order: variables, then mentions.
pub fn default_transformers() -> &'static [&'static dyn InlineTransformer] {
    &DEFAULT_TRANSFORMERS
}

/// Catalog lookup; unresolved names fall back to the raw api name.
pub fn resolve_variable(api_name: &str, catalog: &VariableCatalog) -> VariableToken {
    match catalog.lookup(api_name) {
        Some(entry) => VariableToken {
            api_name: api_name.to_string(),
            title: entry.title.clone(),
            subtitle: entry.subtitle.clone(),
        },
        None => VariableToken::new(api_name, api_name),
    }
}

/// Collect every hit of every pattern, in pattern order.
pub fn scan_matches(text: &str, transformers: &[&dyn InlineTransformer]) -> Vec<InlineMatch> {
    let mut matches = Vec::new();
    for transformer in transformers {
        for m in transformer.pattern().find_iter(text) {
            matches.push(InlineMatch {
                kind: transformer.kind(),
                start: m.start(),
                end: m.end(),
                raw: m.as_str().to_string(),
            });
        }
    }
    matches
}

/// Sort by start and keep the first of any overlapping group.
pub fn resolve_overlaps<T>(mut spans: Vec<(Range<usize>, T)>) -> Vec<(Range<usize>, T)> {
    spans.sort_by_key(|(span, _)| span.start);
    let mut kept: Vec<(Range<usize>, T)> = Vec::with_capacity(spans.len());
    let mut last_end = 0;
    for (span, value) in spans {
        if span.start >= last_end {
            last_end = span.end;
            kept.push((span, value));
        }
    }
    kept
}

/// Tokenize `text` with the built-in patterns.
pub fn parse_inline_tokens(text: &str, catalog: &VariableCatalog) -> Vec<Run> {
    parse_inline_tokens_with(text, catalog, default_transformers())
}

pub fn parse_inline_tokens_with(
    text: &str,
    catalog: &VariableCatalog,
    transformers: &[&dyn InlineTransformer],
) -> Vec<Run> {
    let mut candidates = Vec::new();
    for transformer in transformers {
        for captures in transformer.pattern().captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if let Some(kind) = transformer.build(&captures, catalog) {
                candidates.push((whole.start()..whole.end(), kind));
            }
        }
    }

    let mut runs = Vec::new();
    let mut cursor = 0;
    for (span, kind) in resolve_overlaps(candidates) {
        if span.start > cursor {
            runs.push(Run {
                span: cursor..span.start,
                kind: RunKind::Text,
            });
        }
        cursor = span.end;
        runs.push(Run { span, kind });
    }
    if cursor < text.len() {
        runs.push(Run {
            span: cursor..text.len(),
            kind: RunKind::Text,
        });
    }
    runs
}

/// Materialize runs as inline nodes.
pub fn runs_to_inlines(source: &str, runs: Vec<Run>) -> Vec<Inline> {
    runs.into_iter()
        .map(|run| match run.kind {
            RunKind::Text => Inline::text(&source[run.span]),
            RunKind::Variable(token) => Inline::Variable(token),
            RunKind::Mention(token) => Inline::Mention(token),
        })
        .collect()
}

/// Expand tokens inside every text leaf of `content`. Code spans are left
/// alone; adjacent text leaves are merged first so a token split across
/// parser text nodes is still found.
pub fn tokenize_inlines(content: Vec<Inline>, catalog: &VariableCatalog) -> Vec<Inline> {
    let mut out = Vec::with_capacity(content.len());
    for node in normalize_inlines(content) {
        match node {
            Inline::Text { text } => {
                let runs = parse_inline_tokens(&text, catalog);
                out.extend(runs_to_inlines(&text, runs));
            }
            Inline::Bold { children } => out.push(Inline::Bold {
                children: tokenize_inlines(children, catalog),
            }),
            Inline::Italic { children } => out.push(Inline::Italic {
                children: tokenize_inlines(children, catalog),
            }),
            Inline::Strikethrough { children } => out.push(Inline::Strikethrough {
                children: tokenize_inlines(children, catalog),
            }),
            Inline::Link { url, children } => out.push(Inline::Link {
                url,
                children: tokenize_inlines(children, catalog),
            }),
            other => out.push(other),
        }
    }
    out
}
