//! Offset arithmetic over inline content.
//!
//! Offsets count characters of text and code, one unit per line break, and
//! one unit per atomic token. Because a token is a single unit there is no
//! offset that lands inside it: splitting or deleting always keeps or drops
//! the whole token.

use super::nodes::Inline;

/// Length of an inline sequence in offset units.
pub fn inline_len(content: &[Inline]) -> usize {
    content.iter().map(node_len).sum()
}

fn node_len(node: &Inline) -> usize {
    match node {
        Inline::Text { text } => text.chars().count(),
        Inline::Code { literal } => literal.chars().count(),
        Inline::Bold { children }
        | Inline::Italic { children }
        | Inline::Strikethrough { children }
        | Inline::Link { children, .. } => inline_len(children),
        Inline::LineBreak | Inline::Variable(_) | Inline::Mention(_) => 1,
    }
}

/// True when the content holds no characters and no tokens.
pub fn is_empty_content(content: &[Inline]) -> bool {
    inline_len(content) == 0
}

/// Flatten to display text; tokens render as their title or name.
pub fn plain_text(content: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(content, &mut out);
    out
}

fn push_plain_text(content: &[Inline], out: &mut String) {
    for node in content {
        match node {
            Inline::Text { text } => out.push_str(text),
            Inline::Code { literal } => out.push_str(literal),
            Inline::Bold { children }
            | Inline::Italic { children }
            | Inline::Strikethrough { children }
            | Inline::Link { children, .. } => push_plain_text(children, out),
            Inline::LineBreak => out.push('\n'),
            Inline::Variable(variable) => out.push_str(&variable.title),
            Inline::Mention(mention) => out.push_str(&mention.name),
        }
    }
}

/// Split content at `offset`, duplicating formatting wrappers on both sides.
pub fn split_inlines(content: &[Inline], offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut remaining = offset;

    for node in content {
        let len = node_len(node);
        if remaining == 0 {
            right.push(node.clone());
            continue;
        }
        if remaining >= len {
            left.push(node.clone());
            remaining -= len;
            continue;
        }

        // The split point falls strictly inside this node.
        match node {
            Inline::Text { text } => {
                let (a, b) = split_str(text, remaining);
                left.push(Inline::text(a));
                right.push(Inline::text(b));
            }
            Inline::Code { literal } => {
                let (a, b) = split_str(literal, remaining);
                left.push(Inline::Code { literal: a });
                right.push(Inline::Code { literal: b });
            }
            Inline::Bold { children } => {
                let (a, b) = split_inlines(children, remaining);
                left.push(Inline::Bold { children: a });
                right.push(Inline::Bold { children: b });
            }
            Inline::Italic { children } => {
                let (a, b) = split_inlines(children, remaining);
                left.push(Inline::Italic { children: a });
                right.push(Inline::Italic { children: b });
            }
            Inline::Strikethrough { children } => {
                let (a, b) = split_inlines(children, remaining);
                left.push(Inline::Strikethrough { children: a });
                right.push(Inline::Strikethrough { children: b });
            }
            Inline::Link { url, children } => {
                let (a, b) = split_inlines(children, remaining);
                left.push(Inline::Link {
                    url: url.clone(),
                    children: a,
                });
                right.push(Inline::Link {
                    url: url.clone(),
                    children: b,
                });
            }
            // Unit-length nodes never contain a split point.
            Inline::LineBreak | Inline::Variable(_) | Inline::Mention(_) => {
                left.push(node.clone());
            }
        }
        remaining = 0;
    }

    (normalize_inlines(left), normalize_inlines(right))
}

fn split_str(text: &str, chars: usize) -> (String, String) {
    let byte = text
        .char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    (text[..byte].to_string(), text[byte..].to_string())
}

/// Remove the units in `[start, end)`.
pub fn delete_range(content: &[Inline], start: usize, end: usize) -> Vec<Inline> {
    let (head, _) = split_inlines(content, start);
    let (_, tail) = split_inlines(content, end.max(start));
    concat_inlines(head, tail)
}

/// Insert `nodes` at `offset`.
pub fn insert_inlines(content: &[Inline], offset: usize, nodes: Vec<Inline>) -> Vec<Inline> {
    let (head, tail) = split_inlines(content, offset);
    let mut out = head;
    out.extend(nodes);
    concat_inlines(out, tail)
}

/// Insert plain text at `offset`, extending the text leaf that ends there so
/// the typed characters inherit its formatting.
pub fn insert_text(content: &[Inline], offset: usize, text: &str) -> Vec<Inline> {
    let mut nodes = content.to_vec();
    let mut remaining = offset;
    if !insert_text_into(&mut nodes, &mut remaining, text) {
        nodes.push(Inline::text(text));
    }
    normalize_inlines(nodes)
}

fn insert_text_into(nodes: &mut Vec<Inline>, remaining: &mut usize, text: &str) -> bool {
    let mut index = 0;
    while index < nodes.len() {
        let insert_before = match &mut nodes[index] {
            Inline::Text { text: existing } => {
                let len = existing.chars().count();
                if *remaining <= len {
                    insert_at_char(existing, *remaining, text);
                    return true;
                }
                *remaining -= len;
                false
            }
            Inline::Bold { children }
            | Inline::Italic { children }
            | Inline::Strikethrough { children }
            | Inline::Link { children, .. } => {
                if insert_text_into(children, remaining, text) {
                    return true;
                }
                false
            }
            Inline::Code { literal } => {
                let len = literal.chars().count();
                if *remaining > 0 && *remaining < len {
                    insert_at_char(literal, *remaining, text);
                    return true;
                }
                let before = *remaining == 0;
                *remaining = remaining.saturating_sub(len);
                before
            }
            Inline::LineBreak | Inline::Variable(_) | Inline::Mention(_) => {
                let before = *remaining == 0;
                *remaining = remaining.saturating_sub(1);
                before
            }
        };
        if insert_before {
            nodes.insert(index, Inline::text(text));
            return true;
        }
        index += 1;
    }
    if *remaining == 0 {
        nodes.push(Inline::text(text));
        return true;
    }
    false
}

fn insert_at_char(target: &mut String, chars: usize, text: &str) {
    let byte = target
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(target.len());
    target.insert_str(byte, text);
}

/// Join two sequences, merging the text leaves that meet at the seam.
pub fn concat_inlines(mut head: Vec<Inline>, tail: Vec<Inline>) -> Vec<Inline> {
    head.extend(tail);
    normalize_inlines(head)
}

/// Merge adjacent text, drop empty text and empty wrappers.
pub fn normalize_inlines(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            Inline::Text { text } if text.is_empty() => continue,
            Inline::Code { literal } if literal.is_empty() => continue,
            Inline::Bold { children } => {
                let children = normalize_inlines(children);
                if children.is_empty() {
                    continue;
                }
                Inline::Bold { children }
            }
            Inline::Italic { children } => {
                let children = normalize_inlines(children);
                if children.is_empty() {
                    continue;
                }
                Inline::Italic { children }
            }
            Inline::Strikethrough { children } => {
                let children = normalize_inlines(children);
                if children.is_empty() {
                    continue;
                }
                Inline::Strikethrough { children }
            }
            Inline::Link { url, children } => {
                let children = normalize_inlines(children);
                if children.is_empty() {
                    continue;
                }
                Inline::Link { url, children }
            }
            other => other,
        };

        match (out.last_mut(), node) {
            (Some(Inline::Text { text: previous }), Inline::Text { text }) => {
                previous.push_str(&text);
            }
            (_, node) => out.push(node),
        }
    }
    out
}
