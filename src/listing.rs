//! List-item prefix parsing for answer fragments.
//!
//! Some answers enumerate their points, and the source records keep the
//! numbering inline in the fragment text:
//!
//! - `"1. From the law of God"` — enumerated item
//! - `"[2] That we may know our misery"` — bracketed item
//!
//! The emitter renders such answers as a LaTeX `enumerate` environment, so
//! the inline prefix must be detected and stripped (the environment numbers
//! the items itself). All parsing here is on the raw fragment text, before
//! escaping.

use crate::types::Section;

/// Minimum number of item-shaped fragments before an answer is treated as
/// a list (or as hierarchical prose). Fewer than this and stray `"1. "`
/// prefixes stay inline as ordinary text.
const LIST_THRESHOLD: usize = 3;

/// Whether `text` starts with `N. ` (digits, dot, space).
pub fn is_enumerated_item(text: &str) -> bool {
    split_enumerated(text).is_some()
}

/// Whether `text` starts with `[N] ` (bracketed digits, space).
pub fn is_bracketed_item(text: &str) -> bool {
    split_bracketed(text).is_some()
}

/// Whether `text` is either kind of list item.
pub fn is_item(text: &str) -> bool {
    is_enumerated_item(text) || is_bracketed_item(text)
}

/// Strip the `N. ` or `[N] ` prefix, returning the bare item text.
/// Text without a prefix is returned unchanged.
pub fn strip_item_prefix(text: &str) -> &str {
    if let Some((_, rest)) = split_enumerated(text) {
        rest
    } else if let Some((_, rest)) = split_bracketed(text) {
        rest
    } else {
        text
    }
}

/// Whether an answer should render as an enumerated list: at least
/// [`LIST_THRESHOLD`] of its non-empty fragments are item-shaped.
pub fn is_list_answer(sections: &[Section]) -> bool {
    let items = sections
        .iter()
        .filter(|s| !s.text.is_empty() && is_item(&s.text))
        .count();
    items >= LIST_THRESHOLD
}

/// Whether an answer is hierarchical prose: numbered main points that read
/// as flowing paragraphs (`"1. From the whole doctrine..."`), not as list
/// items. Detected by the `N. From ` opening on several fragments.
pub fn is_hierarchical_answer(sections: &[Section]) -> bool {
    let heads = sections
        .iter()
        .filter(|s| {
            split_enumerated(&s.text)
                .is_some_and(|(_, rest)| rest.starts_with("From ") || rest.starts_with("from "))
        })
        .count();
    heads >= LIST_THRESHOLD
}

/// Whether `text` opens a numbered main point (`N. `) in a hierarchical answer.
pub fn is_numbered_head(text: &str) -> bool {
    is_enumerated_item(text)
}

fn split_enumerated(text: &str) -> Option<(u32, &str)> {
    let digits: usize = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &text[digits..];
    let rest = rest.strip_prefix('.')?;
    let rest = rest.strip_prefix(' ')?;
    let num = text[..digits].parse().ok()?;
    Some((num, rest))
}

fn split_bracketed(text: &str) -> Option<(u32, &str)> {
    let inner = text.strip_prefix('[')?;
    let digits: usize = inner.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = inner[digits..].strip_prefix(']')?;
    let rest = rest.strip_prefix(' ')?;
    let num = inner[..digits].parse().ok()?;
    Some((num, rest))
}
