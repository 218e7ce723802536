//! LaTeX text escaping and scripture hyperlink construction.
//!
//! ## Escape table
//!
//! Every character with special meaning in LaTeX is replaced, totally and
//! in a single pass, so already-substituted text is never re-scanned:
//!
//! | input | output                  |
//! |-------|-------------------------|
//! | `&`   | `\&`                    |
//! | `%`   | `\%`                    |
//! | `$`   | `\$`                    |
//! | `#`   | `\#`                    |
//! | `_`   | `\_`                    |
//! | `{`   | `\{`                    |
//! | `}`   | `\}`                    |
//! | `~`   | `\textasciitilde{}`     |
//! | `^`   | `\textasciicircum{}`    |
//! | `\`   | `\textbackslash{}`      |
//!
//! The mapping is injective, so escaping is reversible in principle.

/// Escape LaTeX special characters in `text`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a BibleGateway passage-search URL for a verse reference string.
///
/// The reference is used verbatim as the search term, with the handful of
/// characters that appear in citations percent-encoded:
/// `"Romans 14:8; 1 Corinthians 6:19"` →
/// `https://www.biblegateway.com/passage/?search=Romans+14%3A8%3B+1+Corinthians+6%3A19&version=ESV`
pub fn passage_url(verses: &str, version: &str) -> String {
    let mut search = String::with_capacity(verses.len());
    for c in verses.chars() {
        match c {
            ' ' => search.push('+'),
            ':' => search.push_str("%3A"),
            ';' => search.push_str("%3B"),
            ',' => search.push_str("%2C"),
            _ => search.push(c),
        }
    }
    format!("https://www.biblegateway.com/passage/?search={search}&version={version}")
}

/// Hyperref anchor name for a question id. Dots are not safe in anchor
/// names, so `"2.5"` becomes `"q2-5"`.
pub fn anchor(id: &str) -> String {
    format!("q{}", id.replace('.', "-"))
}
