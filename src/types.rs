//! Shared types used across all pipeline stages.
//!
//! `Question` and `Section` are immutable value records built once by the
//! loader; later stages read them and attach derived data in parallel
//! structures instead of mutating them. Both serialize cleanly so the
//! loaded set can be dumped as JSON for inspection (`catset check --json`).

use serde::{Deserialize, Serialize};

/// One catechism question with its ordered answer fragments.
///
/// The identifier is numeric-looking but kept as a string: fractional ids
/// like `"2.5"` exist in the source material (questions inserted between
/// two neighbors in a later revision) and must sort between `"2"` and `"3"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier; ascending numeric interpretation defines document order.
    pub id: String,
    /// Prompt text, rendered as the question heading.
    pub question: String,
    /// Excluded from output unless the run asks for optional questions.
    #[serde(default)]
    pub optional: bool,
    /// Category tag (e.g. `"commandments"`), used for `--category` filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Answer fragments in insertion order. Joining their texts with single
    /// spaces reproduces the full answer.
    pub sections: Vec<Section>,
}

/// An ordered fragment of a question's answer.
///
/// A fragment with a verse reference gets a footnote marker placed directly
/// after its text; a fragment without one contributes no marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub text: String,
    /// Semicolon-separated human-readable citations
    /// (`"Romans 14:8; 1 Corinthians 6:19"`). `None` means no footnote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verses: Option<String>,
}

impl Question {
    /// Number of sections that will carry a footnote marker.
    pub fn footnote_count(&self) -> usize {
        self.sections.iter().filter(|s| s.has_verses()).count()
    }
}

impl Section {
    /// Whether this section carries a citation (and therefore a marker).
    pub fn has_verses(&self) -> bool {
        self.verses.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(text: &str, verses: Option<&str>) -> Section {
        Section {
            text: text.to_string(),
            verses: verses.map(String::from),
        }
    }

    #[test]
    fn empty_verses_count_as_absent() {
        assert!(!section("text", None).has_verses());
        assert!(!section("text", Some("")).has_verses());
        assert!(section("text", Some("Romans 14:8")).has_verses());
    }

    #[test]
    fn footnote_count_skips_unreferenced_sections() {
        let q = Question {
            id: "1".into(),
            question: "Q?".into(),
            optional: false,
            category: None,
            sections: vec![
                section("a", Some("Romans 14:8")),
                section("b", None),
                section("c", Some("John 3:16")),
            ],
        };
        assert_eq!(q.footnote_count(), 2);
    }
}
