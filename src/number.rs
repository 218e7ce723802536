//! Footnote renumbering.
//!
//! Stage 2 of the catset pipeline. Walks each question's ordered section
//! list and assigns sequential footnote markers to every section that
//! carries a verse reference. The assignment is a pure function of input
//! order: stable, deterministic, and idempotent. Source records are never
//! mutated — the derived numbering lives in a parallel structure that the
//! emitter consumes.
//!
//! ## Numbering scope
//!
//! The counter either resets to 1 at the start of every question
//! (`per-question`, the default) or runs continuously across the whole
//! document (`global`). The source material is ambiguous about which the
//! printed editions intended, so both are supported and the choice is a
//! config option.

use crate::types::Question;
use serde::{Deserialize, Serialize};

/// Where the footnote counter resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingScope {
    /// Markers restart at 1 for every question.
    #[default]
    PerQuestion,
    /// Markers run continuously through the document.
    Global,
}

impl std::fmt::Display for NumberingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberingScope::PerQuestion => write!(f, "per-question"),
            NumberingScope::Global => write!(f, "global"),
        }
    }
}

/// A question with its derived footnote numbering attached.
#[derive(Debug, Clone, Serialize)]
pub struct NumberedQuestion {
    pub question: Question,
    /// Marker per section, parallel to `question.sections`. `None` for
    /// sections without a verse reference.
    pub markers: Vec<Option<u32>>,
    /// Footnotes in marker order, one per marked section.
    pub footnotes: Vec<Footnote>,
}

/// A sequential marker paired with the verse reference it cites.
#[derive(Debug, Clone, Serialize)]
pub struct Footnote {
    pub number: u32,
    pub verses: String,
}

/// Assign footnote markers to an ordered, already-filtered list of questions.
///
/// Sections without a verse reference receive no marker and do not advance
/// the counter. An empty section list yields no markers. There are no error
/// conditions.
pub fn number_questions(questions: &[Question], scope: NumberingScope) -> Vec<NumberedQuestion> {
    let mut counter = 0u32;

    questions
        .iter()
        .map(|question| {
            if scope == NumberingScope::PerQuestion {
                counter = 0;
            }

            let mut markers = Vec::with_capacity(question.sections.len());
            let mut footnotes = Vec::new();

            for section in &question.sections {
                if section.has_verses() {
                    counter += 1;
                    markers.push(Some(counter));
                    footnotes.push(Footnote {
                        number: counter,
                        verses: section.verses.clone().unwrap_or_default(),
                    });
                } else {
                    markers.push(None);
                }
            }

            NumberedQuestion {
                question: question.clone(),
                markers,
                footnotes,
            }
        })
        .collect()
}
