//! Shared test utilities for the catset test suite.
//!
//! Provides fixture setup plus lookup helpers and bulk extractors for
//! load-phase data structures (`Manifest`, `Question`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = load(tmp.path()).unwrap();
//!
//! let q = find_question(&manifest, "1");
//! assert_eq!(q.question, "What is thy only comfort in life and death?");
//! assert_eq!(question_ids(&manifest), vec!["1", "2", "2.5", "3"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::load::Manifest;
use crate::types::Question;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/questions/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/questions");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups — panics with a clear message on miss
// =========================================================================

/// Find a question by id. Panics if not found.
pub fn find_question<'a>(manifest: &'a Manifest, id: &str) -> &'a Question {
    manifest
        .questions
        .iter()
        .find(|q| q.id == id)
        .unwrap_or_else(|| {
            let ids = question_ids(manifest);
            panic!("question '{id}' not found. Available: {ids:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All question ids in manifest order.
pub fn question_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.questions.iter().map(|q| q.id.as_str()).collect()
}

/// The full answer text of a question: section texts joined with single
/// spaces, the way the emitter concatenates them.
pub fn answer_text(question: &Question) -> String {
    question
        .sections
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
