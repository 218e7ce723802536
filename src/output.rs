//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every question is its semantic identity — positional index, id, and
//! prompt — with filesystem paths shown as secondary context via indented
//! `Source:` lines. This makes the output readable as a content inventory
//! while still letting users trace data back to specific record files.
//!
//! # Output Format
//!
//! ## Check / load inventory
//!
//! ```text
//! Questions
//! 001 Q. 1: What is thy only comfort in life and death? (6 sections, 5 footnotes)
//!     Source: 001.toml
//! 002 Q. 2: How many things are necessary for thee to know? (3 sections, 2 footnotes)
//!     Source: 002.toml
//! 003 Q. 2.5: What does true faith require? (1 section, 1 footnote) [optional]
//!     Source: extras/2-5.toml
//!
//! Schedule
//!     schedule.toml (52 weeks)
//!
//! Config
//!     config.toml
//!
//! 3 questions (1 optional), 8 footnotes
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Q. 1 → 5 footnotes
//! 002 Q. 2 → 2 footnotes
//! Generated 2 question blocks, 7 footnotes → catechism.tex
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects. Warnings are not handled
//! here; the CLI sends them to stderr.

use crate::load::Manifest;
use crate::number::NumberedQuestion;
use crate::types::Question;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_prompt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Format a question header: positional index, id, prompt, and counts.
///
/// ```text
/// 001 Q. 1: What is thy only comfort? (2 sections, 2 footnotes)
/// 003 Q. 2.5: What does true faith require? (1 section, 1 footnote) [optional]
/// ```
fn question_header(index: usize, q: &Question) -> String {
    let prompt = truncate_prompt(&q.question, 60);
    let sections = q.sections.len();
    let footnotes = q.footnote_count();
    let mut header = format!(
        "{} Q. {}: {} ({} {}, {} {})",
        format_index(index),
        q.id,
        prompt,
        sections,
        plural(sections, "section"),
        footnotes,
        plural(footnotes, "footnote"),
    );
    if q.optional {
        header.push_str(" [optional]");
    }
    header
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

// ============================================================================
// Load / check inventory
// ============================================================================

/// Format the loaded content inventory.
///
/// Information-first: each question leads with its positional index, id, and
/// prompt. Record paths are shown as indented context lines, followed by the
/// auxiliary files detected and a summary line.
pub fn format_load_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Questions".to_string());
    for (i, question) in manifest.questions.iter().enumerate() {
        lines.push(question_header(i + 1, question));
        if let Some(source) = manifest.sources.get(i) {
            lines.push(format!("    Source: {}", source.display()));
        }
        if let Some(category) = &question.category {
            lines.push(format!("    Category: {category}"));
        }
    }

    if let Some(schedule) = &manifest.schedule {
        let weeks = schedule.weeks.len();
        lines.push(String::new());
        lines.push("Schedule".to_string());
        lines.push(format!(
            "    schedule.toml ({} {})",
            weeks,
            plural(weeks, "week")
        ));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (defaults, no config.toml)".to_string());
    }

    let total = manifest.questions.len();
    let optional = manifest.questions.iter().filter(|q| q.optional).count();
    let footnotes: usize = manifest.questions.iter().map(Question::footnote_count).sum();
    lines.push(String::new());
    let mut summary = format!("{} {}", total, plural(total, "question"));
    if optional > 0 {
        summary.push_str(&format!(" ({optional} optional)"));
    }
    summary.push_str(&format!(
        ", {} {}",
        footnotes,
        plural(footnotes, "footnote")
    ));
    lines.push(summary);

    lines
}

/// Print the load inventory to stdout.
pub fn print_load_output(manifest: &Manifest, source_root: &Path) {
    for line in format_load_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build stage output showing the emitted question blocks.
///
/// Each emitted question leads with its positional index and id, followed by
/// `→` and its footnote count; the final line summarizes the document.
pub fn format_build_output(questions: &[NumberedQuestion], output: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total_footnotes = 0;

    for (i, nq) in questions.iter().enumerate() {
        let count = nq.footnotes.len();
        total_footnotes += count;
        lines.push(format!(
            "{} Q. {} \u{2192} {} {}",
            format_index(i + 1),
            nq.question.id,
            count,
            plural(count, "footnote"),
        ));
    }

    lines.push(format!(
        "Generated {} question {}, {} {} \u{2192} {}",
        questions.len(),
        plural(questions.len(), "block"),
        total_footnotes,
        plural(total_footnotes, "footnote"),
        output.display()
    ));

    lines
}

/// Print build output to stdout.
pub fn print_build_output(questions: &[NumberedQuestion], output: &Path) {
    for line in format_build_output(questions, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
