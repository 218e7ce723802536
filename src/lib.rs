//! # catset
//!
//! A catechism typesetter. Your source tree is the data source: one TOML
//! record per question, with answer fragments and their scripture citations,
//! and catset turns the set into a LaTeX document ready for a typesetting
//! engine.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! catset processes the source tree through three stages, run strictly in
//! sequence with no feedback loops:
//!
//! ```text
//! 1. Load     questions/  →  Manifest          (filesystem → structured data)
//! 2. Number   Manifest    →  NumberedQuestion  (sequential footnote markers)
//! 3. Render   numbered    →  catechism.tex     (final LaTeX document)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: the load manifest is serializable — `catset check
//!   --json` dumps exactly what was read, before any numbering or markup.
//! - **Determinism**: numbering is a pure function of record order, so the
//!   same source tree always produces the same document.
//! - **Testability**: each stage is a pure function over plain values; unit
//!   tests exercise pipeline logic without touching LaTeX or the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1 — walks the source directory, parses and validates records, produces the manifest |
//! | [`number`] | Stage 2 — assigns sequential footnote markers, per question or document-wide |
//! | [`render`] | Stage 3 — assembles the complete LaTeX document and writes it in one pass |
//! | [`config`] | `config.toml` loading, validation, and the stock config for `gen-config` |
//! | [`schedule`] | Optional `schedule.toml` weekly reading plan, mapped to week headings |
//! | [`types`] | Shared value records (`Question`, `Section`) serialized between stages |
//! | [`listing`] | Inline `N. ` / `[N] ` item-prefix parsing for enumerated answers |
//! | [`tex`] | LaTeX escaping and scripture hyperlink construction |
//! | [`output`] | CLI output formatting — information-first inventory of pipeline results |
//!
//! # Design Decisions
//!
//! ## Records Are Immutable Values
//!
//! `Question` and `Section` are built once by the loader and never mutated.
//! The numbering stage returns a parallel `NumberedQuestion` structure
//! instead of writing marker fields into the records, so every stage can be
//! re-run on the same input and idempotence falls out for free.
//!
//! ## Ids Order the Document, Filenames Don't
//!
//! Records may be grouped into subdirectories and named freely; ordering
//! comes only from the `id` field, interpreted numerically. Fractional ids
//! (`2.5`) let editors insert a question between two neighbors without
//! renumbering the whole set — the same reason the printed editions used
//! them.
//!
//! ## Whole-Document Assembly Before Writing
//!
//! The renderer validates every question and builds the entire `.tex`
//! document in memory before a single byte is written. A failed run leaves
//! no partial output file, so the downstream typesetting engine never sees
//! a torn document.
//!
//! ## LaTeX Over a Layout Engine
//!
//! The output is plain LaTeX consumed by an external engine (xelatex, for
//! fontspec). catset owns the markup and the escaping table; it never
//! invokes the engine and has no opinion about page geometry beyond the
//! preamble it emits.

pub mod config;
pub mod listing;
pub mod load;
pub mod number;
pub mod output;
pub mod render;
pub mod schedule;
pub mod tex;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
