//! Record loading and manifest construction.
//!
//! Stage 1 of the catset pipeline. Walks the source directory to discover
//! question records, parses and validates each one, and produces an ordered
//! [`Manifest`] that subsequent stages consume.
//!
//! ## Source layout
//!
//! ```text
//! questions/                       # Source root
//! ├── config.toml                  # Document configuration (optional)
//! ├── schedule.toml                # Weekly reading plan (optional)
//! ├── 001.toml                     # One record per file
//! ├── 002.toml
//! └── lords-prayer/                # Records may be grouped in subdirectories
//!     ├── 098.toml
//!     └── 099.toml
//! ```
//!
//! File and directory names carry no meaning: ordering comes from the `id`
//! field inside each record, interpreted numerically (`"2.5"` sorts between
//! `"2"` and `"3"`; ids that aren't numbers sort after the ones that are).
//!
//! ## Record format
//!
//! ```toml
//! id = "1"
//! question = "What is thy only comfort in life and death?"
//! optional = false                 # excluded from default output when true
//! section = "comfort"              # category tag, used for filtering
//!
//! [[sections]]
//! text = "That I with body and soul am not my own,"
//! verses = "1 Corinthians 6:19; 1 Thessalonians 5:10"
//!
//! [[sections]]
//! text = "but belong unto my faithful Saviour Jesus Christ."
//! ```
//!
//! Unknown record keys are ignored with a warning; they are reported in the
//! manifest rather than silently dropped so typos surface in `check` output.
//!
//! ## Validation
//!
//! The loader enforces these rules:
//! - Every record must parse as TOML
//! - Every record must carry a non-empty `id` and `question`
//! - No two records may share an id
//!
//! Per-file parsing is independent, so records are parsed in parallel and
//! re-sorted by id afterward to restore deterministic order.

use crate::config::{self, ConfigError, DocConfig};
use crate::schedule::{self, Schedule};
use crate::types::{Question, Section};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Record {path} is not valid TOML: {source}")]
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Record {path} is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    #[error("Duplicate question id {id} in {path}")]
    DuplicateId { id: String, path: PathBuf },
}

/// Manifest output from the load stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// All loaded questions in ascending id order, optional ones included.
    pub questions: Vec<Question>,
    /// Record file per question, relative to the source root. Parallel to
    /// `questions`.
    pub sources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Non-fatal findings (unknown record keys, unusable schedule).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub config: DocConfig,
}

impl Manifest {
    /// Questions selected for emission, in load order.
    ///
    /// Optional questions are dropped unless `include_optional`; when a
    /// `category` is given, only questions carrying that tag survive.
    pub fn included(&self, include_optional: bool, category: Option<&str>) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| include_optional || !q.optional)
            .filter(|q| match category {
                Some(tag) => q.category.as_deref() == Some(tag),
                None => true,
            })
            .cloned()
            .collect()
    }
}

/// Raw record shape as written in the TOML files. Required fields are
/// options here so their absence maps to a field-level error instead of a
/// generic parse failure.
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    question: Option<String>,
    #[serde(default)]
    optional: bool,
    /// Category tag. The records call this `section`, a holdover from the
    /// printed editions' part headings.
    section: Option<String>,
    #[serde(default)]
    sections: Vec<RawSection>,
    /// Anything else in the record. Ignored, but reported.
    #[serde(flatten)]
    extra: toml::Table,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    text: String,
    verses: Option<String>,
}

pub fn load(root: &Path) -> Result<Manifest, LoadError> {
    let files = collect_record_files(root)?;

    // Per-record parsing has no cross-file dependency; the sort below
    // restores deterministic order.
    let parsed: Vec<(PathBuf, Question, Vec<String>)> = files
        .par_iter()
        .map(|path| parse_record(path))
        .collect::<Result<_, _>>()?;

    let mut warnings: Vec<String> = parsed
        .iter()
        .flat_map(|(_, _, w)| w.iter().cloned())
        .collect();

    let mut records: Vec<(PathBuf, Question)> =
        parsed.into_iter().map(|(p, q, _)| (p, q)).collect();
    records.sort_by(|(pa, qa), (pb, qb)| compare_ids(&qa.id, &qb.id).then_with(|| pa.cmp(pb)));

    for pair in records.windows(2) {
        if pair[0].1.id == pair[1].1.id {
            return Err(LoadError::DuplicateId {
                id: pair[1].1.id.clone(),
                path: pair[1].0.clone(),
            });
        }
    }

    let schedule = match schedule::load_schedule(root) {
        Ok(s) => s,
        Err(e) => {
            warnings.push(format!("could not load schedule.toml: {e}"));
            None
        }
    };

    // Load document config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let (sources, questions) = records
        .into_iter()
        .map(|(p, q)| (relative_to(&p, root), q))
        .unzip();

    Ok(Manifest {
        questions,
        sources,
        schedule,
        warnings,
        config,
    })
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Collect every record file under `root`: `*.toml`, skipping the two
/// auxiliary files and anything hidden.
fn collect_record_files(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name().to_string_lossy().as_ref()))
    {
        let entry = entry.map_err(|e| LoadError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == "config.toml" || name == "schedule.toml" {
            continue;
        }
        if entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Parse one record file into a `Question` plus any warnings it produced.
fn parse_record(path: &Path) -> Result<(PathBuf, Question, Vec<String>), LoadError> {
    let content = fs::read_to_string(path)?;
    let raw: RawRecord = toml::from_str(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let id = required_field(raw.id, path, "id")?;
    let question = required_field(raw.question, path, "question")?;

    let mut warnings = Vec::new();
    if !raw.extra.is_empty() {
        let keys: Vec<&str> = raw.extra.keys().map(String::as_str).collect();
        warnings.push(format!(
            "{}: ignoring unknown keys: {}",
            path.display(),
            keys.join(", ")
        ));
    }

    let sections = raw
        .sections
        .into_iter()
        .map(|s| Section {
            text: s.text.trim().to_string(),
            verses: s
                .verses
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
        .collect();

    Ok((
        path.to_path_buf(),
        Question {
            id,
            question,
            optional: raw.optional,
            category: raw.section.map(|s| s.trim().to_string()),
            sections,
        },
        warnings,
    ))
}

fn required_field(
    value: Option<String>,
    path: &Path,
    field: &'static str,
) -> Result<String, LoadError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LoadError::MissingField {
            path: path.to_path_buf(),
            field,
        })
}

/// Ascending numeric order where both ids parse as numbers; numeric ids
/// before non-numeric; lexicographic otherwise.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_record(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn minimal(id: &str) -> String {
        format!(
            "id = \"{id}\"\nquestion = \"Question {id}?\"\n\n[[sections]]\ntext = \"Answer {id}.\"\nverses = \"John 3:16\"\n"
        )
    }

    #[test]
    fn questions_sorted_by_numeric_id() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("10"));
        write_record(tmp.path(), "b.toml", &minimal("2"));
        write_record(tmp.path(), "c.toml", &minimal("1"));

        let manifest = load(tmp.path()).unwrap();
        let ids: Vec<&str> = manifest.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10"]);
    }

    #[test]
    fn fractional_id_sorts_between_neighbors() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("3"));
        write_record(tmp.path(), "b.toml", &minimal("2.5"));
        write_record(tmp.path(), "c.toml", &minimal("2"));

        let manifest = load(tmp.path()).unwrap();
        let ids: Vec<&str> = manifest.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "2.5", "3"]);
    }

    #[test]
    fn non_numeric_ids_sort_after_numeric() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("appendix"));
        write_record(tmp.path(), "b.toml", &minimal("2"));

        let manifest = load(tmp.path()).unwrap();
        let ids: Vec<&str> = manifest.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "appendix"]);
    }

    #[test]
    fn records_found_in_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("lords-prayer");
        fs::create_dir_all(&sub).unwrap();
        write_record(&sub, "098.toml", &minimal("98"));
        write_record(tmp.path(), "001.toml", &minimal("1"));

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.questions.len(), 2);
    }

    #[test]
    fn sources_are_relative_and_parallel_to_questions() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("lords-prayer");
        fs::create_dir_all(&sub).unwrap();
        write_record(&sub, "098.toml", &minimal("98"));
        write_record(tmp.path(), "001.toml", &minimal("1"));

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.sources.len(), manifest.questions.len());
        assert_eq!(manifest.sources[0], Path::new("001.toml"));
        assert_eq!(manifest.sources[1], Path::new("lords-prayer/098.toml"));
    }

    #[test]
    fn auxiliary_files_are_not_records() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "001.toml", &minimal("1"));
        fs::write(tmp.path().join("config.toml"), "title = \"Test\"\n").unwrap();
        fs::write(
            tmp.path().join("schedule.toml"),
            "[[weeks]]\nweek = 1\nquestions = [1]\n",
        )
        .unwrap();

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.questions.len(), 1);
        assert_eq!(manifest.config.title, "Test");
        assert!(manifest.schedule.is_some());
    }

    #[test]
    fn hidden_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "001.toml", &minimal("1"));
        write_record(tmp.path(), ".draft.toml", &minimal("2"));

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.questions.len(), 1);
    }

    #[test]
    fn duplicate_id_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("7"));
        write_record(tmp.path(), "b.toml", &minimal("7"));

        let result = load(tmp.path());
        assert!(matches!(result, Err(LoadError::DuplicateId { id, .. }) if id == "7"));
    }

    #[test]
    fn missing_id_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", "question = \"No id?\"\n");

        let result = load(tmp.path());
        assert!(matches!(
            result,
            Err(LoadError::MissingField { field: "id", .. })
        ));
    }

    #[test]
    fn missing_question_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", "id = \"1\"\n");

        let result = load(tmp.path());
        assert!(matches!(
            result,
            Err(LoadError::MissingField {
                field: "question",
                ..
            })
        ));
    }

    #[test]
    fn blank_id_counts_as_missing() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", "id = \" \"\nquestion = \"Q?\"\n");

        let result = load(tmp.path());
        assert!(matches!(
            result,
            Err(LoadError::MissingField { field: "id", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", "id = \"1\"\nquestion = unclosed");

        let result = load(tmp.path());
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn unknown_keys_warn_but_load() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "a.toml",
            "id = \"1\"\nquestion = \"Q?\"\nauthor = \"anon\"\n",
        );

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.questions.len(), 1);
        assert_eq!(manifest.warnings.len(), 1);
        assert!(manifest.warnings[0].contains("author"));
    }

    #[test]
    fn optional_and_category_parsed() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "a.toml",
            "id = \"1\"\nquestion = \"Q?\"\noptional = true\nsection = \"commandments\"\n",
        );

        let manifest = load(tmp.path()).unwrap();
        assert!(manifest.questions[0].optional);
        assert_eq!(
            manifest.questions[0].category.as_deref(),
            Some("commandments")
        );
    }

    #[test]
    fn section_text_and_verses_trimmed() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "a.toml",
            "id = \"1\"\nquestion = \"Q?\"\n\n[[sections]]\ntext = \"  padded  \"\nverses = \"   \"\n",
        );

        let manifest = load(tmp.path()).unwrap();
        let section = &manifest.questions[0].sections[0];
        assert_eq!(section.text, "padded");
        assert_eq!(section.verses, None);
    }

    #[test]
    fn broken_schedule_degrades_to_warning() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "001.toml", &minimal("1"));
        fs::write(tmp.path().join("schedule.toml"), "weeks = 5\n").unwrap();

        let manifest = load(tmp.path()).unwrap();
        assert!(manifest.schedule.is_none());
        assert!(manifest.warnings.iter().any(|w| w.contains("schedule")));
    }

    #[test]
    fn loading_twice_is_identical() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("3"));
        write_record(tmp.path(), "b.toml", &minimal("1"));
        write_record(tmp.path(), "c.toml", &minimal("2"));

        let first = load(tmp.path()).unwrap();
        let second = load(tmp.path()).unwrap();
        let ids = |m: &Manifest| {
            m.questions
                .iter()
                .map(|q| q.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    // =========================================================================
    // Fixture tree
    // =========================================================================

    #[test]
    fn fixture_tree_loads_completely() {
        use crate::test_helpers::*;

        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();

        assert_eq!(question_ids(&manifest), vec!["1", "2", "2.5", "3"]);
        assert_eq!(manifest.config.title, "Orthodox Catechism");
        assert_eq!(manifest.schedule.as_ref().unwrap().weeks.len(), 2);
        assert!(manifest.warnings.is_empty());

        let q1 = find_question(&manifest, "1");
        assert_eq!(q1.question, "What is thy only comfort in life and death?");
        assert_eq!(q1.sections.len(), 6);
        assert_eq!(q1.footnote_count(), 5);
        assert!(answer_text(q1).starts_with("That I with body and soul"));
        assert!(answer_text(q1).ends_with("subservient to my salvation."));

        assert!(find_question(&manifest, "2.5").optional);
        assert_eq!(find_question(&manifest, "3").category.as_deref(), Some("law"));
    }

    // =========================================================================
    // Inclusion policy
    // =========================================================================

    #[test]
    fn optional_questions_retained_but_excluded_by_default() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.toml", &minimal("1"));
        write_record(
            tmp.path(),
            "b.toml",
            "id = \"2\"\nquestion = \"Maybe?\"\noptional = true\n\n[[sections]]\ntext = \"Perhaps.\"\n",
        );

        let manifest = load(tmp.path()).unwrap();
        assert_eq!(manifest.questions.len(), 2);

        let default = manifest.included(false, None);
        assert_eq!(default.len(), 1);
        assert_eq!(default[0].id, "1");

        let all = manifest.included(true, None);
        let ids: Vec<&str> = all.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn category_filter_selects_tagged_questions() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "a.toml",
            "id = \"1\"\nquestion = \"Q?\"\nsection = \"comfort\"\n\n[[sections]]\ntext = \"A.\"\n",
        );
        write_record(tmp.path(), "b.toml", &minimal("2"));

        let manifest = load(tmp.path()).unwrap();
        let filtered = manifest.included(false, Some("comfort"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");
    }
}

