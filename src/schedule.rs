//! Weekly reading schedule.
//!
//! A catechism is traditionally read on a weekly cadence, and the source
//! tree may carry a `schedule.toml` assigning question ranges to weeks:
//!
//! ```toml
//! [[weeks]]
//! week = 1
//! title = "Of Man's Comfort"
//! questions = [1, 2]
//!
//! [[weeks]]
//! week = 2
//! title = "Of Man's Misery"
//! questions = [3, 4, 5]
//! ```
//!
//! The emitter starts a new page and inserts a week heading before the
//! first question of each week. The schedule is advisory content, not part
//! of the record set: a missing file means no headings, and a malformed
//! file degrades to a warning rather than failing the run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parsed `schedule.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schedule {
    #[serde(default)]
    pub weeks: Vec<Week>,
}

/// One week of the reading plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Week {
    pub week: u32,
    #[serde(default)]
    pub title: String,
    /// Question ids covered this week, in reading order.
    #[serde(default)]
    pub questions: Vec<u32>,
}

/// Load `schedule.toml` from the source directory.
///
/// Returns `Ok(None)` when the file doesn't exist.
pub fn load_schedule(root: &Path) -> Result<Option<Schedule>, ScheduleError> {
    let path = root.join("schedule.toml");
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let schedule: Schedule = toml::from_str(&content)?;
    Ok(Some(schedule))
}

/// Map each week's first question id to its week, for heading insertion.
///
/// Only integer ids can start a week; the emitter matches them against
/// record ids by numeric value, so `"1"` and a schedule entry `1` agree.
pub fn week_starts(schedule: &Schedule) -> BTreeMap<u32, &Week> {
    schedule
        .weeks
        .iter()
        .filter_map(|week| week.questions.first().map(|&first| (first, week)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEDULE: &str = r#"
[[weeks]]
week = 1
title = "Of Man's Comfort"
questions = [1, 2]

[[weeks]]
week = 2
title = "Of Man's Misery"
questions = [3, 4, 5]
"#;

    #[test]
    fn missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_schedule(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn loads_weeks_in_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("schedule.toml"), SCHEDULE).unwrap();
        let schedule = load_schedule(tmp.path()).unwrap().unwrap();
        assert_eq!(schedule.weeks.len(), 2);
        assert_eq!(schedule.weeks[0].week, 1);
        assert_eq!(schedule.weeks[1].title, "Of Man's Misery");
    }

    #[test]
    fn malformed_schedule_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("schedule.toml"), "weeks = 5").unwrap();
        assert!(matches!(
            load_schedule(tmp.path()),
            Err(ScheduleError::Toml(_))
        ));
    }

    #[test]
    fn week_starts_keyed_by_first_question() {
        let schedule: Schedule = toml::from_str(SCHEDULE).unwrap();
        let starts = week_starts(&schedule);
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[&1].week, 1);
        assert_eq!(starts[&3].week, 2);
        assert!(!starts.contains_key(&2));
    }

    #[test]
    fn empty_week_has_no_start() {
        let schedule: Schedule = toml::from_str("[[weeks]]\nweek = 1\n").unwrap();
        assert!(week_starts(&schedule).is_empty());
    }
}
