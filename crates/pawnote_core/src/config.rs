//! Injected reward configuration.
//!
//! # Responsibility
//! - Carry the category→points table as an explicit value passed to the
//!   reward dispatcher and task services.
//!
//! # Invariants
//! - No module-level mutable state; callers own and inject the table.
//! - A category missing from the table is a lookup miss, not a panic.

use crate::model::entity::TaskCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_EASY_POINTS: i64 = 250;
const DEFAULT_MEDIUM_POINTS: i64 = 500;
const DEFAULT_HARD_POINTS: i64 = 1000;

/// Category→points mapping used to derive task points and reward deltas.
///
/// Deserializes from plain JSON objects such as
/// `{"easy": 250, "medium": 500, "hard": 1000}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPointsConfig {
    points: BTreeMap<TaskCategory, i64>,
}

impl CategoryPointsConfig {
    /// Builds a config from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (TaskCategory, i64)>) -> Self {
        Self {
            points: entries.into_iter().collect(),
        }
    }

    /// Parses a config from a JSON object string.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Looks up the point value for a category.
    ///
    /// Returns `None` when the injected table has no entry for `category`,
    /// which the dispatcher surfaces as an unknown-category error.
    pub fn points_for(&self, category: TaskCategory) -> Option<i64> {
        self.points.get(&category).copied()
    }
}

impl Default for CategoryPointsConfig {
    fn default() -> Self {
        Self::from_entries([
            (TaskCategory::Easy, DEFAULT_EASY_POINTS),
            (TaskCategory::Medium, DEFAULT_MEDIUM_POINTS),
            (TaskCategory::Hard, DEFAULT_HARD_POINTS),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryPointsConfig;
    use crate::model::entity::TaskCategory;

    #[test]
    fn default_table_matches_tuning() {
        let config = CategoryPointsConfig::default();
        assert_eq!(config.points_for(TaskCategory::Easy), Some(250));
        assert_eq!(config.points_for(TaskCategory::Medium), Some(500));
        assert_eq!(config.points_for(TaskCategory::Hard), Some(1000));
    }

    #[test]
    fn partial_table_misses_unlisted_category() {
        let config = CategoryPointsConfig::from_entries([(TaskCategory::Easy, 10)]);
        assert_eq!(config.points_for(TaskCategory::Easy), Some(10));
        assert_eq!(config.points_for(TaskCategory::Hard), None);
    }

    #[test]
    fn parses_from_json_object() {
        let config =
            CategoryPointsConfig::from_json_str(r#"{"easy": 1, "medium": 2, "hard": 3}"#)
                .expect("valid config JSON");
        assert_eq!(config.points_for(TaskCategory::Medium), Some(2));
    }
}
