//! Reward dispatcher: category → point delta → leveled pet.
//!
//! # Responsibility
//! - Translate a task category into a point delta via the injected table.
//! - Route the delta through the leveling engine.
//!
//! # Invariants
//! - Performs no I/O; the caller persists the returned pet.
//! - An unmapped category is a validation error, never a silent zero award.

use crate::config::CategoryPointsConfig;
use crate::leveling::{apply_points, LevelProgress};
use crate::model::entity::{Pet, TaskCategory};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from reward dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    /// The injected category→points table has no entry for this category.
    UnknownCategory(TaskCategory),
}

impl Display for RewardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(category) => {
                write!(f, "no point mapping for category `{category}`")
            }
        }
    }
}

impl Error for RewardError {}

/// Stateless dispatcher holding only the injected point table.
#[derive(Debug, Clone)]
pub struct RewardDispatcher {
    points: CategoryPointsConfig,
}

impl RewardDispatcher {
    pub fn new(points: CategoryPointsConfig) -> Self {
        Self { points }
    }

    /// Returns the delta a category is worth, without applying it.
    pub fn delta_for(&self, category: TaskCategory) -> Result<i64, RewardError> {
        self.points
            .points_for(category)
            .ok_or(RewardError::UnknownCategory(category))
    }

    /// Applies the category's point delta to the pet's leveling state.
    ///
    /// Returns the updated pet; persisting it is the caller's job.
    pub fn dispatch(&self, pet: &Pet, category: TaskCategory) -> Result<Pet, RewardError> {
        let delta = self.delta_for(category)?;
        let progress = apply_points(LevelProgress::new(pet.level, pet.points), delta);

        let mut updated = pet.clone();
        updated.level = progress.level;
        updated.points = progress.points;
        Ok(updated)
    }
}
