//! Achievements Service Abstraction
//!
//! Achievement progress reporting and the static description catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Progress update for a single achievement, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub identifier: String,
    /// Percent complete, 0–100. The platform treats 100 as earned.
    pub percent_complete: f64,
}

impl AchievementProgress {
    pub fn new(identifier: impl Into<String>, percent_complete: f64) -> Self {
        Self {
            identifier: identifier.into(),
            percent_complete,
        }
    }
}

/// An achievement's progress state as reported by the native SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeAchievement {
    pub identifier: String,
    /// Percent complete, 0–100.
    pub percent_complete: f64,
    /// Hidden from the player until earned.
    pub hidden: bool,
    /// When progress was last reported, if the platform tracks it.
    pub last_reported: Option<DateTime<Utc>>,
}

/// Static catalog metadata for an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAchievementDescription {
    pub identifier: String,
    pub title: String,
    pub description: String,
    /// Points awarded when the achievement completes.
    pub max_points: i64,
    /// Hidden from the player until earned.
    pub hidden: bool,
}

/// Achievement progress and catalog operations.
///
/// Reporting is all-or-nothing: the platform accepts or rejects the whole
/// batch, and the adapter must not apply a partial batch on failure.
#[async_trait]
pub trait AchievementsService: Send + Sync {
    /// Report a batch of progress updates for the local player.
    async fn report(&self, progress: &[AchievementProgress]) -> Result<()>;

    /// Remove all of the local player's achievement progress from the server.
    async fn reset(&self) -> Result<()>;

    /// Load the local player's achievements, in platform order.
    async fn load_achievements(&self) -> Result<Vec<NativeAchievement>>;

    /// Load the full achievement description catalog, in platform order.
    async fn load_descriptions(&self) -> Result<Vec<NativeAchievementDescription>>;
}
