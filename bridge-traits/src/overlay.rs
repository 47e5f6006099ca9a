//! Modal Overlay Abstraction
//!
//! The platform's built-in achievements/leaderboards UI, treated as a black
//! box: the core asks for a surface to be shown and learns only how the
//! presentation ended.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which overlay surface to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlaySurface {
    /// The full achievements list.
    Achievements,
    /// A single achievement's detail page.
    Achievement { achievement_id: String },
    /// The full leaderboards list.
    Leaderboards,
    /// A single leaderboard.
    Leaderboard { leaderboard_id: String },
}

/// How a presented overlay ended.
///
/// Dismissal is a normal outcome, not an error: the player closed the overlay
/// without completing whatever flow it offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayOutcome {
    Completed,
    Dismissed,
}

/// Presents the platform's modal player-services UI.
///
/// Implementations that have no UI surface (headless builds, platforms
/// without the native overlay) should return
/// [`SdkError::NotSupported`](crate::error::SdkError::NotSupported).
#[async_trait]
pub trait OverlayPresenter: Send + Sync {
    /// Present a surface modally and resolve when it closes.
    async fn present(&self, surface: OverlaySurface) -> Result<OverlayOutcome>;
}
