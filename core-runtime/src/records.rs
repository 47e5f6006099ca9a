//! Value Records
//!
//! Immutable marshaled snapshots of platform entities. Each record is built
//! once from the native SDK record it mirrors and carries no behavior and no
//! reference back to the platform object — it is plain data the host can hold
//! as long as it likes, serialize, or ship across a language boundary.
//!
//! Records are never mutated in place; fresher state arrives only as a new
//! record marshaled from a new platform fetch.

use bridge_traits::achievements::{NativeAchievement, NativeAchievementDescription};
use bridge_traits::leaderboards::NativeLeaderboardEntry;
use bridge_traits::players::{NativeLocalPlayer, NativePlayer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player another player can see: identity plus display names.
///
/// `photo` is populated only in the payload of a photo-load success event;
/// records marshaled from other operations always carry `None` and stay that
/// way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub display_name: String,
    pub alias: String,
    /// Raw encoded image bytes, when a photo-load operation supplied them.
    pub photo: Option<Vec<u8>>,
}

impl From<&NativePlayer> for PlayerRecord {
    fn from(native: &NativePlayer) -> Self {
        Self {
            player_id: native.player_id.clone(),
            display_name: native.display_name.clone(),
            alias: native.alias.clone(),
            photo: None,
        }
    }
}

/// The authenticated local player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlayerRecord {
    pub player: PlayerRecord,
    pub is_underage: bool,
    pub is_multiplayer_gaming_restricted: bool,
}

impl From<&NativeLocalPlayer> for LocalPlayerRecord {
    fn from(native: &NativeLocalPlayer) -> Self {
        Self {
            player: PlayerRecord::from(&native.player),
            is_underage: native.is_underage,
            is_multiplayer_gaming_restricted: native.is_multiplayer_gaming_restricted,
        }
    }
}

/// Progress state of one achievement for the local player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub identifier: String,
    /// Percent complete, 0–100.
    pub percent_complete: f64,
    /// Derived at marshal time: `percent_complete >= 100`.
    pub completed: bool,
    pub hidden: bool,
    pub last_reported: Option<DateTime<Utc>>,
}

impl From<&NativeAchievement> for AchievementRecord {
    fn from(native: &NativeAchievement) -> Self {
        Self {
            identifier: native.identifier.clone(),
            percent_complete: native.percent_complete,
            completed: native.percent_complete >= 100.0,
            hidden: native.hidden,
            last_reported: native.last_reported,
        }
    }
}

/// Static catalog metadata for one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDescriptionRecord {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub max_points: i64,
    pub hidden: bool,
}

impl From<&NativeAchievementDescription> for AchievementDescriptionRecord {
    fn from(native: &NativeAchievementDescription) -> Self {
        Self {
            identifier: native.identifier.clone(),
            title: native.title.clone(),
            description: native.description.clone(),
            max_points: native.max_points,
            hidden: native.hidden,
        }
    }
}

/// One leaderboard entry: who scored, what, and where it ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntryRecord {
    pub player: PlayerRecord,
    pub score: i64,
    /// 1-based; 1 is the best score in the queried scope.
    pub rank: i64,
    /// Opaque caller-supplied tag echoed back from score submission.
    pub context: i64,
}

impl From<&NativeLeaderboardEntry> for LeaderboardEntryRecord {
    fn from(native: &NativeLeaderboardEntry) -> Self {
        Self {
            player: PlayerRecord::from(&native.player),
            score: native.score,
            rank: native.rank,
            context: native.context,
        }
    }
}
