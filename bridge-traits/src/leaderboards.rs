//! Leaderboards Service Abstraction
//!
//! Score submission and entry paging. Loading entries is a two-phase flow on
//! every platform this models: the leaderboard handle is resolved by
//! identifier first, then the resolved handle pages entries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::players::NativePlayer;

/// Which players a leaderboard query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerScope {
    Global,
    FriendsOnly,
}

/// Which reporting period a leaderboard query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeScope {
    AllTime,
    Week,
    Today,
}

/// Platform-native entry window: 1-based offset plus length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRange {
    /// Rank of the first entry requested (1 = first place).
    pub offset: i64,
    /// Number of entries requested.
    pub length: i64,
}

/// A resolved leaderboard handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLeaderboard {
    pub identifier: String,
    pub title: Option<String>,
}

/// A single leaderboard entry as reported by the native SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLeaderboardEntry {
    pub player: NativePlayer,
    pub score: i64,
    /// 1-based rank; 1 is the best score in the queried scope.
    pub rank: i64,
    /// Opaque caller-supplied tag echoed back with the entry.
    pub context: i64,
}

/// One page of leaderboard entries.
///
/// Mirrors the platform completion tuple: the local player's own entry for
/// the query (if any), the requested window of entries in rank order, and the
/// total number of players in the queried scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub local_player_entry: Option<NativeLeaderboardEntry>,
    pub entries: Vec<NativeLeaderboardEntry>,
    pub total_player_count: i64,
}

/// Score submission and leaderboard queries.
#[async_trait]
pub trait LeaderboardsService: Send + Sync {
    /// Submit a score for the local player to one or more leaderboards.
    ///
    /// The batch succeeds or fails as a unit.
    async fn submit_score(
        &self,
        score: i64,
        context: i64,
        leaderboard_ids: &[String],
    ) -> Result<()>;

    /// Resolve a leaderboard handle by identifier.
    ///
    /// `Ok(None)` means the platform answered and no such leaderboard exists;
    /// `Err` means the resolution call itself failed.
    async fn load_leaderboard(&self, leaderboard_id: &str) -> Result<Option<NativeLeaderboard>>;

    /// Page entries from a resolved leaderboard.
    ///
    /// The window is forwarded to the platform as-is; an invalid window is the
    /// platform's to reject.
    async fn load_entries(
        &self,
        leaderboard: &NativeLeaderboard,
        player_scope: PlayerScope,
        time_scope: TimeScope,
        range: EntryRange,
    ) -> Result<LeaderboardPage>;
}
