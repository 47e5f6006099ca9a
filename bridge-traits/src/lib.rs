//! # Platform Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform's
//! player-services adapter.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and the platform's
//! native player-services SDK. Each trait represents one service family the
//! core orchestrates but cannot implement itself: the native SDK is a black
//! box that performs asynchronous lookups and submissions and reports back
//! through a completion. Adapters wrap those completions as `async fn`s.
//!
//! ## Traits
//!
//! ### Player Services
//! - [`AuthenticationService`](players::AuthenticationService) - Platform sign-in and player photos
//! - [`AchievementsService`](achievements::AchievementsService) - Achievement progress and catalog
//! - [`LeaderboardsService`](leaderboards::LeaderboardsService) - Score submission and entry paging
//!
//! ### Host Integration
//! - [`OverlayPresenter`](overlay::OverlayPresenter) - Modal game-overlay UI surface
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`SdkError`](error::SdkError) type. Adapters
//! should surface the platform's own failure untouched via
//! [`SdkError::Native`] — the core preserves native codes and descriptions
//! verbatim when it reports failures to the host — and reserve
//! [`SdkError::NotSupported`] for capabilities the current platform or build
//! simply does not have (e.g., no overlay UI).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds; the core issues calls from
//! spawned tasks and adapters must tolerate concurrent in-flight operations.

pub mod achievements;
pub mod error;
pub mod leaderboards;
pub mod overlay;
pub mod players;
pub mod time;

pub use error::SdkError;

// Re-export commonly used types
pub use achievements::{
    AchievementProgress, AchievementsService, NativeAchievement, NativeAchievementDescription,
};
pub use leaderboards::{
    EntryRange, LeaderboardPage, LeaderboardsService, NativeLeaderboard, NativeLeaderboardEntry,
    PlayerScope, TimeScope,
};
pub use overlay::{OverlayOutcome, OverlayPresenter, OverlaySurface};
pub use players::{AuthenticationService, NativeLocalPlayer, NativePlayer};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
