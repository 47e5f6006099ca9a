//! Player services façade and bootstrap helpers.
//!
//! This crate wires host-provided platform adapters (sign-in, achievements,
//! leaderboards, overlay) into one [`PlayerServices`] object exposing the
//! complete request surface. Hosts issue fire-and-forget requests on it and
//! drain exactly one terminal [`ServiceEvent`] per request from the
//! subscription returned by [`PlayerServices::subscribe`].
//!
//! Development builds typically enable the `sim-shims` feature, which fills
//! any adapter the host did not inject with the in-memory simulated platform
//! from `bridge-sim`.
//!
//! ```
//! use core_runtime::config::CoreConfig;
//! use core_service::PlayerServices;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> core_runtime::Result<()> {
//! let config = CoreConfig::builder().build()?; // sim-shims fill the adapters
//! let services = PlayerServices::new(config);
//!
//! let mut events = services.subscribe();
//! services.authenticate();
//! // events.recv().await yields the sign-in terminal event
//! # Ok(())
//! # }
//! ```

use bridge_traits::achievements::AchievementProgress;
use core_achievements::AchievementManager;
use core_leaderboards::LeaderboardManager;
use core_players::{AuthManager, PlayerSession};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, Receiver, ServiceEvent};
use tracing::debug;

pub use core_runtime::{Error, Result};

#[cfg(feature = "sim-shims")]
pub use bridge_sim::SimPlayerServices;

/// Primary façade exposed to host applications.
///
/// Every request method returns immediately; results arrive as events. The
/// only exception is [`is_authenticated`](Self::is_authenticated), which
/// answers directly. Request methods must be called within a Tokio runtime —
/// each spawns its platform work and the completion publishes the terminal
/// event.
#[derive(Clone)]
pub struct PlayerServices {
    auth: AuthManager,
    achievements: AchievementManager,
    leaderboards: LeaderboardManager,
    events: EventBus,
}

impl PlayerServices {
    /// Create the service from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let events = EventBus::new(config.event_buffer);
        let session = PlayerSession::new();

        debug!(event_buffer = config.event_buffer, "player services wired");

        Self {
            auth: AuthManager::new(
                config.authentication_service,
                events.clone(),
                session.clone(),
            ),
            achievements: AchievementManager::new(
                config.achievements_service,
                config.overlay_presenter.clone(),
                events.clone(),
                session.clone(),
            ),
            leaderboards: LeaderboardManager::new(
                config.leaderboards_service,
                config.overlay_presenter,
                events.clone(),
                session,
            ),
            events,
        }
    }

    /// Subscribe to terminal events.
    ///
    /// Each subscription is independent and receives every event emitted
    /// after it was created. Hosts drain it on whatever context dispatches
    /// their own event mechanism.
    pub fn subscribe(&self) -> Receiver<ServiceEvent> {
        self.events.subscribe()
    }

    /// The bus terminal events are published on.
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    // --- Authentication -----------------------------------------------------

    /// Run the platform sign-in flow.
    /// Events: `Auth(SigninSuccess)` / `Auth(SigninFail)`.
    pub fn authenticate(&self) {
        self.auth.authenticate();
    }

    /// Whether a local player has signed in. Answered directly; no event.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Load the signed-in player's photo.
    /// Events: `Auth(PhotoLoadSuccess)` / `Auth(PhotoLoadFail)`.
    pub fn load_player_photo(&self) {
        self.auth.load_player_photo();
    }

    // --- Achievements -------------------------------------------------------

    /// Report a batch of achievement progress updates.
    /// Events: `Achievements(ReportSuccess)` / `Achievements(ReportFail)`.
    pub fn report_achievements(&self, progress: Vec<AchievementProgress>) {
        self.achievements.report_achievements(progress);
    }

    /// Remove all of the local player's achievement progress.
    /// Events: `Achievements(ResetSuccess)` / `Achievements(ResetFail)`.
    pub fn reset_achievements(&self) {
        self.achievements.reset_achievements();
    }

    /// Load the local player's achievements.
    /// Events: `Achievements(LoadSuccess)` / `Achievements(LoadFail)`.
    pub fn load_achievements(&self) {
        self.achievements.load_achievements();
    }

    /// Load the achievement description catalog.
    /// Events: `Achievements(DescriptionsLoadSuccess)` /
    /// `Achievements(DescriptionsLoadFail)`.
    pub fn load_achievement_descriptions(&self) {
        self.achievements.load_achievement_descriptions();
    }

    /// Show the achievements overlay.
    /// Events: `Overlay(Completed)` / `Overlay(Dismissed)` / `Overlay(Failed)`.
    pub fn show_achievements(&self) {
        self.achievements.show_achievements();
    }

    /// Show the overlay focused on one achievement.
    /// Events: `Overlay(Completed)` / `Overlay(Dismissed)` / `Overlay(Failed)`.
    pub fn show_achievement(&self, achievement_id: &str) {
        self.achievements.show_achievement(achievement_id);
    }

    // --- Leaderboards -------------------------------------------------------

    /// Submit a score to one or more leaderboards.
    /// Events: `Leaderboards(ScoreSubmitSuccess)` /
    /// `Leaderboards(ScoreSubmitFail)`, carrying the identifiers joined with
    /// `,` in input order.
    pub fn submit_score(&self, score: i64, context: i64, leaderboard_ids: &[String]) {
        self.leaderboards.submit_score(score, context, leaderboard_ids);
    }

    /// Show the leaderboards overlay.
    /// Events: `Overlay(Completed)` / `Overlay(Dismissed)` / `Overlay(Failed)`.
    pub fn show_leaderboards(&self) {
        self.leaderboards.show_leaderboards();
    }

    /// Show the overlay focused on one leaderboard.
    /// Events: `Overlay(Completed)` / `Overlay(Dismissed)` / `Overlay(Failed)`.
    pub fn show_leaderboard(&self, leaderboard_id: &str) {
        self.leaderboards.show_leaderboard(leaderboard_id);
    }

    /// Load a window of leaderboard entries.
    /// Events: `Leaderboards(EntriesLoadSuccess)` /
    /// `Leaderboards(EntriesLoadFail)`, carrying the leaderboard identifier.
    pub fn load_leaderboard_entries(
        &self,
        leaderboard_id: &str,
        player_scope: &str,
        time_scope: &str,
        rank_min: i64,
        rank_max: i64,
    ) {
        self.leaderboards.load_leaderboard_entries(
            leaderboard_id,
            player_scope,
            time_scope,
            rank_min,
            rank_max,
        );
    }

    /// Load the local player's entry from a leaderboard.
    /// Events: `Leaderboards(PlayerScoreLoadSuccess)` /
    /// `Leaderboards(PlayerScoreLoadFail)`.
    pub fn load_player_score(&self, leaderboard_id: &str, time_scope: &str) {
        self.leaderboards.load_player_score(leaderboard_id, time_scope);
    }
}
