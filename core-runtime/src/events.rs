//! # Event Bus System
//!
//! The host-facing notification surface, built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Every request issued on the service façade terminates in exactly one event
//! published here: a success variant carrying marshaled records, or a failure
//! variant carrying a numeric code from the error taxonomy plus a diagnostic
//! message and the identifier(s) of the originating request. Hosts subscribe
//! once and dispatch the variants through their own signal/event mechanism,
//! draining the subscription on whatever context their UI expects.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     emit      ┌───────────┐
//! │ Auth Manager ├──────────────>│           │
//! └──────────────┘               │           │
//!                                │ EventBus  │
//! ┌──────────────┐     emit      │ (broadcast│     subscribe    ┌────────────┐
//! │ Achievements ├──────────────>│  channel) ├─────────────────>│ Host       │
//! └──────────────┘               │           │                  └────────────┘
//!                                │           │
//! ┌──────────────┐     emit      │           │
//! │ Leaderboards ├──────────────>│           │
//! └──────────────┘               └───────────┘
//! ```
//!
//! ## Delivery contract
//!
//! Emission is intended-exactly-once per request: every operation has a
//! single emission site and either spawns once or fails its precondition
//! synchronously. A subscriber that falls behind the channel buffer receives
//! `RecvError::Lagged` and has genuinely missed events — size the buffer for
//! the request volume the host generates.
//!
//! ## Correlation
//!
//! Requests may be outstanding concurrently. Events that can be ambiguous
//! carry the identifying parameter of their request (the leaderboard
//! identifier, the joined identifier list, the player identifier) so the host
//! can match an event to the request that caused it — including events for
//! requests it has logically abandoned, which it should ignore.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use crate::records::{
    AchievementDescriptionRecord, AchievementRecord, LeaderboardEntryRecord, LocalPlayerRecord,
};

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event families.
///
/// This is the type published and received through the event bus. Hosts
/// typically match on the family first and fan variants out to their own
/// named signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum ServiceEvent {
    /// Sign-in and player identity events
    Auth(AuthEvent),
    /// Achievement progress and catalog events
    Achievements(AchievementsEvent),
    /// Score submission and entry loading events
    Leaderboards(LeaderboardsEvent),
    /// Modal overlay presentation events (shared by the achievements and
    /// leaderboards UI surfaces)
    Overlay(OverlayEvent),
}

impl ServiceEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            ServiceEvent::Auth(e) => e.description(),
            ServiceEvent::Achievements(e) => e.description(),
            ServiceEvent::Leaderboards(e) => e.description(),
            ServiceEvent::Overlay(e) => e.description(),
        }
    }

    /// Whether this is a failure event.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ServiceEvent::Auth(AuthEvent::SigninFail { .. })
                | ServiceEvent::Auth(AuthEvent::PhotoLoadFail { .. })
                | ServiceEvent::Achievements(AchievementsEvent::ReportFail { .. })
                | ServiceEvent::Achievements(AchievementsEvent::ResetFail { .. })
                | ServiceEvent::Achievements(AchievementsEvent::LoadFail { .. })
                | ServiceEvent::Achievements(AchievementsEvent::DescriptionsLoadFail { .. })
                | ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitFail { .. })
                | ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail { .. })
                | ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadFail { .. })
                | ServiceEvent::Overlay(OverlayEvent::Failed { .. })
        )
    }
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events terminating sign-in and player identity requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// The local player signed in; the marshaled player is attached.
    SigninSuccess { player: LocalPlayerRecord },
    /// Sign-in failed.
    SigninFail { code: i64, message: String },
    /// The local player's photo loaded.
    PhotoLoadSuccess {
        player_id: String,
        /// Raw encoded image bytes, as the platform supplied them.
        photo: Vec<u8>,
    },
    /// The local player's photo could not be loaded.
    PhotoLoadFail {
        code: i64,
        message: String,
        player_id: String,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SigninSuccess { .. } => "Player signed in",
            AuthEvent::SigninFail { .. } => "Sign-in failed",
            AuthEvent::PhotoLoadSuccess { .. } => "Player photo loaded",
            AuthEvent::PhotoLoadFail { .. } => "Player photo load failed",
        }
    }
}

// ============================================================================
// Achievement Events
// ============================================================================

/// Events terminating achievement requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum AchievementsEvent {
    /// The progress batch was accepted in full.
    ReportSuccess,
    /// The progress batch was rejected as a unit; no per-item results exist.
    ReportFail { code: i64, message: String },
    /// The local player's progress was removed from the server.
    ResetSuccess,
    /// Reset failed.
    ResetFail { code: i64, message: String },
    /// The local player's achievements, in platform-returned order.
    LoadSuccess { achievements: Vec<AchievementRecord> },
    /// Achievement loading failed.
    LoadFail { code: i64, message: String },
    /// The description catalog, in platform-returned order.
    DescriptionsLoadSuccess {
        descriptions: Vec<AchievementDescriptionRecord>,
    },
    /// Description catalog loading failed.
    DescriptionsLoadFail { code: i64, message: String },
}

impl AchievementsEvent {
    fn description(&self) -> &str {
        match self {
            AchievementsEvent::ReportSuccess => "Achievements reported",
            AchievementsEvent::ReportFail { .. } => "Achievement report failed",
            AchievementsEvent::ResetSuccess => "Achievements reset",
            AchievementsEvent::ResetFail { .. } => "Achievement reset failed",
            AchievementsEvent::LoadSuccess { .. } => "Achievements loaded",
            AchievementsEvent::LoadFail { .. } => "Achievement load failed",
            AchievementsEvent::DescriptionsLoadSuccess { .. } => "Achievement descriptions loaded",
            AchievementsEvent::DescriptionsLoadFail { .. } => {
                "Achievement description load failed"
            }
        }
    }
}

// ============================================================================
// Leaderboard Events
// ============================================================================

/// Events terminating leaderboard requests.
///
/// Score events carry the originating identifiers joined with `,` in input
/// order; load events carry the single originating leaderboard identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum LeaderboardsEvent {
    /// The score batch was accepted by every target leaderboard.
    ScoreSubmitSuccess { leaderboard_ids: String },
    /// The score batch was rejected.
    ScoreSubmitFail {
        code: i64,
        message: String,
        leaderboard_ids: String,
    },
    /// A window of entries loaded, in platform-returned rank order. An empty
    /// window is a success, not a failure.
    EntriesLoadSuccess {
        entries: Vec<LeaderboardEntryRecord>,
        total_player_count: i64,
        leaderboard_id: String,
    },
    /// Entry loading failed — in either the handle-resolution phase or the
    /// paging phase; the message distinguishes which.
    EntriesLoadFail {
        code: i64,
        message: String,
        leaderboard_id: String,
    },
    /// The local player's own entry loaded.
    PlayerScoreLoadSuccess {
        entry: LeaderboardEntryRecord,
        leaderboard_id: String,
    },
    /// The local player's entry could not be loaded — including the case
    /// where the platform answered but the player has no score recorded.
    PlayerScoreLoadFail {
        code: i64,
        message: String,
        leaderboard_id: String,
    },
}

impl LeaderboardsEvent {
    fn description(&self) -> &str {
        match self {
            LeaderboardsEvent::ScoreSubmitSuccess { .. } => "Score submitted",
            LeaderboardsEvent::ScoreSubmitFail { .. } => "Score submission failed",
            LeaderboardsEvent::EntriesLoadSuccess { .. } => "Leaderboard entries loaded",
            LeaderboardsEvent::EntriesLoadFail { .. } => "Leaderboard entry load failed",
            LeaderboardsEvent::PlayerScoreLoadSuccess { .. } => "Player score loaded",
            LeaderboardsEvent::PlayerScoreLoadFail { .. } => "Player score load failed",
        }
    }
}

// ============================================================================
// Overlay Events
// ============================================================================

/// Events terminating overlay presentation requests.
///
/// Both the achievements UI and the leaderboards UI report through this one
/// family. Dismissal is its own outcome — the player closing the overlay is
/// not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum OverlayEvent {
    /// The overlay was shown and the player completed it.
    Completed,
    /// The overlay was shown and the player dismissed it.
    Dismissed,
    /// The overlay could not be shown.
    Failed { code: i64, message: String },
}

impl OverlayEvent {
    fn description(&self) -> &str {
        match self {
            OverlayEvent::Completed => "Overlay completed",
            OverlayEvent::Dismissed => "Overlay dismissed",
            OverlayEvent::Failed { .. } => "Overlay failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to terminal events.
///
/// Uses `tokio::sync::broadcast` internally:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned per subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServiceEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when nobody is listening.
    pub fn emit(&self, event: ServiceEvent) -> Result<usize, SendError<ServiceEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber receiving all future events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<ServiceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fail() -> ServiceEvent {
        ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail {
            code: 1,
            message: "no leaderboard named weekly".to_string(),
            leaderboard_id: "weekly".to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(sample_fail()).is_err());
    }

    #[tokio::test]
    async fn test_event_emission_with_subscribers() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        let event = ServiceEvent::Overlay(OverlayEvent::Dismissed);
        let result = bus.emit(event.clone());
        assert_eq!(result.unwrap(), 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = ServiceEvent::Achievements(AchievementsEvent::ResetSuccess);
        bus.emit(event.clone()).ok();

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.emit(ServiceEvent::Overlay(OverlayEvent::Completed)).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_failure_classification() {
        assert!(sample_fail().is_failure());
        assert!(!ServiceEvent::Overlay(OverlayEvent::Dismissed).is_failure());
        assert!(!ServiceEvent::Achievements(AchievementsEvent::ReportSuccess).is_failure());
    }

    #[test]
    fn test_event_description() {
        let event = ServiceEvent::Overlay(OverlayEvent::Dismissed);
        assert_eq!(event.description(), "Overlay dismissed");
    }

    #[test]
    fn test_event_serialization() {
        let event = ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitFail {
            code: 2,
            message: "player is not authenticated".to_string(),
            leaderboard_ids: "a,b,c".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("a,b,c"));

        let deserialized: ServiceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for _ in 0..10 {
                bus1.emit(ServiceEvent::Overlay(OverlayEvent::Completed)).ok();
            }
        });
        let handle2 = tokio::spawn(async move {
            for _ in 0..10 {
                bus2.emit(ServiceEvent::Achievements(AchievementsEvent::ReportSuccess))
                    .ok();
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while sub.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }
}
