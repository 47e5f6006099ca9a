//! # Core Runtime Module
//!
//! Foundational infrastructure for the player services core:
//! - The event bus and the host-facing terminal event contract
//! - Value records marshaled from native SDK records
//! - The closed error taxonomy reported on failure events
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains everything the domain crates share: the event types a
//! host consumes, the records those events carry, the numeric fault codes
//! failures are reported under, and the config builder that collects the
//! platform bridge handles.

pub mod config;
pub mod error;
pub mod events;
pub mod fault;
pub mod logging;
pub mod records;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use events::{
    AchievementsEvent, AuthEvent, EventBus, LeaderboardsEvent, OverlayEvent, ServiceEvent,
};
pub use fault::{Fault, FaultKind};
pub use records::{
    AchievementDescriptionRecord, AchievementRecord, LeaderboardEntryRecord, LocalPlayerRecord,
    PlayerRecord,
};
