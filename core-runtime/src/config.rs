//! # Core Configuration Module
//!
//! Configuration management for the player services core.
//!
//! ## Overview
//!
//! The configuration system uses a builder to collect the platform bridge
//! handles the core requires. It enforces fail-fast validation: every bridge
//! must be provided before initialization, with an actionable error naming
//! the missing capability.
//!
//! ## Required Dependencies
//!
//! - `AuthenticationService` - platform sign-in and player photos
//! - `AchievementsService` - achievement progress and catalog
//! - `LeaderboardsService` - score submission and entry paging
//! - `OverlayPresenter` - the platform's modal UI surface
//!
//! When the `sim-shims` feature is enabled, a single shared in-memory
//! simulated platform fills every slot the host did not provide, so the
//! services stay coherent with each other (the sim's authenticated player is
//! the one its leaderboards know about).
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .authentication_service(Arc::new(MyGameKitAuth))
//!     .achievements_service(Arc::new(MyGameKitAchievements))
//!     .leaderboards_service(Arc::new(MyGameKitLeaderboards))
//!     .overlay_presenter(Arc::new(MyGameKitOverlay))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    AchievementsService, AuthenticationService, LeaderboardsService, OverlayPresenter,
};
use std::sync::Arc;

/// Core configuration for the player services core.
///
/// Holds the platform bridge handles and runtime settings. Use
/// [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Platform sign-in and player photos
    pub authentication_service: Arc<dyn AuthenticationService>,

    /// Achievement progress and catalog
    pub achievements_service: Arc<dyn AchievementsService>,

    /// Score submission and entry paging
    pub leaderboards_service: Arc<dyn LeaderboardsService>,

    /// The platform's modal UI surface
    pub overlay_presenter: Arc<dyn OverlayPresenter>,

    /// Event bus buffer size per subscriber
    pub event_buffer: usize,
}

impl CoreConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    authentication_service: Option<Arc<dyn AuthenticationService>>,
    achievements_service: Option<Arc<dyn AchievementsService>>,
    leaderboards_service: Option<Arc<dyn LeaderboardsService>>,
    overlay_presenter: Option<Arc<dyn OverlayPresenter>>,
    event_buffer: Option<usize>,
}

impl CoreConfigBuilder {
    /// Set the authentication service adapter.
    pub fn authentication_service(mut self, service: Arc<dyn AuthenticationService>) -> Self {
        self.authentication_service = Some(service);
        self
    }

    /// Set the achievements service adapter.
    pub fn achievements_service(mut self, service: Arc<dyn AchievementsService>) -> Self {
        self.achievements_service = Some(service);
        self
    }

    /// Set the leaderboards service adapter.
    pub fn leaderboards_service(mut self, service: Arc<dyn LeaderboardsService>) -> Self {
        self.leaderboards_service = Some(service);
        self
    }

    /// Set the overlay presenter adapter.
    pub fn overlay_presenter(mut self, presenter: Arc<dyn OverlayPresenter>) -> Self {
        self.overlay_presenter = Some(presenter);
        self
    }

    /// Set the event bus buffer size.
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = Some(capacity);
        self
    }

    /// Build the configuration, validating all required bridges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] naming the first missing bridge
    /// when no default can fill it.
    pub fn build(self) -> Result<CoreConfig> {
        let builder = self.fill_defaults();

        let event_buffer = match builder.event_buffer {
            Some(0) => {
                return Err(Error::Config(
                    "event_buffer must be at least 1".to_string(),
                ))
            }
            Some(capacity) => capacity,
            None => DEFAULT_EVENT_BUFFER_SIZE,
        };

        Ok(CoreConfig {
            authentication_service: builder
                .authentication_service
                .ok_or_else(|| missing("AuthenticationService"))?,
            achievements_service: builder
                .achievements_service
                .ok_or_else(|| missing("AchievementsService"))?,
            leaderboards_service: builder
                .leaderboards_service
                .ok_or_else(|| missing("LeaderboardsService"))?,
            overlay_presenter: builder
                .overlay_presenter
                .ok_or_else(|| missing("OverlayPresenter"))?,
            event_buffer,
        })
    }

    /// Fill missing slots from one shared simulated platform instance.
    #[cfg(feature = "sim-shims")]
    fn fill_defaults(mut self) -> Self {
        use bridge_sim::SimPlayerServices;

        let needs_sim = self.authentication_service.is_none()
            || self.achievements_service.is_none()
            || self.leaderboards_service.is_none()
            || self.overlay_presenter.is_none();
        if !needs_sim {
            return self;
        }

        let sim = Arc::new(SimPlayerServices::new());
        if self.authentication_service.is_none() {
            self.authentication_service = Some(sim.clone());
        }
        if self.achievements_service.is_none() {
            self.achievements_service = Some(sim.clone());
        }
        if self.leaderboards_service.is_none() {
            self.leaderboards_service = Some(sim.clone());
        }
        if self.overlay_presenter.is_none() {
            self.overlay_presenter = Some(sim);
        }
        self
    }

    #[cfg(not(feature = "sim-shims"))]
    fn fill_defaults(self) -> Self {
        self
    }
}

fn missing(capability: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "No {} implementation provided. \
             Inject a platform adapter, or enable the `sim-shims` feature \
             for the in-memory simulated platform.",
            capability
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "sim-shims"))]
    #[test]
    fn build_without_bridges_names_the_missing_capability() {
        let result = CoreConfig::builder().build();
        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "AuthenticationService");
            }
            other => panic!("expected CapabilityMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(feature = "sim-shims")]
    #[test]
    fn sim_shims_fill_every_missing_slot() {
        let config = CoreConfig::builder().build().unwrap();
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn zero_event_buffer_is_rejected() {
        let result = CoreConfig::builder().event_buffer(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
