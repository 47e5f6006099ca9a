//! # Achievement Manager
//!
//! One request method per achievement operation; each spawns its platform
//! work and terminates in exactly one event. Reporting is batch
//! all-or-nothing, mirroring the platform's own semantics: a failure event
//! never carries per-achievement partial results.

use bridge_traits::achievements::{AchievementProgress, AchievementsService};
use bridge_traits::overlay::{OverlayOutcome, OverlayPresenter, OverlaySurface};
use core_players::PlayerSession;
use core_runtime::events::{AchievementsEvent, EventBus, OverlayEvent, ServiceEvent};
use core_runtime::fault::Fault;
use core_runtime::records::{AchievementDescriptionRecord, AchievementRecord};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates achievement progress, catalog loading, and the achievements
/// overlay.
#[derive(Clone)]
pub struct AchievementManager {
    service: Arc<dyn AchievementsService>,
    presenter: Arc<dyn OverlayPresenter>,
    events: EventBus,
    session: PlayerSession,
}

impl AchievementManager {
    pub fn new(
        service: Arc<dyn AchievementsService>,
        presenter: Arc<dyn OverlayPresenter>,
        events: EventBus,
        session: PlayerSession,
    ) -> Self {
        Self {
            service,
            presenter,
            events,
            session,
        }
    }

    /// Report a batch of progress updates.
    ///
    /// Terminal events: `Achievements(ReportSuccess)` (no payload) or
    /// `Achievements(ReportFail)`. The batch succeeds or fails as a unit.
    /// Fails synchronously with `NotAuthenticated` when nobody is signed in,
    /// without touching the platform.
    pub fn report_achievements(&self, progress: Vec<AchievementProgress>) {
        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Achievements(AchievementsEvent::ReportFail {
                code: fault.code,
                message: fault.message,
            }));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match service.report(&progress).await {
                Ok(()) => {
                    debug!(count = progress.len(), "achievement batch reported");
                    ServiceEvent::Achievements(AchievementsEvent::ReportSuccess)
                }
                Err(err) => {
                    warn!(error = %err, "achievement report failed");
                    let fault = Fault::from_sdk(&err);
                    ServiceEvent::Achievements(AchievementsEvent::ReportFail {
                        code: fault.code,
                        message: fault.message,
                    })
                }
            };
            publish(&events, event);
        });
    }

    /// Remove all of the local player's progress from the server.
    ///
    /// Terminal events: `Achievements(ResetSuccess)` or
    /// `Achievements(ResetFail)`. Precondition-checked.
    pub fn reset_achievements(&self) {
        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Achievements(AchievementsEvent::ResetFail {
                code: fault.code,
                message: fault.message,
            }));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match service.reset().await {
                Ok(()) => ServiceEvent::Achievements(AchievementsEvent::ResetSuccess),
                Err(err) => {
                    warn!(error = %err, "achievement reset failed");
                    let fault = Fault::from_sdk(&err);
                    ServiceEvent::Achievements(AchievementsEvent::ResetFail {
                        code: fault.code,
                        message: fault.message,
                    })
                }
            };
            publish(&events, event);
        });
    }

    /// Load the local player's achievements.
    ///
    /// Terminal events: `Achievements(LoadSuccess)` with the marshaled
    /// collection in platform order, or `Achievements(LoadFail)`.
    /// Precondition-checked.
    pub fn load_achievements(&self) {
        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Achievements(AchievementsEvent::LoadFail {
                code: fault.code,
                message: fault.message,
            }));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match service.load_achievements().await {
                Ok(natives) => {
                    let achievements: Vec<AchievementRecord> =
                        natives.iter().map(AchievementRecord::from).collect();
                    ServiceEvent::Achievements(AchievementsEvent::LoadSuccess { achievements })
                }
                Err(err) => {
                    warn!(error = %err, "achievement load failed");
                    let fault = Fault::from_sdk(&err);
                    ServiceEvent::Achievements(AchievementsEvent::LoadFail {
                        code: fault.code,
                        message: fault.message,
                    })
                }
            };
            publish(&events, event);
        });
    }

    /// Load the achievement description catalog.
    ///
    /// Terminal events: `Achievements(DescriptionsLoadSuccess)` or
    /// `Achievements(DescriptionsLoadFail)`. Descriptions are static catalog
    /// data, so there is no authentication precondition.
    pub fn load_achievement_descriptions(&self) {
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match service.load_descriptions().await {
                Ok(natives) => {
                    let descriptions: Vec<AchievementDescriptionRecord> = natives
                        .iter()
                        .map(AchievementDescriptionRecord::from)
                        .collect();
                    ServiceEvent::Achievements(AchievementsEvent::DescriptionsLoadSuccess {
                        descriptions,
                    })
                }
                Err(err) => {
                    warn!(error = %err, "achievement description load failed");
                    let fault = Fault::from_sdk(&err);
                    ServiceEvent::Achievements(AchievementsEvent::DescriptionsLoadFail {
                        code: fault.code,
                        message: fault.message,
                    })
                }
            };
            publish(&events, event);
        });
    }

    /// Show the platform's achievements overlay.
    ///
    /// Terminal events: `Overlay(Completed)`, `Overlay(Dismissed)`, or
    /// `Overlay(Failed)` — `NotAvailable` when this platform has no overlay
    /// surface.
    pub fn show_achievements(&self) {
        self.present(OverlaySurface::Achievements);
    }

    /// Show the overlay focused on a single achievement.
    ///
    /// Fails synchronously with `MissingIdentifier` when `achievement_id` is
    /// empty.
    pub fn show_achievement(&self, achievement_id: &str) {
        if achievement_id.is_empty() {
            let fault = Fault::missing_identifier("achievement");
            self.publish(ServiceEvent::Overlay(OverlayEvent::Failed {
                code: fault.code,
                message: fault.message,
            }));
            return;
        }
        self.present(OverlaySurface::Achievement {
            achievement_id: achievement_id.to_string(),
        });
    }

    fn present(&self, surface: OverlaySurface) {
        let presenter = Arc::clone(&self.presenter);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match presenter.present(surface).await {
                Ok(OverlayOutcome::Completed) => ServiceEvent::Overlay(OverlayEvent::Completed),
                Ok(OverlayOutcome::Dismissed) => ServiceEvent::Overlay(OverlayEvent::Dismissed),
                Err(err) => {
                    warn!(error = %err, "achievements overlay failed");
                    let fault = Fault::from_sdk(&err);
                    ServiceEvent::Overlay(OverlayEvent::Failed {
                        code: fault.code,
                        message: fault.message,
                    })
                }
            };
            publish(&events, event);
        });
    }

    fn publish(&self, event: ServiceEvent) {
        publish(&self.events, event);
    }
}

fn publish(events: &EventBus, event: ServiceEvent) {
    if events.emit(event).is_err() {
        debug!("terminal event dropped: no subscribers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_sim::{SimOp, SimOverlayOutcome, SimPlayerServices};
    use bridge_traits::achievements::NativeAchievementDescription;
    use core_players::AuthManager;
    use core_runtime::fault::FaultKind;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_event(sub: &mut core_runtime::events::Receiver<ServiceEvent>) -> ServiceEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for terminal event")
            .expect("event bus closed")
    }

    struct Fixture {
        manager: AchievementManager,
        sim: Arc<SimPlayerServices>,
        events: EventBus,
        session: PlayerSession,
    }

    fn fixture() -> Fixture {
        let sim = Arc::new(SimPlayerServices::new());
        let events = EventBus::new(16);
        let session = PlayerSession::new();
        let manager = AchievementManager::new(
            sim.clone(),
            sim.clone(),
            events.clone(),
            session.clone(),
        );
        Fixture {
            manager,
            sim,
            events,
            session,
        }
    }

    async fn sign_in(fx: &Fixture) {
        let auth = AuthManager::new(fx.sim.clone(), fx.events.clone(), fx.session.clone());
        let mut sub = fx.events.subscribe();
        auth.authenticate();
        next_event(&mut sub).await;
    }

    fn catalog_entry(id: &str) -> NativeAchievementDescription {
        NativeAchievementDescription {
            identifier: id.to_string(),
            title: id.to_uppercase(),
            description: format!("earn {}", id),
            max_points: 10,
            hidden: false,
        }
    }

    #[tokio::test]
    async fn report_while_unauthenticated_makes_no_platform_call() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager
            .report_achievements(vec![AchievementProgress::new("a1", 50.0)]);

        match next_event(&mut sub).await {
            ServiceEvent::Achievements(AchievementsEvent::ReportFail { code, .. }) => {
                assert_eq!(code, FaultKind::NotAuthenticated.code());
            }
            other => panic!("expected ReportFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::ReportAchievements), 0);
    }

    #[tokio::test]
    async fn report_round_trip_emits_bare_success() {
        let fx = fixture();
        fx.sim.seed_description(catalog_entry("a1"));
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .report_achievements(vec![AchievementProgress::new("a1", 100.0)]);

        assert_eq!(
            next_event(&mut sub).await,
            ServiceEvent::Achievements(AchievementsEvent::ReportSuccess)
        );
    }

    #[tokio::test]
    async fn report_failure_is_batch_wide() {
        let fx = fixture();
        fx.sim.seed_description(catalog_entry("a1"));
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager.report_achievements(vec![
            AchievementProgress::new("a1", 50.0),
            AchievementProgress::new("missing", 50.0),
        ]);

        match next_event(&mut sub).await {
            ServiceEvent::Achievements(AchievementsEvent::ReportFail { code, message }) => {
                assert_eq!(code, bridge_sim::SIM_ERR_UNKNOWN_ACHIEVEMENT);
                assert!(message.contains("missing"));
            }
            other => panic!("expected ReportFail, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reset_requires_authentication() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager.reset_achievements();

        match next_event(&mut sub).await {
            ServiceEvent::Achievements(AchievementsEvent::ResetFail { code, .. }) => {
                assert_eq!(code, FaultKind::NotAuthenticated.code());
            }
            other => panic!("expected ResetFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::ResetAchievements), 0);
    }

    #[tokio::test]
    async fn load_marshals_in_platform_order() {
        let fx = fixture();
        fx.sim.seed_description(catalog_entry("a1"));
        fx.sim.seed_description(catalog_entry("a2"));
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager.report_achievements(vec![
            AchievementProgress::new("a1", 100.0),
            AchievementProgress::new("a2", 40.0),
        ]);
        next_event(&mut sub).await;

        fx.manager.load_achievements();

        match next_event(&mut sub).await {
            ServiceEvent::Achievements(AchievementsEvent::LoadSuccess { achievements }) => {
                assert_eq!(achievements.len(), 2);
                assert_eq!(achievements[0].identifier, "a1");
                assert!(achievements[0].completed);
                assert_eq!(achievements[1].identifier, "a2");
                assert!(!achievements[1].completed);
            }
            other => panic!("expected LoadSuccess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn descriptions_load_without_authentication() {
        let fx = fixture();
        fx.sim.seed_description(catalog_entry("a1"));
        let mut sub = fx.events.subscribe();

        fx.manager.load_achievement_descriptions();

        match next_event(&mut sub).await {
            ServiceEvent::Achievements(AchievementsEvent::DescriptionsLoadSuccess {
                descriptions,
            }) => {
                assert_eq!(descriptions.len(), 1);
                assert_eq!(descriptions[0].identifier, "a1");
            }
            other => panic!("expected DescriptionsLoadSuccess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn overlay_dismissal_is_not_a_failure() {
        let fx = fixture();
        fx.sim.set_overlay_outcome(SimOverlayOutcome::Dismissed);
        let mut sub = fx.events.subscribe();

        fx.manager.show_achievements();

        let event = next_event(&mut sub).await;
        assert_eq!(event, ServiceEvent::Overlay(OverlayEvent::Dismissed));
        assert!(!event.is_failure());
    }

    #[tokio::test]
    async fn overlay_unavailable_maps_to_not_available() {
        let fx = fixture();
        fx.sim.set_overlay_outcome(SimOverlayOutcome::Unavailable);
        let mut sub = fx.events.subscribe();

        fx.manager.show_achievements();

        match next_event(&mut sub).await {
            ServiceEvent::Overlay(OverlayEvent::Failed { code, .. }) => {
                assert_eq!(code, FaultKind::NotAvailable.code());
            }
            other => panic!("expected Overlay Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn show_achievement_rejects_empty_identifier() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager.show_achievement("");

        match next_event(&mut sub).await {
            ServiceEvent::Overlay(OverlayEvent::Failed { code, .. }) => {
                assert_eq!(code, FaultKind::MissingIdentifier.code());
            }
            other => panic!("expected Overlay Failed, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::PresentOverlay), 0);
    }

    #[tokio::test]
    async fn show_achievement_routes_the_identifier() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager.show_achievement("first_blood");
        next_event(&mut sub).await;

        match fx.sim.last_surface() {
            Some(OverlaySurface::Achievement { achievement_id }) => {
                assert_eq!(achievement_id, "first_blood");
            }
            other => panic!("expected achievement surface, got {:?}", other),
        }
    }
}
