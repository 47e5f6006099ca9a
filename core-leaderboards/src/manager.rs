//! # Leaderboard Manager
//!
//! Score submission, entry loading, and the leaderboards overlay.
//!
//! Entry loading is two-phase against the platform: resolve the leaderboard
//! handle by identifier, then page entries through the resolved handle. Each
//! phase's failure terminates the request on its own — a failed resolution
//! never issues the paging call — and both phases report under the same
//! failure event, distinguished only by message text.

use bridge_traits::leaderboards::{
    EntryRange, LeaderboardsService, NativeLeaderboard, PlayerScope, TimeScope,
};
use bridge_traits::overlay::{OverlayOutcome, OverlayPresenter, OverlaySurface};
use core_players::PlayerSession;
use core_runtime::events::{EventBus, LeaderboardsEvent, OverlayEvent, ServiceEvent};
use core_runtime::fault::{Fault, FaultKind};
use core_runtime::records::LeaderboardEntryRecord;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::scope::{translate_player_scope, translate_rank_window, translate_time_scope};

/// Orchestrates leaderboard operations.
#[derive(Clone)]
pub struct LeaderboardManager {
    service: Arc<dyn LeaderboardsService>,
    presenter: Arc<dyn OverlayPresenter>,
    events: EventBus,
    session: PlayerSession,
}

impl LeaderboardManager {
    pub fn new(
        service: Arc<dyn LeaderboardsService>,
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

    /// Submit a score to one or more leaderboards in a single call.
    ///
    /// Terminal events: `Leaderboards(ScoreSubmitSuccess)` or
    /// `Leaderboards(ScoreSubmitFail)`, both carrying the target identifiers
    /// joined with `,` in input order so the host can match the event back to
    /// the originating batch. Precondition-checked; an empty identifier list
    /// fails synchronously with `MissingIdentifier`.
    pub fn submit_score(&self, score: i64, context: i64, leaderboard_ids: &[String]) {
        let joined = leaderboard_ids.join(",");

        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::ScoreSubmitFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_ids: joined,
                },
            ));
            return;
        }

        if leaderboard_ids.is_empty() {
            let fault = Fault::missing_identifier("leaderboard");
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::ScoreSubmitFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_ids: joined,
                },
            ));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let ids = leaderboard_ids.to_vec();
        tokio::spawn(async move {
            let event = submit_score_task(service, score, context, ids, joined).await;
            publish(&events, event);
        });
    }

    /// Show the platform's leaderboards overlay.
    pub fn show_leaderboards(&self) {
        self.present(OverlaySurface::Leaderboards);
    }

    /// Show the overlay focused on a single leaderboard.
    ///
    /// Fails synchronously with `MissingIdentifier` when `leaderboard_id` is
    /// empty.
    pub fn show_leaderboard(&self, leaderboard_id: &str) {
        if leaderboard_id.is_empty() {
            let fault = Fault::missing_identifier("leaderboard");
            self.publish(ServiceEvent::Overlay(OverlayEvent::Failed {
                code: fault.code,
                message: fault.message,
            }));
            return;
        }
        self.present(OverlaySurface::Leaderboard {
            leaderboard_id: leaderboard_id.to_string(),
        });
    }

    /// Load a window of entries from a leaderboard.
    ///
    /// `player_scope` and `time_scope` are translated with the silent
    /// defaulting of [`crate::scope`]; `rank_min`/`rank_max` form a 1-based
    /// inclusive window forwarded to the platform untouched.
    ///
    /// Terminal events: `Leaderboards(EntriesLoadSuccess)` with the marshaled
    /// entries in platform rank order plus the total player count, or
    /// `Leaderboards(EntriesLoadFail)`; all carry the leaderboard identifier.
    /// An empty window is a success with an empty collection.
    pub fn load_leaderboard_entries(
        &self,
        leaderboard_id: &str,
        player_scope: &str,
        time_scope: &str,
        rank_min: i64,
        rank_max: i64,
    ) {
        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::EntriesLoadFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_id: leaderboard_id.to_string(),
                },
            ));
            return;
        }

        if leaderboard_id.is_empty() {
            let fault = Fault::missing_identifier("leaderboard");
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::EntriesLoadFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_id: String::new(),
                },
            ));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let id = leaderboard_id.to_string();
        let scope = translate_player_scope(player_scope);
        let time = translate_time_scope(time_scope);
        let range = translate_rank_window(rank_min, rank_max);
        tokio::spawn(async move {
            let event = load_entries_task(service, id, scope, time, range).await;
            publish(&events, event);
        });
    }

    /// Load the local player's own entry from a leaderboard.
    ///
    /// Always queries a single-entry window anchored at the top of the global
    /// scope; the platform reports the local player's entry alongside it. A
    /// platform success without a local-player entry is a failure (`Unknown`),
    /// not a success with an empty payload.
    pub fn load_player_score(&self, leaderboard_id: &str, time_scope: &str) {
        if !self.session.is_authenticated() {
            let fault = Fault::not_authenticated();
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::PlayerScoreLoadFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_id: leaderboard_id.to_string(),
                },
            ));
            return;
        }

        if leaderboard_id.is_empty() {
            let fault = Fault::missing_identifier("leaderboard");
            self.publish(ServiceEvent::Leaderboards(
                LeaderboardsEvent::PlayerScoreLoadFail {
                    code: fault.code,
                    message: fault.message,
                    leaderboard_id: String::new(),
                },
            ));
            return;
        }

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let id = leaderboard_id.to_string();
        let time = translate_time_scope(time_scope);
        tokio::spawn(async move {
            let event = load_player_score_task(service, id, time).await;
            publish(&events, event);
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
                    warn!(error = %err, "leaderboards overlay failed");
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

async fn submit_score_task(
    service: Arc<dyn LeaderboardsService>,
    score: i64,
    context: i64,
    ids: Vec<String>,
    joined: String,
) -> ServiceEvent {
    match service.submit_score(score, context, &ids).await {
        Ok(()) => {
            debug!(leaderboard_ids = %joined, score, "score submitted");
            ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitSuccess {
                leaderboard_ids: joined,
            })
        }
        Err(err) => {
            warn!(leaderboard_ids = %joined, error = %err, "score submission failed");
            let fault = Fault::from_sdk(&err);
            ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitFail {
                code: fault.code,
                message: fault.message,
                leaderboard_ids: joined,
            })
        }
    }
}

/// Phase one resolves the handle; phase two pages entries. Either phase's
/// failure is the request's single terminal event.
async fn load_entries_task(
    service: Arc<dyn LeaderboardsService>,
    leaderboard_id: String,
    player_scope: PlayerScope,
    time_scope: TimeScope,
    range: EntryRange,
) -> ServiceEvent {
    let leaderboard = match resolve_leaderboard(&*service, &leaderboard_id).await {
        Ok(leaderboard) => leaderboard,
        Err(fault) => {
            return ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail {
                code: fault.code,
                message: fault.message,
                leaderboard_id,
            })
        }
    };

    match service
        .load_entries(&leaderboard, player_scope, time_scope, range)
        .await
    {
        Ok(page) => {
            let entries: Vec<LeaderboardEntryRecord> = page
                .entries
                .iter()
                .map(LeaderboardEntryRecord::from)
                .collect();
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadSuccess {
                entries,
                total_player_count: page.total_player_count,
                leaderboard_id,
            })
        }
        Err(err) => {
            warn!(leaderboard_id = %leaderboard_id, error = %err, "entry paging failed");
            let fault = Fault::from_sdk(&err);
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail {
                code: fault.code,
                message: format!("error loading leaderboard entries: {}", fault.message),
                leaderboard_id,
            })
        }
    }
}

async fn load_player_score_task(
    service: Arc<dyn LeaderboardsService>,
    leaderboard_id: String,
    time_scope: TimeScope,
) -> ServiceEvent {
    let leaderboard = match resolve_leaderboard(&*service, &leaderboard_id).await {
        Ok(leaderboard) => leaderboard,
        Err(fault) => {
            return ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadFail {
                code: fault.code,
                message: fault.message,
                leaderboard_id,
            })
        }
    };

    // Single-entry window; the page's local-player entry is the payload.
    let range = EntryRange {
        offset: 1,
        length: 1,
    };
    match service
        .load_entries(&leaderboard, PlayerScope::Global, time_scope, range)
        .await
    {
        Ok(page) => match page.local_player_entry {
            Some(native) => {
                ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadSuccess {
                    entry: LeaderboardEntryRecord::from(&native),
                    leaderboard_id,
                })
            }
            None => ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadFail {
                code: FaultKind::Unknown.code(),
                message: "no score recorded for the local player".to_string(),
                leaderboard_id,
            }),
        },
        Err(err) => {
            warn!(leaderboard_id = %leaderboard_id, error = %err, "player score load failed");
            let fault = Fault::from_sdk(&err);
            ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadFail {
                code: fault.code,
                message: format!("error loading player score: {}", fault.message),
                leaderboard_id,
            })
        }
    }
}

/// The shared resolution phase. Distinguishes "the resolution call failed"
/// from "the platform answered and no such leaderboard exists" by message.
async fn resolve_leaderboard(
    service: &dyn LeaderboardsService,
    leaderboard_id: &str,
) -> Result<NativeLeaderboard, Fault> {
    match service.load_leaderboard(leaderboard_id).await {
        Ok(Some(leaderboard)) => Ok(leaderboard),
        Ok(None) => Err(Fault::new(
            FaultKind::Unknown,
            format!("no leaderboard named {}", leaderboard_id),
        )),
        Err(err) => {
            warn!(leaderboard_id = %leaderboard_id, error = %err, "leaderboard resolution failed");
            let fault = Fault::from_sdk(&err);
            Err(Fault {
                code: fault.code,
                message: format!("failed to resolve leaderboard: {}", fault.message),
            })
        }
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
    use bridge_sim::{SimOp, SimPlayerServices, SIM_ERR_INVALID_RANGE};
    use bridge_traits::error::SdkError;
    use bridge_traits::players::NativePlayer;
    use core_players::AuthManager;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_event(sub: &mut core_runtime::events::Receiver<ServiceEvent>) -> ServiceEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for terminal event")
            .expect("event bus closed")
    }

    struct Fixture {
        manager: LeaderboardManager,
        sim: Arc<SimPlayerServices>,
        events: EventBus,
        session: PlayerSession,
    }

    fn fixture() -> Fixture {
        let sim = Arc::new(SimPlayerServices::new());
        let events = EventBus::new(16);
        let session = PlayerSession::new();
        let manager = LeaderboardManager::new(
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

    fn rival(n: u32, score: i64) -> NativePlayer {
        NativePlayer {
            player_id: format!("G:{}", n),
            display_name: format!("Rival {} ({})", n, score),
            alias: format!("rival{}", n),
        }
    }

    #[tokio::test]
    async fn submit_while_unauthenticated_keeps_input_order_in_joined_ids() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        fx.manager.submit_score(100, 0, &ids);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitFail {
                code,
                leaderboard_ids,
                ..
            }) => {
                assert_eq!(code, FaultKind::NotAuthenticated.code());
                assert_eq!(leaderboard_ids, "a,b,c");
            }
            other => panic!("expected ScoreSubmitFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::SubmitScore), 0);
    }

    #[tokio::test]
    async fn submit_with_empty_id_list_is_missing_identifier() {
        let fx = fixture();
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager.submit_score(100, 0, &[]);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitFail { code, .. }) => {
                assert_eq!(code, FaultKind::MissingIdentifier.code());
            }
            other => panic!("expected ScoreSubmitFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::SubmitScore), 0);
    }

    #[tokio::test]
    async fn submit_success_echoes_the_batch() {
        let fx = fixture();
        fx.sim.seed_leaderboard("daily", None);
        fx.sim.seed_leaderboard("weekly", None);
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        let ids = vec!["daily".to_string(), "weekly".to_string()];
        fx.manager.submit_score(1200, 42, &ids);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::ScoreSubmitSuccess {
                leaderboard_ids,
            }) => {
                assert_eq!(leaderboard_ids, "daily,weekly");
            }
            other => panic!("expected ScoreSubmitSuccess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn entries_unresolved_leaderboard_emits_one_failure_without_paging() {
        let fx = fixture();
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .load_leaderboard_entries("ghost", "global", "allTime", 1, 10);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail {
                code,
                message,
                leaderboard_id,
            }) => {
                assert_eq!(code, FaultKind::Unknown.code());
                assert!(message.contains("no leaderboard named ghost"));
                assert_eq!(leaderboard_id, "ghost");
            }
            other => panic!("expected EntriesLoadFail, got {:?}", other),
        }

        // Resolution happened; the data phase never ran, and there is no
        // second event in flight.
        assert_eq!(fx.sim.calls(SimOp::LoadLeaderboard), 1);
        assert_eq!(fx.sim.calls(SimOp::LoadEntries), 0);
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn entries_resolution_error_is_distinguished_by_message() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        fx.sim.fail_next(
            SimOp::LoadLeaderboard,
            SdkError::Native {
                code: -1009,
                description: "offline".to_string(),
            },
        );
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .load_leaderboard_entries("weekly", "global", "allTime", 1, 10);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail {
                code, message, ..
            }) => {
                assert_eq!(code, -1009);
                assert!(message.contains("failed to resolve leaderboard"));
            }
            other => panic!("expected EntriesLoadFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::LoadEntries), 0);
    }

    #[tokio::test]
    async fn entries_window_and_scopes_reach_the_platform_translated() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        for n in 0..5 {
            fx.sim
                .seed_entry("weekly", rival(n, 1000 - n as i64), 1000 - n as i64, 0);
        }
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .load_leaderboard_entries("weekly", "friendsOnly", "week", 2, 4);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadSuccess {
                entries,
                total_player_count,
                leaderboard_id,
            }) => {
                assert_eq!(leaderboard_id, "weekly");
                assert_eq!(total_player_count, 5);
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[0].rank, 2);
                assert_eq!(entries[2].rank, 4);
            }
            other => panic!("expected EntriesLoadSuccess, got {:?}", other),
        }

        let (scope, time, range) = fx.sim.last_entries_query().unwrap();
        assert_eq!(scope, PlayerScope::FriendsOnly);
        assert_eq!(time, TimeScope::Week);
        assert_eq!(range.offset, 2);
        assert_eq!(range.length, 3);
    }

    #[tokio::test]
    async fn empty_window_is_success_with_platform_total() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        fx.sim.seed_entry("weekly", rival(1, 500), 500, 0);
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        // Window entirely past the last entry: platform answers, zero rows.
        fx.manager
            .load_leaderboard_entries("weekly", "global", "allTime", 10, 20);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadSuccess {
                entries,
                total_player_count,
                ..
            }) => {
                assert!(entries.is_empty());
                assert_eq!(total_player_count, 1);
            }
            other => panic!("expected EntriesLoadSuccess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn inverted_window_surfaces_the_platform_rejection() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .load_leaderboard_entries("weekly", "global", "allTime", 10, 1);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail { code, .. }) => {
                assert_eq!(code, SIM_ERR_INVALID_RANGE);
            }
            other => panic!("expected EntriesLoadFail, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn entries_empty_identifier_is_missing_identifier() {
        let fx = fixture();
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager
            .load_leaderboard_entries("", "global", "allTime", 1, 10);

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::EntriesLoadFail { code, .. }) => {
                assert_eq!(code, FaultKind::MissingIdentifier.code());
            }
            other => panic!("expected EntriesLoadFail, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::LoadLeaderboard), 0);
    }

    #[tokio::test]
    async fn player_score_round_trip() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        fx.sim.seed_entry("weekly", rival(1, 2000), 2000, 0);
        sign_in(&fx).await;

        let mut sub = fx.events.subscribe();
        fx.manager.submit_score(1200, 7, &["weekly".to_string()]);
        next_event(&mut sub).await;

        fx.manager.load_player_score("weekly", "allTime");

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadSuccess {
                entry,
                leaderboard_id,
            }) => {
                assert_eq!(leaderboard_id, "weekly");
                assert_eq!(entry.player.player_id, "sim-player-1");
                assert_eq!(entry.score, 1200);
                assert_eq!(entry.rank, 2);
                assert_eq!(entry.context, 7);
            }
            other => panic!("expected PlayerScoreLoadSuccess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn player_without_score_is_a_failure_not_an_empty_success() {
        let fx = fixture();
        fx.sim.seed_leaderboard("weekly", None);
        fx.sim.seed_entry("weekly", rival(1, 2000), 2000, 0);
        sign_in(&fx).await;
        let mut sub = fx.events.subscribe();

        fx.manager.load_player_score("weekly", "allTime");

        match next_event(&mut sub).await {
            ServiceEvent::Leaderboards(LeaderboardsEvent::PlayerScoreLoadFail {
                code,
                message,
                leaderboard_id,
            }) => {
                assert_eq!(code, FaultKind::Unknown.code());
                assert!(message.contains("no score recorded"));
                assert_eq!(leaderboard_id, "weekly");
            }
            other => panic!("expected PlayerScoreLoadFail, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn show_leaderboard_rejects_empty_identifier() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager.show_leaderboard("");

        match next_event(&mut sub).await {
            ServiceEvent::Overlay(OverlayEvent::Failed { code, .. }) => {
                assert_eq!(code, FaultKind::MissingIdentifier.code());
            }
            other => panic!("expected Overlay Failed, got {:?}", other),
        }
        assert_eq!(fx.sim.calls(SimOp::PresentOverlay), 0);
    }

    #[tokio::test]
    async fn show_leaderboards_completes() {
        let fx = fixture();
        let mut sub = fx.events.subscribe();

        fx.manager.show_leaderboards();

        assert_eq!(
            next_event(&mut sub).await,
            ServiceEvent::Overlay(OverlayEvent::Completed)
        );
        assert!(matches!(
            fx.sim.last_surface(),
            Some(OverlaySurface::Leaderboards)
        ));
    }
}
