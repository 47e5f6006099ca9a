//! # Authentication Manager
//!
//! Bridges platform sign-in and player photos onto the event bus.
//!
//! ## Overview
//!
//! Requests return immediately; the platform work runs on a spawned task
//! that captures owned handles to the SDK adapter, the event bus, and the
//! session at issue time. Each request terminates in exactly one event: the
//! async body returns its terminal [`ServiceEvent`] and the spawning wrapper
//! emits it at a single call site.
//!
//! ## Usage
//!
//! ```no_run
//! use bridge_sim::SimPlayerServices;
//! use core_players::{AuthManager, PlayerSession};
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let events = EventBus::new(100);
//! let session = PlayerSession::new();
//! let manager = AuthManager::new(Arc::new(SimPlayerServices::new()), events.clone(), session);
//!
//! let mut subscriber = events.subscribe();
//! manager.authenticate();
//! // subscriber.recv().await yields SigninSuccess or SigninFail
//! # }
//! ```

use bridge_traits::players::AuthenticationService;
use core_runtime::events::{AuthEvent, EventBus, ServiceEvent};
use core_runtime::fault::Fault;
use core_runtime::records::LocalPlayerRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::session::PlayerSession;

/// Orchestrates sign-in and player photo loading.
#[derive(Clone)]
pub struct AuthManager {
    service: Arc<dyn AuthenticationService>,
    events: EventBus,
    session: PlayerSession,
}

impl AuthManager {
    /// Creates a new authentication manager.
    ///
    /// # Arguments
    ///
    /// * `service` - Platform sign-in adapter
    /// * `events` - Event bus terminal events are published on
    /// * `session` - The shared authenticated-player slot this manager writes
    pub fn new(
        service: Arc<dyn AuthenticationService>,
        events: EventBus,
        session: PlayerSession,
    ) -> Self {
        Self {
            service,
            events,
            session,
        }
    }

    /// Run the platform sign-in flow.
    ///
    /// Terminal events: `Auth(SigninSuccess)` with the marshaled local
    /// player, or `Auth(SigninFail)`. This is the operation that establishes
    /// authentication, so there is no precondition check.
    pub fn authenticate(&self) {
        let service = Arc::clone(&self.service);
        let session = self.session.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = authenticate_task(service, session).await;
            publish(&events, event);
        });
    }

    /// Whether a local player has signed in. Answered directly; no event.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Load the signed-in local player's photo.
    ///
    /// Terminal events: `Auth(PhotoLoadSuccess)` with the raw image bytes,
    /// or `Auth(PhotoLoadFail)` carrying `FailedToLoadPicture`. Fails
    /// synchronously with `NotAuthenticated` when nobody is signed in.
    pub fn load_player_photo(&self) {
        let Some(local) = self.session.local_player() else {
            let fault = Fault::not_authenticated();
            publish(
                &self.events,
                ServiceEvent::Auth(AuthEvent::PhotoLoadFail {
                    code: fault.code,
                    message: fault.message,
                    player_id: String::new(),
                }),
            );
            return;
        };

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let player_id = local.player.player_id;
        tokio::spawn(async move {
            let event = load_photo_task(service, player_id).await;
            publish(&events, event);
        });
    }
}

async fn authenticate_task(
    service: Arc<dyn AuthenticationService>,
    session: PlayerSession,
) -> ServiceEvent {
    match service.authenticate().await {
        Ok(native) => {
            let player = LocalPlayerRecord::from(&native);
            session.install(player.clone());
            info!(player_id = %core_runtime::logging::redact_player_id(&player.player.player_id),
                  "player signed in");
            ServiceEvent::Auth(AuthEvent::SigninSuccess { player })
        }
        Err(err) => {
            warn!(error = %err, "sign-in failed");
            let fault = Fault::from_authentication(&err);
            ServiceEvent::Auth(AuthEvent::SigninFail {
                code: fault.code,
                message: fault.message,
            })
        }
    }
}

async fn load_photo_task(
    service: Arc<dyn AuthenticationService>,
    player_id: String,
) -> ServiceEvent {
    match service.load_photo(&player_id).await {
        Ok(photo) => {
            debug!(bytes = photo.len(), "player photo loaded");
            ServiceEvent::Auth(AuthEvent::PhotoLoadSuccess {
                player_id,
                photo: photo.to_vec(),
            })
        }
        Err(err) => {
            warn!(error = %err, "player photo load failed");
            let fault = Fault::from_photo_load(&err);
            ServiceEvent::Auth(AuthEvent::PhotoLoadFail {
                code: fault.code,
                message: fault.message,
                player_id,
            })
        }
    }
}

fn publish(events: &EventBus, event: ServiceEvent) {
    if events.emit(event).is_err() {
        debug!("terminal event dropped: no subscribers");
    }
}
