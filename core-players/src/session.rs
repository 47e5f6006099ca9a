//! The authenticated-player slot.

use core_runtime::records::LocalPlayerRecord;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared slot holding the currently authenticated local player.
///
/// This is the only state shared across requests. Precondition checks and
/// `is_authenticated` read it; the sole writer is the authenticate
/// operation's success path, so a plain `RwLock` with short, non-blocking
/// accesses is sufficient. Clones share the same slot.
#[derive(Clone, Default)]
pub struct PlayerSession {
    inner: Arc<RwLock<Option<LocalPlayerRecord>>>,
}

impl PlayerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a local player is currently signed in.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Snapshot of the signed-in local player, if any.
    pub fn local_player(&self) -> Option<LocalPlayerRecord> {
        self.read()
    }

    /// Install the signed-in player.
    ///
    /// Written only by the authenticate success path; later sign-ins replace
    /// the slot.
    pub fn install(&self, player: LocalPlayerRecord) {
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(player);
    }

    fn read(&self) -> Option<LocalPlayerRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_runtime::records::PlayerRecord;

    fn player() -> LocalPlayerRecord {
        LocalPlayerRecord {
            player: PlayerRecord {
                player_id: "G:1".to_string(),
                display_name: "Avid".to_string(),
                alias: "avid".to_string(),
                photo: None,
            },
            is_underage: false,
            is_multiplayer_gaming_restricted: false,
        }
    }

    #[test]
    fn starts_signed_out() {
        let session = PlayerSession::new();
        assert!(!session.is_authenticated());
        assert!(session.local_player().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let session = PlayerSession::new();
        let view = session.clone();

        session.install(player());

        assert!(view.is_authenticated());
        assert_eq!(view.local_player().unwrap().player.player_id, "G:1");
    }
}
