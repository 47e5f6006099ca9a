//! Authentication Service Abstraction
//!
//! Platform sign-in and player identity, including the local player's photo.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A player as reported by the native SDK.
///
/// This is the raw platform record; the core marshals it into its own value
/// records before anything reaches the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativePlayer {
    /// Stable platform identifier for the player.
    pub player_id: String,
    /// Name the player chose to display to other players.
    pub display_name: String,
    /// Short handle the platform shows in constrained UI.
    pub alias: String,
}

/// The signed-in local player, with the restriction flags the platform
/// attaches to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLocalPlayer {
    pub player: NativePlayer,
    /// Account is flagged as belonging to a minor.
    pub is_underage: bool,
    /// Account is barred from multiplayer features.
    pub is_multiplayer_gaming_restricted: bool,
}

/// Platform sign-in and player lookups.
///
/// `authenticate` wraps the platform's full sign-in flow, including whatever
/// interactive steps the platform itself chooses to run; the adapter resolves
/// once the flow reaches a terminal state. The SDK's completion contract is
/// trusted to fire exactly once per call — the core layers no timeout on top.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::players::AuthenticationService;
///
/// async fn sign_in(service: &dyn AuthenticationService) {
///     match service.authenticate().await {
///         Ok(local) => println!("signed in as {}", local.player.display_name),
///         Err(err) => eprintln!("sign-in failed: {}", err),
///     }
/// }
/// ```
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Run the platform sign-in flow for the local player.
    async fn authenticate(&self) -> Result<NativeLocalPlayer>;

    /// Load the photo for a player by identifier.
    ///
    /// Returns the raw encoded image bytes; the core does not decode them.
    async fn load_photo(&self, player_id: &str) -> Result<Bytes>;
}
