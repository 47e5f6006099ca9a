//! # Simulated Player Services Platform
//!
//! An in-memory implementation of every platform bridge trait, used as the
//! default adapter for development builds (`sim-shims` feature) and as the
//! platform double in tests.
//!
//! ## Overview
//!
//! One [`SimPlayerServices`] instance models one device: a local player, a
//! photo store, an achievement catalog with per-player progress, a set of
//! leaderboards, and an overlay surface with a scriptable outcome. All four
//! bridge traits are implemented on the same instance so the services stay
//! coherent — the player the sim authenticates is the player its leaderboards
//! rank.
//!
//! ## Test support
//!
//! - Every trait call increments a per-operation counter ([`SimPlayerServices::calls`]),
//!   so tests can assert that an operation was — or was not — issued.
//! - [`SimPlayerServices::fail_next`] scripts a one-shot failure for the next
//!   call of an operation.
//! - The last entries query and the last presented overlay surface are
//!   recorded for assertions on parameter translation.
//!
//! ## Example
//!
//! ```
//! use bridge_sim::SimPlayerServices;
//! use bridge_traits::players::NativePlayer;
//!
//! let sim = SimPlayerServices::new();
//! sim.seed_leaderboard("weekly", Some("Weekly High Scores"));
//! sim.seed_entry(
//!     "weekly",
//!     NativePlayer {
//!         player_id: "G:2".to_string(),
//!         display_name: "Rival".to_string(),
//!         alias: "rival".to_string(),
//!     },
//!     900,
//!     0,
//! );
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use bridge_traits::achievements::{
    AchievementProgress, AchievementsService, NativeAchievement, NativeAchievementDescription,
};
use bridge_traits::error::{Result, SdkError};
use bridge_traits::leaderboards::{
    EntryRange, LeaderboardPage, LeaderboardsService, NativeLeaderboard, NativeLeaderboardEntry,
    PlayerScope, TimeScope,
};
use bridge_traits::overlay::{OverlayOutcome, OverlayPresenter, OverlaySurface};
use bridge_traits::players::{AuthenticationService, NativeLocalPlayer, NativePlayer};
use bridge_traits::time::{Clock, SystemClock};

/// Native code the sim reports for an unknown achievement in a report batch.
pub const SIM_ERR_UNKNOWN_ACHIEVEMENT: i64 = -7;
/// Native code the sim reports for a missing leaderboard in a score batch.
pub const SIM_ERR_UNKNOWN_LEADERBOARD: i64 = -2;
/// Native code the sim reports for a non-positive or out-of-band entry range.
pub const SIM_ERR_INVALID_RANGE: i64 = -3;

/// The operations a sim instance counts and can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimOp {
    Authenticate,
    LoadPhoto,
    ReportAchievements,
    ResetAchievements,
    LoadAchievements,
    LoadDescriptions,
    SubmitScore,
    LoadLeaderboard,
    LoadEntries,
    PresentOverlay,
}

/// How the simulated overlay resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOverlayOutcome {
    Completed,
    Dismissed,
    /// The surface does not exist; `present` fails with `NotSupported`.
    Unavailable,
}

struct SimLeaderboard {
    identifier: String,
    title: Option<String>,
    /// Kept sorted by score descending with ranks recomputed on every write.
    entries: Vec<NativeLeaderboardEntry>,
}

struct SimState {
    local_player: NativeLocalPlayer,
    authenticated: bool,
    photos: HashMap<String, Bytes>,
    descriptions: Vec<NativeAchievementDescription>,
    achievements: Vec<NativeAchievement>,
    boards: Vec<SimLeaderboard>,
    overlay_outcome: SimOverlayOutcome,
    last_surface: Option<OverlaySurface>,
    last_entries_query: Option<(PlayerScope, TimeScope, EntryRange)>,
    fail_next: HashMap<SimOp, SdkError>,
    calls: HashMap<SimOp, usize>,
}

/// In-memory simulated platform implementing all four bridge traits.
pub struct SimPlayerServices {
    state: Mutex<SimState>,
    clock: Arc<dyn Clock>,
}

impl Default for SimPlayerServices {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPlayerServices {
    /// Create a sim with the default local player fixture and system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a sim stamping records from the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let local_player = NativeLocalPlayer {
            player: NativePlayer {
                player_id: "sim-player-1".to_string(),
                display_name: "Sim Player".to_string(),
                alias: "sim".to_string(),
            },
            is_underage: false,
            is_multiplayer_gaming_restricted: false,
        };

        Self {
            state: Mutex::new(SimState {
                local_player,
                authenticated: false,
                photos: HashMap::new(),
                descriptions: Vec::new(),
                achievements: Vec::new(),
                boards: Vec::new(),
                overlay_outcome: SimOverlayOutcome::Completed,
                last_surface: None,
                last_entries_query: None,
                fail_next: HashMap::new(),
                calls: HashMap::new(),
            }),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the local player fixture.
    pub fn set_local_player(&self, player: NativeLocalPlayer) {
        self.lock().local_player = player;
    }

    /// Store a photo for a player.
    pub fn set_photo(&self, player_id: impl Into<String>, photo: Bytes) {
        self.lock().photos.insert(player_id.into(), photo);
    }

    /// Add an achievement description to the catalog.
    pub fn seed_description(&self, description: NativeAchievementDescription) {
        self.lock().descriptions.push(description);
    }

    /// Add pre-existing achievement progress for the local player.
    pub fn seed_achievement(&self, achievement: NativeAchievement) {
        self.lock().achievements.push(achievement);
    }

    /// Create a leaderboard (or retitle an existing one).
    pub fn seed_leaderboard(&self, identifier: impl Into<String>, title: Option<&str>) {
        let identifier = identifier.into();
        let mut state = self.lock();
        if let Some(board) = state.boards.iter_mut().find(|b| b.identifier == identifier) {
            board.title = title.map(str::to_string);
        } else {
            state.boards.push(SimLeaderboard {
                identifier,
                title: title.map(str::to_string),
                entries: Vec::new(),
            });
        }
    }

    /// Record a score for a player on a leaderboard, creating the board if it
    /// does not exist. Ranks are recomputed by descending score.
    pub fn seed_entry(
        &self,
        leaderboard_id: &str,
        player: NativePlayer,
        score: i64,
        context: i64,
    ) {
        let mut state = self.lock();
        let index = match state
            .boards
            .iter()
            .position(|b| b.identifier == leaderboard_id)
        {
            Some(index) => index,
            None => {
                state.boards.push(SimLeaderboard {
                    identifier: leaderboard_id.to_string(),
                    title: None,
                    entries: Vec::new(),
                });
                state.boards.len() - 1
            }
        };
        upsert_entry(&mut state.boards[index], player, score, context);
    }

    /// Script the outcome of the next (and every following) overlay
    /// presentation.
    pub fn set_overlay_outcome(&self, outcome: SimOverlayOutcome) {
        self.lock().overlay_outcome = outcome;
    }

    /// Script a one-shot failure for the next call of `op`.
    pub fn fail_next(&self, op: SimOp, error: SdkError) {
        self.lock().fail_next.insert(op, error);
    }

    /// How many times `op` has been invoked on this instance.
    pub fn calls(&self, op: SimOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Whether the sim considers the local player signed in.
    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    /// The scope and range of the most recent entries query.
    pub fn last_entries_query(&self) -> Option<(PlayerScope, TimeScope, EntryRange)> {
        self.lock().last_entries_query
    }

    /// The most recently presented overlay surface.
    pub fn last_surface(&self) -> Option<OverlaySurface> {
        self.lock().last_surface.clone()
    }

    /// Record the call and take any scripted failure for it.
    fn enter(state: &mut SimState, op: SimOp) -> Result<()> {
        *state.calls.entry(op).or_insert(0) += 1;
        match state.fail_next.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn upsert_entry(board: &mut SimLeaderboard, player: NativePlayer, score: i64, context: i64) {
    if let Some(entry) = board
        .entries
        .iter_mut()
        .find(|e| e.player.player_id == player.player_id)
    {
        entry.score = score;
        entry.context = context;
    } else {
        board.entries.push(NativeLeaderboardEntry {
            player,
            score,
            rank: 0,
            context,
        });
    }
    board.entries.sort_by(|a, b| b.score.cmp(&a.score));
    for (index, entry) in board.entries.iter_mut().enumerate() {
        entry.rank = index as i64 + 1;
    }
}

#[async_trait]
impl AuthenticationService for SimPlayerServices {
    async fn authenticate(&self) -> Result<NativeLocalPlayer> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::Authenticate)?;
        state.authenticated = true;
        debug!(player_id = %state.local_player.player.player_id, "sim sign-in");
        Ok(state.local_player.clone())
    }

    async fn load_photo(&self, player_id: &str) -> Result<Bytes> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::LoadPhoto)?;
        state.photos.get(player_id).cloned().ok_or_else(|| {
            SdkError::OperationFailed(format!("no photo available for player {}", player_id))
        })
    }
}

#[async_trait]
impl AchievementsService for SimPlayerServices {
    async fn report(&self, progress: &[AchievementProgress]) -> Result<()> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::ReportAchievements)?;

        // All-or-nothing: validate the whole batch before applying any of it.
        for update in progress {
            if !state
                .descriptions
                .iter()
                .any(|d| d.identifier == update.identifier)
            {
                return Err(SdkError::Native {
                    code: SIM_ERR_UNKNOWN_ACHIEVEMENT,
                    description: format!("unrecognized achievement {}", update.identifier),
                });
            }
        }

        let now = self.clock.now();
        for update in progress {
            let percent = update.percent_complete.clamp(0.0, 100.0);
            if let Some(existing) = state
                .achievements
                .iter_mut()
                .find(|a| a.identifier == update.identifier)
            {
                existing.percent_complete = percent;
                existing.hidden = false;
                existing.last_reported = Some(now);
            } else {
                state.achievements.push(NativeAchievement {
                    identifier: update.identifier.clone(),
                    percent_complete: percent,
                    hidden: false,
                    last_reported: Some(now),
                });
            }
        }
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::ResetAchievements)?;
        state.achievements.clear();
        Ok(())
    }

    async fn load_achievements(&self) -> Result<Vec<NativeAchievement>> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::LoadAchievements)?;
        Ok(state.achievements.clone())
    }

    async fn load_descriptions(&self) -> Result<Vec<NativeAchievementDescription>> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::LoadDescriptions)?;
        Ok(state.descriptions.clone())
    }
}

#[async_trait]
impl LeaderboardsService for SimPlayerServices {
    async fn submit_score(
        &self,
        score: i64,
        context: i64,
        leaderboard_ids: &[String],
    ) -> Result<()> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::SubmitScore)?;

        // The batch fails as a unit when any target is missing.
        for id in leaderboard_ids {
            if !state.boards.iter().any(|b| &b.identifier == id) {
                return Err(SdkError::Native {
                    code: SIM_ERR_UNKNOWN_LEADERBOARD,
                    description: format!("no leaderboard named {}", id),
                });
            }
        }

        let player = state.local_player.player.clone();
        for id in leaderboard_ids {
            if let Some(board) = state.boards.iter_mut().find(|b| &b.identifier == id) {
                upsert_entry(board, player.clone(), score, context);
            }
        }
        Ok(())
    }

    async fn load_leaderboard(&self, leaderboard_id: &str) -> Result<Option<NativeLeaderboard>> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::LoadLeaderboard)?;
        Ok(state
            .boards
            .iter()
            .find(|b| b.identifier == leaderboard_id)
            .map(|b| NativeLeaderboard {
                identifier: b.identifier.clone(),
                title: b.title.clone(),
            }))
    }

    async fn load_entries(
        &self,
        leaderboard: &NativeLeaderboard,
        player_scope: PlayerScope,
        time_scope: TimeScope,
        range: EntryRange,
    ) -> Result<LeaderboardPage> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::LoadEntries)?;
        state.last_entries_query = Some((player_scope, time_scope, range));

        // The sim models neither a friends graph nor score history; scope is
        // recorded for assertions and applied to nothing.
        let local_id = state.local_player.player.player_id.clone();
        let board = state
            .boards
            .iter()
            .find(|b| b.identifier == leaderboard.identifier)
            .ok_or_else(|| {
                SdkError::OperationFailed(format!(
                    "stale leaderboard handle {}",
                    leaderboard.identifier
                ))
            })?;

        if range.offset < 1 || range.length < 1 {
            return Err(SdkError::Native {
                code: SIM_ERR_INVALID_RANGE,
                description: format!(
                    "invalid entry range (offset {}, length {})",
                    range.offset, range.length
                ),
            });
        }

        let window = board
            .entries
            .iter()
            .skip(range.offset as usize - 1)
            .take(range.length as usize)
            .cloned()
            .collect();

        Ok(LeaderboardPage {
            local_player_entry: board
                .entries
                .iter()
                .find(|e| e.player.player_id == local_id)
                .cloned(),
            entries: window,
            total_player_count: board.entries.len() as i64,
        })
    }
}

#[async_trait]
impl OverlayPresenter for SimPlayerServices {
    async fn present(&self, surface: OverlaySurface) -> Result<OverlayOutcome> {
        let mut state = self.lock();
        Self::enter(&mut state, SimOp::PresentOverlay)?;
        state.last_surface = Some(surface);
        match state.overlay_outcome {
            SimOverlayOutcome::Completed => Ok(OverlayOutcome::Completed),
            SimOverlayOutcome::Dismissed => Ok(OverlayOutcome::Dismissed),
            SimOverlayOutcome::Unavailable => Err(SdkError::NotSupported(
                "no overlay surface in the simulated platform".to_string(),
            )),
        }
    }
}
