//! # Leaderboards
//!
//! Bridges score submission, entry loading, and the leaderboards overlay
//! onto the event bus, translating host-friendly scope strings and 1-based
//! rank windows into the platform's query parameters.

pub mod manager;
pub mod scope;

pub use manager::LeaderboardManager;
pub use scope::{translate_player_scope, translate_rank_window, translate_time_scope};
