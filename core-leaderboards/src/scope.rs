//! Scope and rank-window translation.
//!
//! Pure, total functions from the host-friendly request parameters to the
//! platform's query parameters. Unrecognized scope strings fall back to the
//! widest scope silently — that defaulting is part of the observable
//! contract, not an error.

use bridge_traits::leaderboards::{EntryRange, PlayerScope, TimeScope};

/// Translate a time-scope string.
///
/// Exact, case-sensitive matches on `"today"` and `"week"`; everything else
/// is all-time.
///
/// ```
/// use bridge_traits::leaderboards::TimeScope;
/// use core_leaderboards::scope::translate_time_scope;
///
/// assert_eq!(translate_time_scope("week"), TimeScope::Week);
/// assert_eq!(translate_time_scope("WEEK"), TimeScope::AllTime);
/// ```
pub fn translate_time_scope(input: &str) -> TimeScope {
    match input {
        "today" => TimeScope::Today,
        "week" => TimeScope::Week,
        _ => TimeScope::AllTime,
    }
}

/// Translate a player-scope string.
///
/// Exact match on `"friendsOnly"`; everything else is global.
pub fn translate_player_scope(input: &str) -> PlayerScope {
    match input {
        "friendsOnly" => PlayerScope::FriendsOnly,
        _ => PlayerScope::Global,
    }
}

/// Translate a 1-based inclusive rank window into the platform's
/// offset/length pair.
///
/// No bounds validation: a window with `max < min` yields a non-positive
/// length that is forwarded as-is, and the platform's own rejection surfaces
/// through the generic failure path.
pub fn translate_rank_window(min: i64, max: i64) -> EntryRange {
    EntryRange {
        offset: min,
        length: max - min + 1,
    }
}
