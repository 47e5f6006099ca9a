//! # Player Authentication
//!
//! Bridges the platform sign-in flow to the event bus and owns the single
//! authenticated-player slot every precondition check reads.
//!
//! ## Overview
//!
//! [`AuthManager`] issues the platform's sign-in flow and, on success,
//! installs the marshaled local player into the shared [`PlayerSession`].
//! The session is handed (cloned) to the other domain managers, whose
//! requests read it synchronously before touching the platform.

pub mod manager;
pub mod session;

pub use manager::AuthManager;
pub use session::PlayerSession;
