//! Async Rust client for the Microsoft Graph usage-reporting surface.
//!
//! This crate owns everything that talks HTTP: token acquisition against
//! the Microsoft identity platform ([`TokenProvider`]), transport setup
//! ([`TransportConfig`]), and the read-only Graph queries the assessment
//! pipeline consumes ([`GraphClient`]).
//!
//! The crate is deliberately thin: it returns wire-shaped [`types`] and a
//! single [`Error`] taxonomy. All aggregation and business rules live in
//! `graphly-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AccessToken, AuthMode, Credentials, DeviceCodeGrant, TokenProvider};
pub use client::{DEFAULT_BASE_URL, GraphClient};
pub use error::Error;
pub use transport::TransportConfig;
