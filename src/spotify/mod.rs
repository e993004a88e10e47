//! # Spotify Integration Module
//!
//! HTTP integration with the Spotify accounts service and the Web API.
//!
//! ## Architecture
//!
//! ```text
//! CLI / callback server
//!          ↓
//! AuthContext (token lifecycle)     SpotifyClient (bearer requests)
//!          ↓                                ↓
//!     OAuthClient  ──────────────→  accounts service (/authorize, /api/token)
//!                                   Web API (/search, /tracks, /me, /me/player/play)
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - authorize URL construction, authorization code exchange and
//!   refresh-token grants against the token endpoint. Client credentials
//!   are sent with HTTP Basic auth when a client secret is configured.
//! - [`client`] - [`SpotifyClient`] and its bounded retry: a 401 causes one
//!   refresh through the [`AuthContext`](crate::management::AuthContext)
//!   and one retry of the original request, never more.
//! - [`tracks`] - track search and lookup.
//! - [`player`] - playback control; 404 means no active device.
//! - [`user`] - the current user's profile.
//!
//! ## Error Types
//!
//! Token endpoint failures are [`AuthError`](crate::error::AuthError)s;
//! Web API failures are [`ApiError`](crate::error::ApiError)s, which wrap
//! auth failures raised while refreshing.

pub mod auth;
pub mod client;
pub mod player;
pub mod tracks;
pub mod user;

pub use client::SpotifyClient;
pub use tracks::DEFAULT_SEARCH_LIMIT;
