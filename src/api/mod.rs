//! # API Module
//!
//! HTTP endpoints of the local login server.
//!
//! ## Endpoints
//!
//! - [`login`] - `GET /login`: issues a random `state` and answers `302`
//!   to the provider's authorize page.
//! - [`callback`] - `GET /callback`: checks the echoed `state`, exchanges
//!   the authorization code for a token pair and writes it into the token
//!   store. Redirects to `/done`, carrying `error` and `error_description`
//!   when something went wrong.
//! - [`done`] - `GET /done`: the page the browser ends on.
//! - [`health`] - `GET /health`: status, version and whether a valid token
//!   is stored.
//!
//! ## Flow
//!
//! Only the authorization-code flow is served: the code never leaves the
//! server and no token is ever put into a URL.
//!
//! ```rust,ignore
//! use spotiplay::server::{ServerState, router};
//!
//! let app = router(ServerState::new(auth_context));
//! ```

mod callback;
mod done;
mod health;
mod login;

pub use callback::{CallbackParams, callback};
pub use done::{DoneParams, done};
pub use health::health;
pub use login::login;
