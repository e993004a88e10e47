//! # CLI Module
//!
//! Command implementations for spotiplay and the terminal views they print.
//!
//! ## Commands
//!
//! - [`auth`] / [`logout`] / [`status`] - the login lifecycle
//! - [`search`] / [`track`] - result list and detail view
//! - [`play`] - start playback on the active device
//! - [`me`] - the logged-in user's profile
//! - [`browse`] - interactive search, selection and playback
//! - [`serve`] - run the login server in the foreground
//!
//! Every command receives a [`Session`]: the resolved configuration plus
//! the auth context and API client built from it. Failures are printed
//! with the output macros; auth failures end the process with a hint to
//! log in again, playback and search failures do not.

use std::{sync::Arc, time::Duration};

use reqwest::Client;

use crate::{
    Res,
    config::Config,
    error::ApiError,
    management::{AuthContext, FileTokenStore, TokenStore},
    spotify::{SpotifyClient, auth::OAuthClient},
    warning,
};

mod auth;
mod browse;
mod player;
mod search;
mod serve;
mod user;
pub mod views;

pub use auth::auth;
pub use auth::logout;
pub use auth::status;
pub use browse::BrowseCommand;
pub use browse::browse;
pub use player::play;
pub use search::search;
pub use search::track;
pub use serve::serve;
pub use user::me;

/// How often a long-running command re-reads the token file for changes
/// made by other spotiplay processes.
pub const STORE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Everything a command needs, built once from the configuration.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub store: Arc<FileTokenStore>,
    pub auth: AuthContext,
    pub client: SpotifyClient,
}

impl Session {
    pub async fn open(config: Config) -> Res<Self> {
        let store = Arc::new(FileTokenStore::open(config.token_path.clone()).await?);
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let oauth = OAuthClient::new(http.clone(), &config);
        let shared_store: Arc<dyn TokenStore> = store.clone();
        let auth = AuthContext::new(shared_store, oauth, config.login_url());
        let client = SpotifyClient::new(http, config.api_url.clone(), auth.clone());

        Ok(Session {
            config,
            store,
            auth,
            client,
        })
    }
}

/// Prints an API failure. Returns `true` when the failure ended the login,
/// in which case the caller should stop.
pub(crate) fn report_api_error(e: &ApiError) -> bool {
    match e {
        ApiError::NoActiveDevice => {
            warning!("{}", e);
            false
        }
        ApiError::Auth(auth_error) => {
            warning!(
                "Authentication lost: {}\nPlease run spotiplay auth",
                auth_error
            );
            true
        }
        rejected if rejected.is_unauthorized() => {
            warning!("Spotify rejected the credentials. Please run spotiplay auth");
            true
        }
        other => {
            warning!("Request failed: {}", other);
            false
        }
    }
}
