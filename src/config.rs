//! Configuration management for spotiplay.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `<data_local_dir>/spotiplay/.env`
//! 3. Built-in defaults for everything except the client id

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "streaming user-read-email user-read-private user-library-read user-library-modify user-read-playback-state user-modify-playback-state";

/// Loads environment variables from `<data_local_dir>/spotiplay/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error:
/// the variables may come from the real environment instead.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// `<data_local_dir>/spotiplay`, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotiplay");
    path
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: SocketAddr,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub token_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let server_address_raw =
            get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_address =
            SocketAddr::from_str(&server_address_raw).map_err(|e| ConfigError::Invalid {
                var: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let client_id =
            get("SPOTIFY_API_AUTH_CLIENT_ID").ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        let redirect_uri = get("SPOTIFY_API_REDIRECT_URI")
            .unwrap_or_else(|| format!("http://{server_address}/callback"));

        Ok(Config {
            server_address,
            client_id,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token_path: get("SPOTIPLAY_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_token_path),
        })
    }

    /// The local URL that starts the login flow.
    pub fn login_url(&self) -> String {
        format!("http://{}/login", self.server_address)
    }
}

fn default_token_path() -> PathBuf {
    data_dir().join("cache").join("token.json")
}
