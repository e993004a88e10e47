use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::{error::ApiError, management::AuthContext};

/// Authenticated Spotify Web API client.
///
/// Endpoint methods live next to their domain in `tracks`, `player` and
/// `user`.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    auth: AuthContext,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, auth: AuthContext) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends a bearer-authenticated request.
    ///
    /// A call refreshes at most once. A 401 triggers one refresh and one
    /// retry of the same request, unless the token was refreshed for this
    /// call already. A 401 with a just-refreshed token drops the
    /// credentials and is returned as-is.
    pub(crate) async fn send_authorized<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let (token, refreshed) = self.auth.request_token().await?;
        let response = build(&self.http).bearer_auth(&token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if refreshed {
            self.auth.invalidate().await;
            return Ok(response);
        }

        tracing::debug!("request unauthorized, refreshing token and retrying once");
        let token = self.auth.refresh().await?;
        let response = build(&self.http).bearer_auth(&token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }
        Ok(response)
    }
}

/// Maps a non-2xx response to `ApiError::Status`.
pub(crate) fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "API request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
        })
    }
}
