use reqwest::StatusCode;

use crate::{
    error::ApiError,
    spotify::client::{SpotifyClient, check_status},
    types::PlayRequest,
};

impl SpotifyClient {
    /// Starts playback of `uri` on the user's active device.
    ///
    /// The provider answers 404 when no device is active; that surfaces as
    /// `ApiError::NoActiveDevice`.
    pub async fn play(&self, uri: &str) -> Result<(), ApiError> {
        let url = self.url("/me/player/play");
        let body = PlayRequest {
            uris: vec![uri.to_string()],
        };

        let response = self
            .send_authorized(|http| http.put(&url).json(&body))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NoActiveDevice);
        }

        check_status(response)?;
        tracing::info!(uri, "playback started");
        Ok(())
    }
}
