use crate::{
    error::ApiError,
    spotify::client::{SpotifyClient, check_status},
    types::{SearchResponse, Track, TrackObject},
    utils,
};

/// Result count used when the caller does not ask for one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

impl SpotifyClient {
    /// Searches tracks matching `query`.
    ///
    /// `limit` is clamped to what the provider accepts (1..=50).
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, ApiError> {
        let url = self.url("/search");
        let limit = utils::clamp_search_limit(limit).to_string();

        let response = self
            .send_authorized(|http| {
                http.get(&url)
                    .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            })
            .await?;

        let res = check_status(response)?.json::<SearchResponse>().await?;
        tracing::debug!(query, results = res.tracks.items.len(), "search completed");
        Ok(res.tracks.items.into_iter().map(Track::from).collect())
    }

    /// Fetches a single track by id.
    pub async fn get_track(&self, id: &str) -> Result<Track, ApiError> {
        let url = self.url(&format!("/tracks/{id}"));

        let response = self.send_authorized(|http| http.get(&url)).await?;
        let track = check_status(response)?.json::<TrackObject>().await?;
        Ok(track.into())
    }
}
