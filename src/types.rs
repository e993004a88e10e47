use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// The persisted OAuth credentials.
///
/// `expires_at` is a Unix timestamp in seconds; `None` means the provider
/// did not report a lifetime and the record never goes stale by time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    pub fn is_stale_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now().timestamp())
    }

    /// Seconds until the record goes stale, or `None` for an unknown lifetime.
    pub fn remaining_secs(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|expires_at| expires_at - now)
    }
}

/// Token endpoint success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    pub fn into_record(self, obtained_at: i64) -> TokenRecord {
        TokenRecord {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            scope: self.scope,
            expires_at: self.expires_in.map(|secs| obtained_at + secs),
        }
    }
}

/// Token endpoint error body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// A track as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// All artist names joined with `", "`.
    pub artist: String,
    pub artists: Vec<String>,
    pub album: String,
    /// First album image, empty when the album has none.
    pub image: String,
    pub uri: String,
    pub duration_ms: u64,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<TrackObject>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    pub artists: Vec<ArtistObject>,
    pub album: AlbumObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

impl From<TrackObject> for Track {
    fn from(track: TrackObject) -> Self {
        let artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
        Track {
            id: track.id,
            name: track.name,
            artist: artists.join(", "),
            artists,
            album: track.album.name,
            image: track
                .album
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_default(),
            uri: track.uri,
            duration_ms: track.duration_ms,
            preview_url: track.preview_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
}

impl TrackTableRow {
    pub fn new(index: usize, track: &Track) -> Self {
        TrackTableRow {
            index,
            name: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration: utils::format_duration(track.duration_ms),
        }
    }
}
