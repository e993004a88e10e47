#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Extension, Form, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Mutex};

use spotiplay::{
    config::Config,
    management::{AuthContext, MemoryTokenStore, TokenStore},
    spotify::{SpotifyClient, auth::OAuthClient},
    types::TokenRecord,
};

pub const VALID_CODE: &str = "valid-code";
pub const VALID_REFRESH: &str = "valid-refresh";
pub const INITIAL_TOKEN: &str = "initial-token";
pub const REFRESHED_TOKEN: &str = "refreshed-token";

/// Knobs and counters of the fake accounts service and Web API.
#[derive(Debug, Default)]
pub struct ProviderState {
    pub valid_tokens: Mutex<HashSet<String>>,
    pub exchange_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub play_calls: AtomicUsize,
    pub no_active_device: AtomicBool,
    pub reject_refreshed_token: AtomicBool,
    pub search_status: Mutex<Option<u16>>,
    /// Milliseconds the refresh grant takes to answer.
    pub refresh_latency_ms: AtomicU64,
}

pub struct FakeProvider {
    pub addr: SocketAddr,
    pub state: Arc<ProviderState>,
}

impl FakeProvider {
    pub async fn start() -> Self {
        let state = Arc::new(ProviderState::default());
        let app = Router::new()
            .route("/authorize", get(|| async { "authorize" }))
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .route("/v1/tracks/{id}", get(track))
            .route("/v1/me/player/play", put(play))
            .route("/v1/me", get(me))
            .layer(Extension(Arc::clone(&state)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeProvider { addr, state }
    }

    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn accept_token(&self, token: &str) {
        self.state.valid_tokens.lock().await.insert(token.to_string());
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.state.search_calls.load(Ordering::SeqCst)
    }

    pub fn exchange_calls(&self) -> usize {
        self.state.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn config(&self, server_address: &str) -> Config {
        let base = self.base();
        let vars: HashMap<&str, String> = HashMap::from([
            ("SPOTIFY_API_AUTH_CLIENT_ID", "test-client".to_string()),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "test-secret".to_string()),
            ("SERVER_ADDRESS", server_address.to_string()),
            ("SPOTIFY_API_AUTH_URL", format!("{base}/authorize")),
            ("SPOTIFY_API_TOKEN_URL", format!("{base}/api/token")),
            ("SPOTIFY_API_URL", format!("{base}/v1")),
            ("SPOTIPLAY_TOKEN_PATH", "/nonexistent/token.json".to_string()),
        ]);
        Config::from_lookup(|var| vars.get(var).cloned()).unwrap()
    }

    /// Auth context over an in-memory store seeded with `record`.
    pub fn auth_context(&self, record: Option<TokenRecord>) -> (AuthContext, Arc<MemoryTokenStore>) {
        let config = self.config("127.0.0.1:8888");
        let store = Arc::new(MemoryTokenStore::new(record));
        let shared: Arc<dyn TokenStore> = store.clone();
        let oauth = OAuthClient::new(reqwest::Client::new(), &config);
        (
            AuthContext::new(shared, oauth, config.login_url()),
            store,
        )
    }

    pub fn client(&self, auth: &AuthContext) -> SpotifyClient {
        SpotifyClient::new(reqwest::Client::new(), format!("{}/v1", self.base()), auth.clone())
    }
}

pub fn fresh_record(access_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: Some(VALID_REFRESH.to_string()),
        token_type: "Bearer".to_string(),
        scope: Some("streaming".to_string()),
        expires_at: Some(Utc::now().timestamp() + 3600),
    }
}

pub fn record_expiring_in(access_token: &str, secs: i64) -> TokenRecord {
    TokenRecord {
        expires_at: Some(Utc::now().timestamp() + secs),
        ..fresh_record(access_token)
    }
}

pub fn stale_record(access_token: &str) -> TokenRecord {
    TokenRecord {
        expires_at: Some(Utc::now().timestamp() - 10),
        ..fresh_record(access_token)
    }
}

fn invalid_grant(description: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid_grant", "error_description": description })),
    )
        .into_response()
}

async fn token(
    Extension(state): Extension<Arc<ProviderState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            state.exchange_calls.fetch_add(1, Ordering::SeqCst);
            if form.get("code").map(String::as_str) != Some(VALID_CODE) {
                return invalid_grant("Invalid authorization code");
            }
            state
                .valid_tokens
                .lock()
                .await
                .insert(INITIAL_TOKEN.to_string());
            Json(json!({
                "access_token": INITIAL_TOKEN,
                "token_type": "Bearer",
                "scope": "streaming user-read-private",
                "expires_in": 3600,
                "refresh_token": VALID_REFRESH,
            }))
            .into_response()
        }
        Some("refresh_token") => {
            state.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let latency = state.refresh_latency_ms.load(Ordering::SeqCst);
            if latency > 0 {
                tokio::time::sleep(Duration::from_millis(latency)).await;
            }
            if form.get("refresh_token").map(String::as_str) != Some(VALID_REFRESH) {
                return invalid_grant("Refresh token revoked");
            }
            if !state.reject_refreshed_token.load(Ordering::SeqCst) {
                state
                    .valid_tokens
                    .lock()
                    .await
                    .insert(REFRESHED_TOKEN.to_string());
            }
            Json(json!({
                "access_token": REFRESHED_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        )
            .into_response(),
    }
}

async fn authorized(state: &ProviderState, headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    match value.strip_prefix("Bearer ") {
        Some(token) => state.valid_tokens.lock().await.contains(token),
        None => false,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
    )
        .into_response()
}

fn track_json(i: usize, query: &str) -> Value {
    json!({
        "id": format!("track{i}"),
        "name": format!("{query} song {i}"),
        "uri": format!("spotify:track:track{i}"),
        "duration_ms": 180_000 + i,
        "preview_url": null,
        "artists": [
            { "id": "artistA", "name": "Artist A" },
            { "id": "artistB", "name": "Artist B" }
        ],
        "album": {
            "id": "album1",
            "name": "Album One",
            "images": [
                { "url": "https://i.scdn.co/image/large", "height": 640, "width": 640 },
                { "url": "https://i.scdn.co/image/small", "height": 64, "width": 64 }
            ]
        }
    })
}

async fn search(
    Extension(state): Extension<Arc<ProviderState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.search_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(status) = *state.search_status.lock().await {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, Json(json!({ "error": { "status": status.as_u16() } }))).into_response();
    }
    if !authorized(&state, &headers).await {
        return unauthorized();
    }

    let query = params.get("q").cloned().unwrap_or_default();
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    let items: Vec<Value> = (0..limit).map(|i| track_json(i, &query)).collect();

    Json(json!({ "tracks": { "items": items, "total": 1000 } })).into_response()
}

async fn track(
    Extension(state): Extension<Arc<ProviderState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers).await {
        return unauthorized();
    }
    match id.strip_prefix("track").and_then(|i| i.parse::<usize>().ok()) {
        Some(i) => Json(track_json(i, "lookup")).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": { "status": 404 } }))).into_response(),
    }
}

async fn play(
    Extension(state): Extension<Arc<ProviderState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.play_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers).await {
        return unauthorized();
    }
    if state.no_active_device.load(Ordering::SeqCst) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "reason": "NO_ACTIVE_DEVICE" } })),
        )
            .into_response();
    }
    if body["uris"].as_array().is_none_or(|uris| uris.is_empty()) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn me(Extension(state): Extension<Arc<ProviderState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers).await {
        return unauthorized();
    }
    Json(json!({
        "id": "user1",
        "display_name": "Test User",
        "email": "test@example.com",
        "country": "DE",
        "product": "premium"
    }))
    .into_response()
}
