use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex, time::Instant};

use crate::{api, management::AuthContext};

/// How long a `state` issued by `/login` stays valid.
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// State shared by the callback server's handlers.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub auth: AuthContext,
    pending_states: Arc<Mutex<HashMap<String, Instant>>>,
}

impl ServerState {
    pub fn new(auth: AuthContext) -> Self {
        ServerState {
            auth,
            pending_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Remembers a `state` handed out by `/login`, forgetting the ones
    /// older than `STATE_TTL`.
    pub async fn issue_state(&self, state: String) {
        let now = Instant::now();
        let mut pending = self.pending_states.lock().await;
        pending.retain(|_, issued_at| now.duration_since(*issued_at) < STATE_TTL);
        pending.insert(state, now);
    }

    /// Consumes a `state` echoed back to `/callback`. Each state is valid
    /// once and only within `STATE_TTL`.
    pub async fn take_state(&self, state: &str) -> bool {
        match self.pending_states.lock().await.remove(state) {
            Some(issued_at) => issued_at.elapsed() < STATE_TTL,
            None => false,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/done", get(api::done))
        .layer(Extension(state))
}

pub async fn start_api_server(addr: SocketAddr, state: ServerState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "callback server listening");
    }
    axum::serve(listener, router(state)).await
}
