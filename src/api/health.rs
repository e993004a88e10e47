use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::ServerState;

pub async fn health(Extension(server): Extension<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": server.auth.is_authenticated(),
    }))
}
