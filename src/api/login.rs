use axum::{
    Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{server::ServerState, utils};

/// Redirects the browser to the provider's authorize page with a fresh
/// `state`.
pub async fn login(Extension(server): Extension<ServerState>) -> Response {
    let state = utils::generate_state(utils::STATE_LENGTH);

    match server.auth.oauth().authorize_url(&state) {
        Ok(url) => {
            server.issue_state(state).await;
            found(&url)
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot build authorize URL");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
