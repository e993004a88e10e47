use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    cli::Session, error, info, management::AuthState, server::ServerState,
    server::start_api_server, success, utils, warning,
};

/// How long `auth` waits for the browser round trip.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the browser login: starts the login server, opens `/login` and
/// waits for the callback to store a token.
pub async fn auth(session: &Session) {
    let addr = session.config.server_address;
    let server_state = ServerState::new(session.auth.clone());
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(addr, server_state).await {
            tracing::error!(error = %e, %addr, "login server stopped");
        }
    });

    // Give the listener a moment to bind before the browser hits it.
    tokio::time::sleep(Duration::from_millis(200)).await;
    if server.is_finished() {
        error!("Cannot start login server on {}", addr);
    }

    session.auth.login().await;

    let pb = utils::spinner("Waiting for login in the browser...");
    let authenticated = session.auth.wait_for_login(LOGIN_TIMEOUT).await;
    pb.finish_and_clear();
    server.abort();

    if !authenticated {
        error!("Authentication failed or timed out.");
    }

    match session.client.current_user().await {
        Ok(user) => success!(
            "Authentication successful! Logged in as {}",
            user.display_name.unwrap_or(user.id)
        ),
        Err(e) => {
            success!("Authentication successful!");
            warning!("Could not load your profile: {}", e);
        }
    }
}

pub async fn logout(session: &Session) {
    match session.auth.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to clear stored token: {}", e),
    }
}

/// Prints whether a token is stored and when it expires.
pub async fn status(session: &Session) {
    let Some(record) = session.auth.current() else {
        info!("Not logged in. Run spotiplay auth");
        return;
    };

    let now = Utc::now().timestamp();
    let expiry = match record.expires_at {
        Some(ts) => DateTime::<Utc>::from_timestamp(ts, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| ts.to_string()),
        None => "unknown".to_string(),
    };

    match session.auth.state().await {
        AuthState::Authenticated => success!("Logged in, token valid until {}", expiry),
        AuthState::Expiring if record.refresh_token.is_some() => {
            info!("Token expired at {}, it is refreshed on next use", expiry)
        }
        state => warning!("Token state {:?}, expired at {}", state, expiry),
    }

    if let Some(remaining) = record.remaining_secs(now).filter(|r| *r > 0) {
        info!("{} minutes left", remaining / 60);
    }
    if let Some(scope) = &record.scope {
        info!("Scope: {}", scope);
    }
    info!("Token file: {}", session.store.path().display());
}
