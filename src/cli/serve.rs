use crate::{
    cli::{STORE_POLL_INTERVAL, Session},
    error, info,
    server::{ServerState, start_api_server},
};

/// Runs the login server in the foreground until it fails or the process
/// is interrupted.
pub async fn serve(session: &Session) {
    let watcher = session.store.watch(STORE_POLL_INTERVAL);
    let listener = session.auth.start().await;

    info!("Login server on http://{}", session.config.server_address);
    info!("Open {} to log in", session.config.login_url());

    let result = start_api_server(
        session.config.server_address,
        ServerState::new(session.auth.clone()),
    )
    .await;

    watcher.abort();
    listener.abort();
    if let Err(e) = result {
        error!("Login server stopped: {}", e);
    }
}
