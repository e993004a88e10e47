use crate::{
    cli::{Session, report_api_error, views},
    error, info, utils,
};

/// Prints the search results as a table.
pub async fn search(session: &Session, query: &str, limit: u32) {
    require_login(session);

    let query = query.trim();
    if query.is_empty() {
        error!("Search query must not be empty");
    }

    let pb = utils::spinner(&format!("Searching for \"{}\"...", query));
    let result = session.client.search_tracks(query, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) if tracks.is_empty() => info!("No songs found. Try searching for something else!"),
        Ok(tracks) => println!("{}", views::render_results(&tracks, None)),
        Err(e) => {
            report_api_error(&e);
        }
    }
}

/// Prints the detail view for one track (id, URI or open.spotify.com link).
pub async fn track(session: &Session, target: &str) {
    require_login(session);

    let Some(id) = utils::to_track_id(target) else {
        error!("Not a track id, URI or link: {}", target);
    };

    match session.client.get_track(&id).await {
        Ok(track) => println!("{}", views::render_track(&track)),
        Err(e) => {
            report_api_error(&e);
        }
    }
}

/// Exits with a hint when no token is stored at all.
pub(crate) fn require_login(session: &Session) {
    if session.auth.current().is_none() {
        error!("Not logged in. Please run spotiplay auth");
    }
}
