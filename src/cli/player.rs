use crate::{
    cli::{Session, report_api_error, search::require_login},
    error, success, utils,
};

/// Starts playback of a track given as id, URI or link.
pub async fn play(session: &Session, target: &str) {
    require_login(session);

    let Some(uri) = utils::to_track_uri(target) else {
        error!("Not a track id, URI or link: {}", target);
    };

    match session.client.play(&uri).await {
        Ok(()) => success!("Playing {}", uri),
        Err(e) => {
            report_api_error(&e);
        }
    }
}
