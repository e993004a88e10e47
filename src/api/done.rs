use axum::{extract::Query, response::Html};
use serde::Deserialize;

use crate::utils::escape_html;

#[derive(Debug, Default, Deserialize)]
pub struct DoneParams {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub async fn done(Query(params): Query<DoneParams>) -> Html<String> {
    let body = match params.error {
        None => "<h2>Authentication successful.</h2><p>You can close this window and return to the terminal.</p>".to_string(),
        Some(error) => {
            let detail = params
                .error_description
                .map(|d| format!("<p>{}</p>", escape_html(&d)))
                .unwrap_or_default();
            format!(
                "<h4>Login failed: {}</h4>{}<p>Run <code>spotiplay auth</code> to try again.</p>",
                escape_html(&error),
                detail
            )
        }
    };

    Html(format!(
        "<!doctype html><html><head><title>spotiplay</title></head><body>{body}</body></html>"
    ))
}
