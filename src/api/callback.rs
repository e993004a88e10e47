use axum::{Extension, extract::Query, response::Response};
use reqwest::Url;
use serde::Deserialize;

use crate::{api::login::found, error::AuthError, server::ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Completes the authorization-code flow.
///
/// The code is exchanged server-side and the resulting record written to
/// the token store; the browser then lands on `/done`, which reports any
/// failure from the query parameters.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(server): Extension<ServerState>,
) -> Response {
    match complete_login(&server, params).await {
        Ok(()) => found("/done"),
        Err(CallbackFailure::Denied(error)) => {
            tracing::warn!(%error, "authorization denied by provider");
            found(&done_url(&error, None))
        }
        Err(CallbackFailure::Auth(e)) => {
            tracing::warn!(error = %e, "login callback failed");
            let description = match &e {
                AuthError::TokenExchangeFailed { error, description } => Some(match description {
                    Some(d) => format!("{error}: {d}"),
                    None => error.clone(),
                }),
                AuthError::StateMismatch => None,
                other => Some(other.to_string()),
            };
            found(&done_url(e.code(), description.as_deref()))
        }
    }
}

enum CallbackFailure {
    /// The provider redirected back with `error` instead of a code.
    Denied(String),
    Auth(AuthError),
}

impl From<AuthError> for CallbackFailure {
    fn from(e: AuthError) -> Self {
        CallbackFailure::Auth(e)
    }
}

async fn complete_login(server: &ServerState, params: CallbackParams) -> Result<(), CallbackFailure> {
    let state = params.state.filter(|s| !s.is_empty());
    let state_known = match &state {
        Some(state) => server.take_state(state).await,
        None => false,
    };

    if let Some(error) = params.error {
        return Err(CallbackFailure::Denied(error));
    }
    if !state_known {
        return Err(AuthError::StateMismatch.into());
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(AuthError::TokenExchangeFailed {
            error: "missing_code".to_string(),
            description: None,
        }
        .into());
    };

    let record = server.auth.oauth().exchange_code(&code).await?;
    server
        .auth
        .store()
        .save(&record)
        .await
        .map_err(AuthError::from)?;

    tracing::info!("login completed, token stored");
    Ok(())
}

/// `/done` with the error encoded as query parameters.
fn done_url(error: &str, description: Option<&str>) -> String {
    let mut url = match Url::parse("http://localhost/done") {
        Ok(url) => url,
        Err(_) => return "/done".to_string(),
    };
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("error", error);
        if let Some(description) = description {
            pairs.append_pair("error_description", description);
        }
    }
    format!("/done?{}", url.query().unwrap_or_default())
}
