use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::Config,
    error::AuthError,
    types::{ProviderError, TokenRecord, TokenResponse},
};

/// Client for the provider's authorize and token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(http: Client, config: &Config) -> Self {
        OAuthClient {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Builds the provider authorize URL for the authorization-code flow.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map(String::from)
        .map_err(|e| AuthError::TokenExchangeFailed {
            error: "invalid_authorize_url".to_string(),
            description: Some(e.to_string()),
        })
    }

    /// Exchanges an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let record = self
            .request_token(&form)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed {
                error: e.error,
                description: e.error_description,
            })?;

        if record.access_token.is_empty() {
            return Err(AuthError::TokenExchangeFailed {
                error: "empty_access_token".to_string(),
                description: None,
            });
        }

        tracing::info!(expires_at = ?record.expires_at, "authorization code exchanged");
        Ok(record)
    }

    /// Trades a refresh token for a new access token.
    ///
    /// The returned record carries no refresh token when the provider did
    /// not rotate it; callers keep the old one in that case.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, AuthError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let record = self.request_token(&form).await.map_err(|e| {
            AuthError::RefreshFailed(match e.error_description {
                Some(description) => format!("{} ({})", e.error, description),
                None => e.error,
            })
        })?;

        if record.access_token.is_empty() {
            return Err(AuthError::RefreshFailed("empty access token".to_string()));
        }

        tracing::debug!(expires_at = ?record.expires_at, "access token refreshed");
        Ok(record)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenRecord, ProviderError> {
        let mut params: Vec<(&str, &str)> = form.to_vec();
        let mut request = self.http.post(&self.token_url);
        match &self.client_secret {
            Some(secret) => request = request.basic_auth(&self.client_id, Some(secret)),
            None => params.push(("client_id", self.client_id.as_str())),
        }

        let obtained_at = Utc::now().timestamp();
        let res = request
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError {
                error: "request_failed".to_string(),
                error_description: Some(e.to_string()),
            })?;

        let status = res.status();
        if !status.is_success() {
            let mut body = res.json::<ProviderError>().await.unwrap_or_default();
            if body.error.is_empty() {
                body.error = format!("http_{}", status.as_u16());
            }
            tracing::warn!(status = status.as_u16(), error = %body.error, "token endpoint rejected request");
            return Err(body);
        }

        let token = res.json::<TokenResponse>().await.map_err(|e| ProviderError {
            error: "invalid_token_response".to_string(),
            error_description: Some(e.to_string()),
        })?;

        Ok(token.into_record(obtained_at))
    }
}
