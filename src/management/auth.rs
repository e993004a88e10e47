use std::{
    fmt,
    sync::{
        Arc, MutexGuard, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};

use crate::{
    error::AuthError, management::TokenStore, spotify::auth::OAuthClient, types::TokenRecord,
    warning,
};

/// Seconds before `expires_at` at which the scheduled refresh fires.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Floor for the refresh delay of records already inside the margin.
pub const MIN_REFRESH_DELAY_SECS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Expiring,
    Refreshing,
}

/// Handle to the authentication state, shared by the API client, the
/// callback server and the CLI.
///
/// Cloning is cheap; all clones see the same state and token store.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
    login_url: String,
    state: Mutex<AuthState>,
    /// Bumped by every logout; a refresh started before a logout must not
    /// save its result.
    logouts: AtomicU64,
    refresh_timer: std::sync::Mutex<Option<JoinHandle<()>>>,
    login_rx: Mutex<Option<watch::Receiver<Option<TokenRecord>>>>,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("login_url", &self.inner.login_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl AuthContext {
    pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthClient, login_url: String) -> Self {
        let state = match store.current() {
            Some(record) if record.is_stale() => AuthState::Expiring,
            Some(_) => AuthState::Authenticated,
            None => AuthState::Unauthenticated,
        };

        AuthContext {
            inner: Arc::new(Inner {
                store,
                oauth,
                login_url,
                state: Mutex::new(state),
                logouts: AtomicU64::new(0),
                refresh_timer: std::sync::Mutex::new(None),
                login_rx: Mutex::new(None),
            }),
        }
    }

    /// Schedules the refresh for the stored record and starts following
    /// store changes. The returned handle is the listener task.
    pub async fn start(&self) -> JoinHandle<()> {
        if let Some(record) = self.inner.store.current() {
            self.schedule_refresh(&record);
        }
        self.spawn_store_listener()
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.inner.oauth
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    pub fn current(&self) -> Option<TokenRecord> {
        self.inner.store.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .store
            .current()
            .is_some_and(|record| !record.is_stale())
    }

    pub async fn state(&self) -> AuthState {
        *self.inner.state.lock().await
    }

    /// Sends the user to the local `/login` endpoint in the system browser.
    pub async fn login(&self) {
        *self.inner.login_rx.lock().await = Some(self.inner.store.subscribe());
        self.set_state(AuthState::Authenticating).await;

        tracing::info!(url = %self.inner.login_url, "opening login page");
        if webbrowser::open(&self.inner.login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                self.inner.login_url
            )
        }
    }

    /// Waits until the callback writes a fresh record into the store.
    ///
    /// Only writes made after `login()` count. Returns `false` on timeout,
    /// leaving the context `Unauthenticated`.
    pub async fn wait_for_login(&self, timeout: Duration) -> bool {
        let pending = self.inner.login_rx.lock().await.take();
        let mut rx = pending.unwrap_or_else(|| self.inner.store.subscribe());

        let wait = async {
            loop {
                if rx.changed().await.is_err() {
                    return false;
                }
                if rx
                    .borrow_and_update()
                    .as_ref()
                    .is_some_and(|record| !record.is_stale())
                {
                    return true;
                }
            }
        };

        let authenticated = tokio::time::timeout(timeout, wait).await.unwrap_or(false);
        if authenticated {
            self.set_state(AuthState::Authenticated).await;
            if let Some(record) = self.inner.store.current() {
                self.schedule_refresh(&record);
            }
        } else {
            self.set_state(AuthState::Unauthenticated).await;
        }
        authenticated
    }

    /// Clears the stored record and cancels the pending refresh.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.cancel_refresh();
        self.inner.logouts.fetch_add(1, Ordering::SeqCst);
        self.set_state(AuthState::Unauthenticated).await;
        self.inner.store.clear().await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The access token to put on the next request, refreshing a stale
    /// record first.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        self.request_token().await.map(|(token, _)| token)
    }

    /// Like `access_token`, also reporting whether a refresh just produced
    /// the token.
    pub(crate) async fn request_token(&self) -> Result<(String, bool), AuthError> {
        match self.inner.store.current() {
            Some(record) if !record.is_stale() => Ok((record.access_token, false)),
            Some(_) => {
                tracing::debug!("stored access token is stale");
                self.set_state(AuthState::Expiring).await;
                self.refresh().await.map(|token| (token, true))
            }
            None => self.refresh().await.map(|token| (token, true)),
        }
    }

    /// Obtains a new access token with the stored refresh token.
    ///
    /// Any failure logs the user out.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let Some(refresh_token) = self
            .inner
            .store
            .current()
            .and_then(|record| record.refresh_token)
        else {
            self.force_logout().await;
            return Err(AuthError::NoRefreshToken);
        };

        let logouts = self.inner.logouts.load(Ordering::SeqCst);
        self.set_state(AuthState::Refreshing).await;
        let mut record = match self.inner.oauth.refresh(&refresh_token).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh rejected");
                self.force_logout().await;
                return Err(e);
            }
        };

        if record.refresh_token.is_none() {
            record.refresh_token = Some(refresh_token);
        }

        {
            // Held across the save so a concurrent logout either clears the
            // new record after it, or is seen here.
            let mut state = self.inner.state.lock().await;
            if self.inner.logouts.load(Ordering::SeqCst) != logouts {
                tracing::info!("dropping refreshed token after logout");
                return Err(AuthError::RefreshFailed(
                    "logged out while refreshing".to_string(),
                ));
            }
            if let Err(e) = self.inner.store.save(&record).await {
                drop(state);
                self.force_logout().await;
                return Err(e.into());
            }
            *state = AuthState::Authenticated;
        }

        self.schedule_refresh(&record);
        Ok(record.access_token)
    }

    /// Drops the credentials after the provider rejected a freshly
    /// refreshed token.
    pub async fn invalidate(&self) {
        tracing::warn!("provider rejected a freshly refreshed token");
        self.force_logout().await;
    }

    async fn force_logout(&self) {
        if let Err(e) = self.logout().await {
            tracing::error!(error = %e, "failed to clear token store");
        }
    }

    async fn set_state(&self, next: AuthState) {
        let mut state = self.inner.state.lock().await;
        if *state != next {
            tracing::debug!(from = ?*state, to = ?next, "auth state changed");
            *state = next;
        }
    }

    fn refresh_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .refresh_timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cancel_refresh(&self) {
        if let Some(handle) = self.refresh_timer().take() {
            handle.abort();
        }
    }

    /// Replaces the refresh timer with one firing `REFRESH_MARGIN_SECS`
    /// before the record expires. Records without a refresh token or
    /// without a known lifetime get no timer.
    fn schedule_refresh(&self, record: &TokenRecord) {
        let mut timer = self.refresh_timer();
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let (Some(expires_at), Some(_)) = (record.expires_at, record.refresh_token.as_ref()) else {
            return;
        };

        let delay = refresh_delay_secs(expires_at, Utc::now().timestamp());
        tracing::debug!(delay_secs = delay, "refresh scheduled");

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay.unsigned_abs())).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let ctx = AuthContext { inner };

            // Detached from here on; a logout during the provider call is
            // caught by `refresh` before it saves.
            drop(ctx.refresh_timer().take());

            ctx.set_state(AuthState::Expiring).await;
            if let Err(e) = ctx.refresh().await {
                tracing::warn!(error = %e, "scheduled refresh failed");
            }
        }));
    }

    /// Follows the store so writes from the callback server or from other
    /// processes update this context without a provider round trip.
    pub fn spawn_store_listener(&self) -> JoinHandle<()> {
        let mut rx = self.inner.store.subscribe();
        let weak = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let record = rx.borrow_and_update().clone();
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                AuthContext { inner }.apply_store_change(record).await;
            }
        })
    }

    async fn apply_store_change(&self, record: Option<TokenRecord>) {
        match record {
            None => {
                self.cancel_refresh();
                self.set_state(AuthState::Unauthenticated).await;
            }
            Some(record) => {
                if self.state().await != AuthState::Refreshing {
                    let next = if record.is_stale() {
                        AuthState::Expiring
                    } else {
                        AuthState::Authenticated
                    };
                    self.set_state(next).await;
                }
                self.schedule_refresh(&record);
            }
        }
    }
}

/// Delay until the scheduled refresh of a record expiring at `expires_at`:
/// `REFRESH_MARGIN_SECS` before expiry, or right away (after
/// `MIN_REFRESH_DELAY_SECS`) when that point has passed.
pub fn refresh_delay_secs(expires_at: i64, now: i64) -> i64 {
    (expires_at - now - REFRESH_MARGIN_SECS).max(MIN_REFRESH_DELAY_SECS)
}
