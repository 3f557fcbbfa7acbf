use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::config::SSO_LOGIN_PATH;
use crate::session::config::{LOGOUT_PATH, ME_PATH};
use crate::session::errors::SessionError;
use crate::session::types::{ApiRequest, RedirectHook, SessionState, TokenPair};
use crate::users::User;

/// Client-side session manager for the SSO backend.
///
/// Owns the access/refresh token pair and the profile snapshot derived from
/// it, and exposes the authenticated-request primitives every screen uses
/// instead of raw HTTP calls. Cloning is cheap; clones share the same state,
/// so concurrent calls across clones coordinate on a single refresh.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    pub(crate) http: Client,
    pub(crate) base_url: Url,
    pub(crate) state: RwLock<SessionState>,
    /// Serializes refresh attempts for this session; concurrent auth
    /// rejections queue here instead of issuing duplicate refresh calls.
    pub(crate) refresh_gate: Mutex<()>,
    pub(crate) on_session_expired: Option<RedirectHook>,
}

pub struct SessionBuilder {
    base_url: String,
    on_session_expired: Option<RedirectHook>,
}

impl SessionBuilder {
    /// Registers the hook invoked with the login redirect target whenever
    /// the session becomes unrecoverable.
    pub fn on_session_expired(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<Session, SessionError> {
        let base_url =
            Url::parse(&self.base_url).map_err(|e| SessionError::Url(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| SessionError::Network(e.to_string()))?;

        Ok(Session {
            inner: Arc::new(SessionInner {
                http,
                base_url,
                state: RwLock::new(SessionState::default()),
                refresh_gate: Mutex::new(()),
                on_session_expired: self.on_session_expired,
            }),
        })
    }
}

impl Session {
    pub fn builder(base_url: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            base_url: base_url.into(),
            on_session_expired: None,
        }
    }

    pub fn new(base_url: &str) -> Result<Self, SessionError> {
        Self::builder(base_url).build()
    }

    /// Builds a session from SSO_BASE_URL, honoring a .env file if present.
    pub fn from_env() -> Result<Self, SessionError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("SSO_BASE_URL")
            .map_err(|_| SessionError::Url("SSO_BASE_URL is not set".to_string()))?;
        Self::new(&base_url)
    }

    /// Starts the session from a freshly issued token pair.
    ///
    /// The profile snapshot follows as a derived effect of the token change;
    /// a pair that cannot fetch its own profile tears the session back down.
    pub async fn login(
        &self,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.install_tokens(TokenPair {
            access: access.into(),
            refresh: refresh.into(),
        })
        .await
    }

    /// Invalidates the server-side session (best effort) and clears every
    /// session field locally regardless of what the backend answered.
    pub async fn logout(&self) {
        let access = { self.inner.state.read().await.access.clone() };

        if let Some(access) = access {
            match self
                .dispatch(&ApiRequest::post(LOGOUT_PATH), Some(&access))
                .await
            {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("server session invalidated");
                }
                Ok(response) => {
                    tracing::warn!(
                        status = %response.status(),
                        "logout endpoint rejected the call, clearing locally anyway"
                    );
                }
                Err(e) => {
                    tracing::warn!("logout request failed: {e}, clearing locally anyway");
                }
            }
        }

        self.clear_session().await;
        self.signal_session_expired(None);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.access.is_some()
    }

    /// Derived from the profile snapshot, never set independently.
    pub async fn is_admin(&self) -> bool {
        self.inner.state.read().await.is_admin
    }

    pub async fn current_user(&self) -> Option<User> {
        self.inner.state.read().await.current_user.clone()
    }

    /// Snapshot of the held pair, for embedders that persist it across
    /// page loads.
    pub async fn token_pair(&self) -> Option<TokenPair> {
        let state = self.inner.state.read().await;
        match (&state.access, &state.refresh) {
            (Some(access), Some(refresh)) => Some(TokenPair {
                access: access.clone(),
                refresh: refresh.clone(),
            }),
            _ => None,
        }
    }

    pub(crate) async fn install_tokens(&self, pair: TokenPair) -> Result<(), SessionError> {
        {
            let mut state = self.inner.state.write().await;
            state.install(pair);
        }
        self.sync_profile().await
    }

    /// Re-fetches the profile snapshot for the held access token and
    /// recomputes `is_admin` from it.
    ///
    /// Uses a single direct dispatch rather than `auth_fetch`: the token was
    /// installed a moment ago, and a pair that is already unusable must fail
    /// the session instead of recursing into another refresh.
    pub(crate) async fn sync_profile(&self) -> Result<(), SessionError> {
        let access = { self.inner.state.read().await.access.clone() };
        let Some(access) = access else {
            return Err(SessionError::Unauthenticated.log());
        };

        let outcome = self.dispatch(&ApiRequest::get(ME_PATH), Some(&access)).await;
        let user = match outcome {
            Ok(response) if response.status().is_success() => {
                match response.json::<User>().await {
                    Ok(user) => Some(user),
                    Err(e) => {
                        tracing::error!("profile payload malformed: {e}");
                        None
                    }
                }
            }
            Ok(response) => {
                tracing::error!(status = %response.status(), "profile fetch rejected");
                None
            }
            Err(e) => {
                tracing::error!("profile fetch failed: {e}");
                None
            }
        };

        match user {
            Some(user) => {
                let mut state = self.inner.state.write().await;
                state.set_current_user(Some(user));
                tracing::debug!(is_admin = state.is_admin, "profile snapshot updated");
                Ok(())
            }
            None => {
                self.clear_session().await;
                self.signal_session_expired(None);
                Err(SessionError::SessionExpired.log())
            }
        }
    }

    /// Replaces the profile snapshot with a record the caller already holds,
    /// keeping `is_admin` derived from it.
    pub(crate) async fn replace_profile_snapshot(&self, user: User) {
        let mut state = self.inner.state.write().await;
        state.set_current_user(Some(user));
    }

    pub(crate) async fn clear_session(&self) {
        let mut state = self.inner.state.write().await;
        state.clear();
        tracing::debug!("session cleared");
    }

    /// Hands the login redirect target to the embedding UI, preserving the
    /// intended destination when there is one.
    pub(crate) fn signal_session_expired(&self, intended: Option<&str>) {
        if let Some(hook) = &self.inner.on_session_expired {
            let target = match intended {
                Some(path) => {
                    format!("{}?next={}", SSO_LOGIN_PATH.as_str(), urlencoding::encode(path))
                }
                None => SSO_LOGIN_PATH.clone(),
            };
            hook(&target);
        }
    }
}
