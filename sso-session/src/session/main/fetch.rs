use http::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::SSO_USER_AGENT;
use crate::session::config::{REFRESH_PATH, SESSION_REFRESH_TIMEOUT};
use crate::session::errors::SessionError;
use crate::session::types::{ApiRequest, ErrorsResponse, TokenPair};

use super::session::Session;

/// Status the backend uses for a rejected bearer token. Applied uniformly to
/// the first dispatch, the retry and the refresh endpoint.
pub(crate) const AUTH_REJECTED: StatusCode = StatusCode::UNAUTHORIZED;

impl Session {
    /// Dispatches `request` with the held access token attached.
    ///
    /// On a 401 the session refreshes itself once and retries the request
    /// once with the new token; a second rejection ends the session and
    /// surfaces [`SessionError::SessionExpired`]. Every other status is
    /// returned to the caller unchanged. Callers must not set the
    /// `Authorization` header themselves; if they do, it is stripped.
    pub async fn auth_fetch(&self, request: ApiRequest) -> Result<Response, SessionError> {
        let (access, epoch) = {
            let state = self.inner.state.read().await;
            (state.access.clone(), state.epoch)
        };
        let Some(access) = access else {
            self.signal_session_expired(Some(request.path()));
            return Err(SessionError::Unauthenticated.log());
        };

        let response = self.dispatch(&request, Some(&access)).await?;
        if response.status() != AUTH_REJECTED {
            return Ok(response);
        }

        tracing::debug!(path = %request.path(), "access token rejected, refreshing session");
        let fresh = self.refresh_after_rejection(epoch, request.path()).await?;

        let retry = self.dispatch(&request, Some(&fresh)).await?;
        if retry.status() == AUTH_REJECTED {
            tracing::error!(path = %request.path(), "request rejected again with a fresh token");
            self.clear_session().await;
            self.signal_session_expired(Some(request.path()));
            return Err(SessionError::SessionExpired);
        }
        Ok(retry)
    }

    /// Admin-gated variant of [`auth_fetch`](Self::auth_fetch).
    ///
    /// Fails with [`SessionError::NotAuthorized`] before any network dispatch
    /// when the current user is not an admin. This is a convenience gate for
    /// immediate UI feedback, not a security boundary; the backend enforces
    /// authorization independently.
    pub async fn admin_fetch(&self, request: ApiRequest) -> Result<Response, SessionError> {
        if !self.is_admin().await {
            return Err(SessionError::NotAuthorized.log());
        }
        self.auth_fetch(request).await
    }

    /// Unauthenticated dispatch for the login-entry endpoints.
    pub(crate) async fn public_fetch(&self, request: ApiRequest) -> Result<Response, SessionError> {
        self.dispatch(&request, None).await
    }

    pub(crate) async fn dispatch(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> Result<Response, SessionError> {
        let mut url = self
            .inner
            .base_url
            .join(request.path())
            .map_err(|e| SessionError::Url(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut headers = request.headers.clone();
        if headers.remove(AUTHORIZATION).is_some() {
            tracing::warn!(path = %request.path(), "caller-set Authorization header stripped");
        }

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .headers(headers)
            .header(USER_AGENT, SSO_USER_AGENT.as_str());
        if let Some(access) = access {
            builder = builder.bearer_auth(access);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))
    }

    /// Single-flight refresh. The first caller that observed a rejection for
    /// the current token epoch performs the refresh; everyone queued behind
    /// the gate adopts its outcome instead of issuing another refresh call.
    async fn refresh_after_rejection(
        &self,
        stale_epoch: u64,
        intended: &str,
    ) -> Result<String, SessionError> {
        let _gate = self.inner.refresh_gate.lock().await;

        let refresh = {
            let state = self.inner.state.read().await;
            if state.epoch != stale_epoch {
                // Another caller already resolved this expiry while we
                // waited for the gate.
                return match &state.access {
                    Some(access) => Ok(access.clone()),
                    None => Err(SessionError::SessionExpired),
                };
            }
            state.refresh.clone()
        };

        let Some(refresh) = refresh else {
            self.clear_session().await;
            self.signal_session_expired(Some(intended));
            return Err(SessionError::SessionExpired.log());
        };

        let outcome =
            tokio::time::timeout(*SESSION_REFRESH_TIMEOUT, self.request_refresh(&refresh)).await;
        let pair = match outcome {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                tracing::error!("token refresh failed: {e}");
                self.clear_session().await;
                self.signal_session_expired(Some(intended));
                return Err(SessionError::SessionExpired);
            }
            Err(_) => {
                tracing::error!("token refresh timed out");
                self.clear_session().await;
                self.signal_session_expired(Some(intended));
                return Err(SessionError::SessionExpired);
            }
        };

        let access = pair.access.clone();
        self.install_tokens(pair).await?;
        tracing::debug!("session refreshed");
        Ok(access)
    }

    async fn request_refresh(&self, refresh: &str) -> Result<TokenPair, SessionError> {
        let request =
            ApiRequest::post(REFRESH_PATH).json(&serde_json::json!({ "refresh": refresh }))?;
        let response = self.public_fetch(request).await?;
        read_json(response).await
    }
}

/// Decodes a JSON payload, mapping non-2xx statuses to the backend's
/// `{"errors": [...]}` envelope.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SessionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(backend_error(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| SessionError::Serde(e.to_string()))
}

/// Discards the body, mapping non-2xx statuses to the backend error envelope.
pub async fn ensure_success(response: Response) -> Result<(), SessionError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(backend_error(response).await)
    }
}

async fn backend_error(response: Response) -> SessionError {
    let status = response.status();
    let errors = match response.json::<ErrorsResponse>().await {
        Ok(body) if !body.errors.is_empty() => body.errors,
        // Fall back to the status line when the body is not the envelope.
        _ => vec![status.to_string()],
    };
    SessionError::Backend {
        status: status.as_u16(),
        errors,
    }
    .log()
}
