use thiserror::Error;

/// Errors surfaced by the session manager and the typed API calls built on it.
///
/// `Unauthenticated`, `SessionExpired` and `NotAuthorized` are session-layer
/// outcomes; `Network` and `Backend` propagate to the calling screen without
/// touching session state.
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// No access token is held; the caller must authenticate first.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The refresh cycle failed, or the retried request was rejected again.
    #[error("Session expired")]
    SessionExpired,

    /// The client-side admin gate rejected the call before any dispatch.
    #[error("Not authorized")]
    NotAuthorized,

    /// Transport-level failure talking to the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-auth error status from the backend, carrying its error list.
    #[error("Backend error ({status}): {}", .errors.join("; "))]
    Backend { status: u16, errors: Vec<String> },

    /// A payload could not be encoded or decoded.
    #[error("Serde error: {0}")]
    Serde(String),

    /// Malformed base URL or request path.
    #[error("Url error: {0}")]
    Url(String),
}

impl SessionError {
    /// Log the error and return self, allowing method chaining at the point
    /// where the error is raised.
    pub(crate) fn log(self) -> Self {
        match &self {
            Self::Unauthenticated => tracing::debug!("no access token held"),
            Self::SessionExpired => tracing::warn!("session expired"),
            Self::NotAuthorized => tracing::debug!("admin gate rejected the call"),
            Self::Network(msg) => tracing::error!("network error: {}", msg),
            Self::Backend { status, errors } => {
                tracing::debug!("backend error ({}): {}", status, errors.join("; "))
            }
            Self::Serde(msg) => tracing::error!("serde error: {}", msg),
            Self::Url(msg) => tracing::error!("url error: {}", msg),
        }
        self
    }
}
