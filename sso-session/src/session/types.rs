use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::session::errors::SessionError;
use crate::users::User;

/// Access/refresh credential pair as issued by the token endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Error envelope the backend attaches to every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorsResponse {
    pub(crate) errors: Vec<String>,
}

/// In-memory authentication state of the current user agent.
///
/// Mutation happens only through the login/refresh/logout operations on
/// [`Session`](super::Session), which keeps `is_admin` and `current_user`
/// consistent with the token pair.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) access: Option<String>,
    pub(crate) refresh: Option<String>,
    pub(crate) current_user: Option<User>,
    pub(crate) is_admin: bool,
    /// Bumped on every token-pair change (install or clear). A caller that
    /// observed an auth rejection carries the epoch of the token it used, so
    /// the refresh gate can tell whether the rejection is already resolved.
    pub(crate) epoch: u64,
}

impl SessionState {
    pub(crate) fn install(&mut self, pair: TokenPair) {
        self.access = Some(pair.access);
        self.refresh = Some(pair.refresh);
        self.epoch += 1;
    }

    pub(crate) fn set_current_user(&mut self, user: Option<User>) {
        self.is_admin = user.as_ref().is_some_and(User::has_admin_role);
        self.current_user = user;
    }

    pub(crate) fn clear(&mut self) {
        self.access = None;
        self.refresh = None;
        self.set_current_user(None);
        self.epoch += 1;
    }
}

/// Hook invoked with the login redirect target when the session ends.
/// The library never navigates; the embedding UI decides what to do with it.
pub type RedirectHook = Box<dyn Fn(&str) + Send + Sync>;

/// Request descriptor accepted by `auth_fetch`/`admin_fetch`.
///
/// Callers describe the resource, method, query and body; the session manager
/// owns the `Authorization` header and the retry cycle.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub(crate) fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, SessionError> {
        self.body =
            Some(serde_json::to_value(body).map_err(|e| SessionError::Serde(e.to_string()))?);
        Ok(self)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
