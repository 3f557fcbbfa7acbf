//! In-process mock of the SSO backend for integration tests.
//!
//! Each test spawns its own server on an ephemeral port, so tests never
//! share token state. Per-endpoint hit counters let tests assert how often
//! the session manager actually touched the network.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use sso_session::{
    AssertionCredential, Authenticator, CreatedCredential, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialRequestOptions, Session, WebAuthnError,
};

pub const TEST_USER_ID: &str = "7b3e1c1a-9f2d-4c0e-8d35-0a4c2f9b6e21";
pub const TEST_PASSWORD: &str = "secret";

// base64url("reg-challenge"), base64url("user-handle"), etc.
pub const REG_CHALLENGE_B64: &str = "cmVnLWNoYWxsZW5nZQ";
pub const USER_HANDLE_B64: &str = "dXNlci1oYW5kbGU";
pub const LOGIN_CHALLENGE_B64: &str = "bG9naW4tY2hhbGxlbmdl";
pub const CRED_ID_B64: &str = "Y3JlZC0x";

#[derive(Default)]
pub struct MockState {
    /// Access tokens the protected endpoints currently accept.
    valid_access: Mutex<HashSet<String>>,
    /// Refresh token the refresh endpoint currently accepts (rotated on use).
    valid_refresh: Mutex<Option<String>>,
    issued: AtomicUsize,

    /// Whether the profile carries the admin role.
    pub admin_profile: AtomicBool,
    /// Whether the profile reports a registered passkey.
    pub webauthn_enabled: AtomicBool,
    /// When set, the logout endpoint answers 500.
    pub fail_logout: AtomicBool,
    /// When set, registration options carry an undecodable challenge.
    pub bad_webauthn_challenge: AtomicBool,

    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub users_list_calls: AtomicUsize,
    pub protected_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,

    /// Decoded query parameters of the last `GET /api/users` call.
    pub last_users_query: Mutex<Option<HashMap<String, String>>>,
}

impl MockState {
    /// Mints a fresh token pair and marks it valid.
    pub fn issue_pair(&self) -> (String, String) {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let access = format!("access-{n}");
        let refresh = format!("refresh-{n}");
        self.valid_access.lock().unwrap().insert(access.clone());
        *self.valid_refresh.lock().unwrap() = Some(refresh.clone());
        (access, refresh)
    }

    pub fn revoke_access(&self, token: &str) {
        self.valid_access.lock().unwrap().remove(token);
    }

    pub fn revoke_refresh(&self) {
        *self.valid_refresh.lock().unwrap() = None;
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        bearer(headers)
            .map(|token| self.valid_access.lock().unwrap().contains(&token))
            .unwrap_or(false)
    }

    fn profile(&self) -> Value {
        let roles = if self.admin_profile.load(Ordering::SeqCst) {
            json!([{"id": 1, "name": "admin", "description": "platform administrators"}])
        } else {
            json!([{"id": 2, "name": "member", "description": ""}])
        };
        json!({
            "id": TEST_USER_ID,
            "name": "Test User",
            "email": "user@example.com",
            "avatar": "",
            "is_wa": self.webauthn_enabled.load(Ordering::SeqCst),
            "is_active": true,
            "is_email_verified": true,
            "roles": roles,
            "oauth2_connections": [],
            "devices": [],
            "created_at": "2025-04-01T12:00:00Z",
            "updated_at": "2025-04-01T12:00:00Z",
        })
    }
}

pub struct MockSso {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockSso {
    pub async fn spawn() -> Self {
        // RUST_LOG=debug surfaces the session's refresh decisions in test output.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/api/auth/jwt", post(password_login))
            .route("/api/auth/jwt/refresh", post(refresh))
            .route("/api/auth/logout", post(logout))
            .route("/api/users/me", get(me))
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/roles", get(list_roles).post(create_role))
            .route("/api/roles/{id}", delete(delete_role))
            .route("/api/protected", get(always_rejected))
            .route("/api/device", get(list_devices))
            .route("/api/device/{id}", delete(delete_device))
            .route("/api/auth/webauthn/register/start", post(register_start))
            .route("/api/auth/webauthn/register/finish", post(register_finish))
            .route("/api/auth/webauthn/login/start", post(login_start))
            .route("/api/auth/webauthn/login/finish", post(login_finish))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

/// Builds a session pointed at the mock, logs it in with a freshly issued
/// pair, and captures every redirect target the session signals.
pub async fn logged_in_session(mock: &MockSso) -> (Session, Arc<Mutex<Vec<String>>>) {
    let (session, redirects) = session_with_redirect_sink(mock);
    let (access, refresh) = mock.state.issue_pair();
    session.login(access, refresh).await.expect("login succeeds");
    (session, redirects)
}

pub fn session_with_redirect_sink(mock: &MockSso) -> (Session, Arc<Mutex<Vec<String>>>) {
    let redirects = Arc::new(Mutex::new(Vec::new()));
    let sink = redirects.clone();
    let session = Session::builder(mock.base_url.clone())
        .on_session_expired(move |target| sink.lock().unwrap().push(target.to_string()))
        .build()
        .expect("session builds");
    (session, redirects)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn errors(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errors": [message] }))).into_response()
}

fn unauthorized() -> Response {
    errors(StatusCode::UNAUTHORIZED, "invalid or expired token")
}

async fn password_login(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    if body["password"] == TEST_PASSWORD {
        let (access, refresh) = state.issue_pair();
        Json(json!({ "access": access, "refresh": refresh })).into_response()
    } else {
        errors(StatusCode::UNAUTHORIZED, "invalid credentials")
    }
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let presented = body["refresh"].as_str().unwrap_or_default().to_string();
    let current = state.valid_refresh.lock().unwrap().clone();
    match current {
        Some(valid) if valid == presented => {
            let (access, refresh) = state.issue_pair();
            Json(json!({ "access": access, "refresh": refresh })).into_response()
        }
        _ => errors(StatusCode::UNAUTHORIZED, "refresh token revoked"),
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_logout.load(Ordering::SeqCst) {
        return errors(StatusCode::INTERNAL_SERVER_ERROR, "session store unavailable");
    }
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!("OK")).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(state.profile()).into_response()
}

async fn list_users(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.users_list_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    *state.last_users_query.lock().unwrap() = Some(query);
    Json(json!({
        "data": [state.profile()],
        "count": 1,
        "total_pages": 1,
        "current_page": 1,
        "has_next_page": false,
    }))
    .into_response()
}

async fn create_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if body["email"] == "taken@example.com" {
        return errors(StatusCode::CONFLICT, "email already exists");
    }
    (StatusCode::CREATED, Json(json!({ "id": TEST_USER_ID }))).into_response()
}

async fn list_roles(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "data": [
            {"id": 1, "name": "admin", "description": "platform administrators"},
            {"id": 2, "name": "member", "description": ""},
        ],
        "count": 2,
        "total_pages": 1,
        "current_page": 1,
        "has_next_page": false,
    }))
    .into_response()
}

async fn create_role(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if body["name"].as_str().unwrap_or_default().is_empty() {
        return errors(StatusCode::BAD_REQUEST, "Name failed on the required rule");
    }
    (StatusCode::CREATED, Json(json!({ "id": 7 }))).into_response()
}

async fn delete_role(
    State(state): State<Arc<MockState>>,
    Path(_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!("OK")).into_response()
}

/// Rejects every bearer token; exercises the bounded retry cycle.
async fn always_rejected(State(state): State<Arc<MockState>>) -> Response {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    unauthorized()
}

async fn list_devices(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{
        "id": "device-1",
        "user_id": TEST_USER_ID,
        "name": "Firefox on Linux",
        "device_type": "desktop",
        "os": "Linux",
        "browser": "Firefox",
        "ua": "Mozilla/5.0",
        "ip": "203.0.113.7",
        "last_active": "2025-04-02T08:30:00Z",
        "created_at": "2025-03-01T10:00:00Z",
    }]))
    .into_response()
}

async fn delete_device(
    State(state): State<Arc<MockState>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!("OK")).into_response()
}

async fn register_start(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let challenge = if state.bad_webauthn_challenge.load(Ordering::SeqCst) {
        "not base64url!"
    } else {
        REG_CHALLENGE_B64
    };
    Json(json!({
        "publicKey": {
            "challenge": challenge,
            "rp": {"id": "example.com", "name": "Example SSO"},
            "user": {
                "id": USER_HANDLE_B64,
                "name": "user@example.com",
                "displayName": "user@example.com",
            },
            "pubKeyCredParams": [{"type": "public-key", "alg": -7}],
            "timeout": 60000,
            "excludeCredentials": [],
            "authenticatorSelection": {"userVerification": "preferred"},
            "attestation": "none",
        }
    }))
    .into_response()
}

async fn register_finish(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    // The relayed credential must keep the WebAuthn JSON field names.
    let valid = body["rawId"].is_string()
        && body["response"]["clientDataJSON"].is_string()
        && body["response"]["attestationObject"].is_string();
    if !valid {
        return errors(StatusCode::BAD_REQUEST, "malformed credential");
    }
    state.webauthn_enabled.store(true, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!("OK"))).into_response()
}

async fn login_start(State(_state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["email"].as_str().unwrap_or_default().is_empty() {
        return errors(StatusCode::BAD_REQUEST, "Email failed on the required rule");
    }
    Json(json!({
        "publicKey": {
            "challenge": LOGIN_CHALLENGE_B64,
            "timeout": 60000,
            "rpId": "example.com",
            "allowCredentials": [{"type": "public-key", "id": CRED_ID_B64}],
            "userVerification": "preferred",
        }
    }))
    .into_response()
}

async fn login_finish(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let valid = body["rawId"].is_string()
        && body["response"]["clientDataJSON"].is_string()
        && body["response"]["authenticatorData"].is_string()
        && body["response"]["signature"].is_string();
    if !valid {
        return errors(StatusCode::BAD_REQUEST, "malformed assertion");
    }
    state.webauthn_enabled.store(true, Ordering::SeqCst);
    let (access, refresh) = state.issue_pair();
    Json(json!({ "access": access, "refresh": refresh })).into_response()
}

/// Scripted user-agent side of the WebAuthn ceremonies, counting how often
/// the session actually reaches the authenticator.
#[derive(Default)]
pub struct ScriptedAuthenticator {
    pub creations: AtomicUsize,
    pub assertions: AtomicUsize,
}

#[async_trait::async_trait]
impl Authenticator for ScriptedAuthenticator {
    async fn create_credential(
        &self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<CreatedCredential, WebAuthnError> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        // A real authenticator consumes the decoded challenge bytes.
        let _ = options.decoded_challenge()?;
        Ok(CreatedCredential {
            id: CRED_ID_B64.to_string(),
            raw_id: CRED_ID_B64.to_string(),
            type_: "public-key".to_string(),
            response: sso_session::AttestationPayload {
                client_data_json: options.challenge.clone(),
                attestation_object: "o2NmbXRkbm9uZQ".to_string(),
            },
        })
    }

    async fn get_assertion(
        &self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<AssertionCredential, WebAuthnError> {
        self.assertions.fetch_add(1, Ordering::SeqCst);
        let _ = options.decoded_challenge()?;
        Ok(AssertionCredential {
            id: CRED_ID_B64.to_string(),
            raw_id: CRED_ID_B64.to_string(),
            type_: "public-key".to_string(),
            response: sso_session::AssertionPayload {
                client_data_json: options.challenge.clone(),
                authenticator_data: "YXV0aC1kYXRh".to_string(),
                signature: "c2lnbmF0dXJl".to_string(),
                user_handle: Some(USER_HANDLE_B64.to_string()),
            },
        })
    }
}
