//! sso-session - Session and token lifecycle client for the SSO platform API
//!
//! This crate wraps every call to the SSO backend in an authenticated-request
//! primitive: it owns the access/refresh token pair, attaches the bearer
//! token to outbound requests, silently refreshes an expired access token
//! (exactly once per expiry, shared across concurrent callers), gates
//! admin-only calls client-side, and signals the embedding UI when the
//! session can no longer be recovered.
//!
//! On top of the session manager it ships the typed flows the account screens
//! need: credential logins (password, one-time email code, passkey), WebAuthn
//! ceremony bridging through an [`Authenticator`] seam, profile and device
//! management, and the admin CRUD clients for users, roles and permissions.

mod admin;
mod auth;
mod config;
mod session;
mod users;
mod utils;
mod webauthn;

// The session manager and its request primitives
pub use session::{
    ApiRequest, RedirectHook, Session, SessionBuilder, SessionError, TokenPair, ensure_success,
    read_json,
};

// Domain models shared by the profile and admin surfaces
pub use users::{
    ADMIN_ROLE, Device, Oauth2Connection, Paginated, Permission, Role, UpdateProfileRequest, User,
};

// Admin CRUD payloads and the listing filter builder
pub use admin::{
    CreatePermissionRequest, CreateRoleRequest, CreateUserRequest, CreatedPermission, CreatedRole,
    CreatedUser, ListQuery, UpdatePermissionRequest, UpdateRoleRequest, UpdateUserRequest,
};

// WebAuthn ceremony bridging
pub use webauthn::{
    AssertionCredential, AssertionPayload, AttestationPayload, Authenticator,
    AuthenticatorSelection, CreatedCredential, CredentialCreationOptions, CredentialDescriptor,
    CredentialRequestOptions, PubKeyCredParam, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialRequestOptions, PublicKeyCredentialUserEntity, RelyingParty, WebAuthnError,
};

pub use config::{SSO_LOGIN_PATH, SSO_USER_AGENT};

pub use utils::{UtilError, base64url_decode, base64url_encode};
