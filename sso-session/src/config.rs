//! Central configuration for the sso-session crate

use std::sync::LazyLock;

/// Path of the login entry point users are redirected to when their session
/// can no longer be recovered.
///
/// Default: "/auth"
pub static SSO_LOGIN_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("SSO_LOGIN_PATH").unwrap_or_else(|_| "/auth".to_string()));

/// User-Agent header attached to every request this client dispatches.
///
/// Default: "sso-session/<crate version>"
pub static SSO_USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SSO_USER_AGENT")
        .unwrap_or_else(|_| concat!("sso-session/", env!("CARGO_PKG_VERSION")).to_string())
});
