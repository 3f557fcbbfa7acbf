use std::sync::LazyLock;
use std::time::Duration;

pub(crate) const REFRESH_PATH: &str = "/api/auth/jwt/refresh";
pub(crate) const LOGOUT_PATH: &str = "/api/auth/logout";
pub(crate) const ME_PATH: &str = "/api/users/me";

/// Upper bound on the token refresh round trip. A refresh that does not
/// complete within this window is treated as a refresh failure, so the UI
/// never hangs on an unreachable token endpoint.
///
/// Default: 10 seconds, via SSO_REFRESH_TIMEOUT_SECS.
pub(crate) static SESSION_REFRESH_TIMEOUT: LazyLock<Duration> = LazyLock::new(|| {
    let secs = std::env::var("SSO_REFRESH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(10);
    Duration::from_secs(secs)
});
