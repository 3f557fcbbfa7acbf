use uuid::Uuid;

use crate::session::{ApiRequest, Session, SessionError, TokenPair, ensure_success, read_json};

use super::types::{
    CheckLoginCodeRequest, CheckRecoveryRequest, EmailAndPasswordRequest, SendRecoveryEmailRequest,
};

const JWT_PATH: &str = "/api/auth/jwt";
const EMAIL_SEND_PATH: &str = "/api/auth/email/send";
const EMAIL_CHECK_PATH: &str = "/api/auth/email/check";
const RECOVERY_SEND_PATH: &str = "/api/auth/recovery/send";
const RECOVERY_CHECK_PATH: &str = "/api/auth/recovery/check";

/// Credential login flows. Each exchanges credentials for a token pair at an
/// unauthenticated endpoint and hands the pair to the session.
impl Session {
    /// Email+password login.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let request = ApiRequest::post(JWT_PATH).json(&EmailAndPasswordRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response = self.public_fetch(request).await?;
        let pair: TokenPair = read_json(response).await?;
        tracing::debug!("password login accepted");
        self.install_tokens(pair).await
    }

    /// Requests a one-time login code to be mailed to the user.
    pub async fn send_login_code(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let request = ApiRequest::post(EMAIL_SEND_PATH).json(&EmailAndPasswordRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response = self.public_fetch(request).await?;
        ensure_success(response).await
    }

    /// Completes the passwordless flow with the mailed code.
    pub async fn check_login_code(&self, email: &str, code: u32) -> Result<(), SessionError> {
        let request = ApiRequest::post(EMAIL_CHECK_PATH).json(&CheckLoginCodeRequest {
            email: email.to_string(),
            code,
        })?;
        let response = self.public_fetch(request).await?;
        let pair: TokenPair = read_json(response).await?;
        self.install_tokens(pair).await
    }

    /// Starts the forgot-password flow.
    pub async fn send_recovery_email(&self, email: &str) -> Result<(), SessionError> {
        let request = ApiRequest::post(RECOVERY_SEND_PATH).json(&SendRecoveryEmailRequest {
            email: email.to_string(),
        })?;
        let response = self.public_fetch(request).await?;
        ensure_success(response).await
    }

    /// Sets a new password using the mailed recovery code.
    pub async fn confirm_recovery(
        &self,
        user_id: Uuid,
        code: u32,
        new_password: &str,
    ) -> Result<(), SessionError> {
        let request = ApiRequest::post(RECOVERY_CHECK_PATH).json(&CheckRecoveryRequest {
            password: new_password.to_string(),
            user_id,
            code,
        })?;
        let response = self.public_fetch(request).await?;
        ensure_success(response).await
    }
}
