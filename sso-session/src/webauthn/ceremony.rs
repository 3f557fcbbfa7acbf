use async_trait::async_trait;

use crate::session::{ApiRequest, Session, TokenPair, ensure_success, read_json};
use crate::webauthn::errors::WebAuthnError;
use crate::webauthn::types::{
    AssertionCredential, CreatedCredential, CredentialCreationOptions, CredentialRequestOptions,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions, StartLoginRequest,
};

const REGISTER_START_PATH: &str = "/api/auth/webauthn/register/start";
const REGISTER_FINISH_PATH: &str = "/api/auth/webauthn/register/finish";
const LOGIN_START_PATH: &str = "/api/auth/webauthn/login/start";
const LOGIN_FINISH_PATH: &str = "/api/auth/webauthn/login/finish";

/// The user-agent side of a WebAuthn ceremony.
///
/// In a browser deployment this wraps `navigator.credentials`; tests script
/// it. The session drives the ceremony and never interprets the credential
/// payloads it relays.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn create_credential(
        &self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<CreatedCredential, WebAuthnError>;

    async fn get_assertion(
        &self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<AssertionCredential, WebAuthnError>;
}

impl Session {
    /// Attestation ceremony: registers a new passkey for the logged-in user.
    ///
    /// Starts on the backend, decodes the option fields an authenticator
    /// consumes as raw bytes, drives the authenticator, and relays the
    /// produced credential to the finish endpoint.
    pub async fn register_passkey(
        &self,
        authenticator: &dyn Authenticator,
    ) -> Result<(), WebAuthnError> {
        let response = self
            .auth_fetch(ApiRequest::post(REGISTER_START_PATH))
            .await?;
        let options: CredentialCreationOptions = read_json(response).await?;

        // Fail before touching the authenticator if the binary fields are
        // not decodable.
        options.public_key.decoded_challenge()?;
        options.public_key.decoded_user_handle()?;

        let credential = authenticator.create_credential(&options.public_key).await?;
        tracing::debug!(credential_id = %credential.id, "authenticator created credential");

        let response = self
            .auth_fetch(ApiRequest::post(REGISTER_FINISH_PATH).json(&credential)?)
            .await?;
        ensure_success(response).await?;

        // The profile's webauthn flag changed server-side.
        self.sync_profile().await?;
        Ok(())
    }

    /// Assertion ceremony: logs in with a previously registered passkey and
    /// starts the session from the returned token pair.
    pub async fn login_with_passkey(
        &self,
        email: &str,
        authenticator: &dyn Authenticator,
    ) -> Result<(), WebAuthnError> {
        let request = ApiRequest::post(LOGIN_START_PATH).json(&StartLoginRequest {
            email: email.to_string(),
        })?;
        let response = self.public_fetch(request).await?;
        let options: CredentialRequestOptions = read_json(response).await?;

        options.public_key.decoded_challenge()?;

        let assertion = authenticator.get_assertion(&options.public_key).await?;
        tracing::debug!(credential_id = %assertion.id, "authenticator produced assertion");

        let response = self
            .public_fetch(ApiRequest::post(LOGIN_FINISH_PATH).json(&assertion)?)
            .await?;
        let pair: TokenPair = read_json(response).await?;
        self.install_tokens(pair).await?;
        Ok(())
    }
}
