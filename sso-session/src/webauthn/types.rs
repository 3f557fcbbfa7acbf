use serde::{Deserialize, Serialize};

use crate::utils::base64url_decode;
use crate::webauthn::errors::WebAuthnError;

/// Envelope the backend wraps around creation options:
/// `{"publicKey": {...}}`, mirroring the shape `navigator.credentials.create`
/// expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialCreationOptions {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyCredentialCreationOptions,
}

/// Options for creating a new credential during the attestation ceremony.
///
/// Binary fields (`challenge`, `user.id`, exclude-list ids) arrive as
/// base64url strings and must be decoded before they reach an authenticator;
/// the `decoded_*` accessors do exactly that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialCreationOptions {
    pub challenge: String,
    pub rp: RelyingParty,
    pub user: PublicKeyCredentialUserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default)]
    pub exclude_credentials: Vec<CredentialDescriptor>,
    #[serde(default)]
    pub authenticator_selection: Option<AuthenticatorSelection>,
    #[serde(default)]
    pub attestation: Option<String>,
}

impl PublicKeyCredentialCreationOptions {
    pub fn decoded_challenge(&self) -> Result<Vec<u8>, WebAuthnError> {
        Ok(base64url_decode(&self.challenge)?)
    }

    pub fn decoded_user_handle(&self) -> Result<Vec<u8>, WebAuthnError> {
        Ok(base64url_decode(&self.user.id)?)
    }
}

/// Envelope around request options for the assertion ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequestOptions {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyCredentialRequestOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialRequestOptions {
    pub challenge: String,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default)]
    pub rp_id: Option<String>,
    #[serde(default)]
    pub allow_credentials: Vec<CredentialDescriptor>,
    #[serde(default)]
    pub user_verification: Option<String>,
}

impl PublicKeyCredentialRequestOptions {
    pub fn decoded_challenge(&self) -> Result<Vec<u8>, WebAuthnError> {
        Ok(base64url_decode(&self.challenge)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelyingParty {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyCredentialUserEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub type_: String,
    pub alg: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialDescriptor {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}

impl CredentialDescriptor {
    pub fn decoded_id(&self) -> Result<Vec<u8>, WebAuthnError> {
        Ok(base64url_decode(&self.id)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    #[serde(default)]
    pub authenticator_attachment: Option<String>,
    #[serde(default)]
    pub resident_key: Option<String>,
    #[serde(default)]
    pub user_verification: Option<String>,
    #[serde(default)]
    pub require_resident_key: Option<bool>,
}

/// Credential produced by an authenticator during registration, relayed to
/// the finish endpoint verbatim. Field names follow the WebAuthn JSON wire
/// format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCredential {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AttestationPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationPayload {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
}

/// Assertion produced by an authenticator during login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionCredential {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AssertionPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionPayload {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String,
    #[serde(rename = "userHandle", default)]
    pub user_handle: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartLoginRequest {
    pub(crate) email: String,
}
