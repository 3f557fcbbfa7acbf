use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}

/// Decodes a base64url (unpadded) field as the WebAuthn wire format uses
/// them. Embedding UIs need this to hand raw bytes to an authenticator.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))
}

pub fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}
