use thiserror::Error;

use crate::session::SessionError;
use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum WebAuthnError {
    /// Error from the underlying session/transport layer.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The server-issued ceremony options were malformed.
    #[error("Options error: {0}")]
    Options(String),

    /// The user agent's authenticator failed or the user declined.
    #[error("Authenticator error: {0}")]
    Authenticator(String),

    /// Error from utils operations
    #[error("Format error: {0}")]
    Format(#[from] UtilError),
}
