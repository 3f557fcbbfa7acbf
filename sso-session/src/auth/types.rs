use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub(crate) struct EmailAndPasswordRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckLoginCodeRequest {
    pub(crate) email: String,
    pub(crate) code: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendRecoveryEmailRequest {
    pub(crate) email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckRecoveryRequest {
    pub(crate) password: String,
    #[serde(rename = "uidb64")]
    pub(crate) user_id: Uuid,
    #[serde(rename = "token")]
    pub(crate) code: u32,
}
