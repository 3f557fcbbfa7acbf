use crate::session::{ApiRequest, Session, SessionError, ensure_success, read_json};
use crate::users::types::Device;

const DEVICE_PATH: &str = "/api/device";

/// Own-device management for the profile screen. Devices are scoped to the
/// calling user, so these go through `auth_fetch`, not the admin gate.
impl Session {
    pub async fn list_devices(&self) -> Result<Vec<Device>, SessionError> {
        let response = self.auth_fetch(ApiRequest::get(DEVICE_PATH)).await?;
        read_json(response).await
    }

    pub async fn get_device(&self, id: &str) -> Result<Device, SessionError> {
        let response = self
            .auth_fetch(ApiRequest::get(format!("{DEVICE_PATH}/{id}")))
            .await?;
        read_json(response).await
    }

    pub async fn rename_device(&self, id: &str, name: &str) -> Result<(), SessionError> {
        let request = ApiRequest::put(format!("{DEVICE_PATH}/{id}"))
            .json(&serde_json::json!({ "name": name }))?;
        let response = self.auth_fetch(request).await?;
        ensure_success(response).await
    }

    /// Revokes the refresh token bound to the device.
    pub async fn delete_device(&self, id: &str) -> Result<(), SessionError> {
        let response = self
            .auth_fetch(ApiRequest::delete(format!("{DEVICE_PATH}/{id}")))
            .await?;
        ensure_success(response).await
    }
}
