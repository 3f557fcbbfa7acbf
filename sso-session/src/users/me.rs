use crate::session::{ApiRequest, ME_PATH, Session, SessionError, read_json};
use crate::users::types::{CheckEmailRequest, CheckEmailResponse, UpdateProfileRequest, User};

const USERS_EXISTS_PATH: &str = "/api/users/exists";

impl Session {
    /// Fetches the caller's profile through the authenticated channel.
    ///
    /// The session keeps its own snapshot in sync; this is for screens that
    /// want a fresh read (for example after editing the profile elsewhere).
    pub async fn fetch_me(&self) -> Result<User, SessionError> {
        let response = self.auth_fetch(ApiRequest::get(ME_PATH)).await?;
        read_json(response).await
    }

    /// Updates the caller's profile and refreshes the session snapshot from
    /// the returned record.
    pub async fn update_me(&self, update: &UpdateProfileRequest) -> Result<User, SessionError> {
        let response = self
            .auth_fetch(ApiRequest::put(ME_PATH).json(update)?)
            .await?;
        let user: User = read_json(response).await?;
        self.replace_profile_snapshot(user.clone()).await;
        Ok(user)
    }

    /// Pre-registration probe: whether an account exists for `email`.
    pub async fn user_exists(&self, email: &str) -> Result<bool, SessionError> {
        let request = ApiRequest::post(USERS_EXISTS_PATH).json(&CheckEmailRequest {
            email: email.to_string(),
        })?;
        let response = self.public_fetch(request).await?;
        let body: CheckEmailResponse = read_json(response).await?;
        Ok(body.exists)
    }
}
