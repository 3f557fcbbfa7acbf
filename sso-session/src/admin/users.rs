use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{ApiRequest, Session, SessionError, ensure_success, read_json};
use crate::users::{Paginated, User};

use super::query::ListQuery;

const USERS_PATH: &str = "/api/users";

/// Payload for creating a user from the admin screen. Roles are referenced
/// by id; the avatar travels as a URL, blob upload is the embedder's concern.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub roles: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    pub id: Uuid,
}

impl Session {
    pub async fn list_users(&self, query: ListQuery) -> Result<Paginated<User>, SessionError> {
        let request = ApiRequest::get(USERS_PATH).query_pairs(query.into_pairs());
        let response = self.admin_fetch(request).await?;
        read_json(response).await
    }

    pub async fn create_user(
        &self,
        create: &CreateUserRequest,
    ) -> Result<CreatedUser, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::post(USERS_PATH).json(create)?)
            .await?;
        read_json(response).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::get(format!("{USERS_PATH}/{id}")))
            .await?;
        read_json(response).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        update: &UpdateUserRequest,
    ) -> Result<User, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::put(format!("{USERS_PATH}/{id}")).json(update)?)
            .await?;
        read_json(response).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), SessionError> {
        let response = self
            .admin_fetch(ApiRequest::delete(format!("{USERS_PATH}/{id}")))
            .await?;
        ensure_success(response).await
    }
}
