use serde::{Deserialize, Serialize};

use crate::session::{ApiRequest, Session, SessionError, ensure_success, read_json};
use crate::users::{Paginated, Permission};

use super::query::ListQuery;

const PERM_PATH: &str = "/api/perm";

#[derive(Debug, Clone, Serialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePermissionRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPermission {
    pub id: u64,
}

impl Session {
    pub async fn list_permissions(
        &self,
        query: ListQuery,
    ) -> Result<Paginated<Permission>, SessionError> {
        let request = ApiRequest::get(PERM_PATH).query_pairs(query.into_pairs());
        let response = self.admin_fetch(request).await?;
        read_json(response).await
    }

    pub async fn create_permission(
        &self,
        create: &CreatePermissionRequest,
    ) -> Result<CreatedPermission, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::post(PERM_PATH).json(create)?)
            .await?;
        read_json(response).await
    }

    pub async fn get_permission(&self, id: u64) -> Result<Permission, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::get(format!("{PERM_PATH}/{id}")))
            .await?;
        read_json(response).await
    }

    pub async fn update_permission(
        &self,
        id: u64,
        update: &UpdatePermissionRequest,
    ) -> Result<Permission, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::put(format!("{PERM_PATH}/{id}")).json(update)?)
            .await?;
        read_json(response).await
    }

    pub async fn delete_permission(&self, id: u64) -> Result<(), SessionError> {
        let response = self
            .admin_fetch(ApiRequest::delete(format!("{PERM_PATH}/{id}")))
            .await?;
        ensure_success(response).await
    }
}
