use serde::{Deserialize, Serialize};

use crate::session::{ApiRequest, Session, SessionError, ensure_success, read_json};
use crate::users::{Paginated, Role};

use super::query::ListQuery;

const ROLES_PATH: &str = "/api/roles";

#[derive(Debug, Clone, Serialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
    /// Permission ids attached to the role.
    pub permissions: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    pub description: String,
    pub permissions: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRole {
    pub id: u64,
}

impl Session {
    pub async fn list_roles(&self, query: ListQuery) -> Result<Paginated<Role>, SessionError> {
        let request = ApiRequest::get(ROLES_PATH).query_pairs(query.into_pairs());
        let response = self.admin_fetch(request).await?;
        read_json(response).await
    }

    pub async fn create_role(
        &self,
        create: &CreateRoleRequest,
    ) -> Result<CreatedRole, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::post(ROLES_PATH).json(create)?)
            .await?;
        read_json(response).await
    }

    pub async fn get_role(&self, id: u64) -> Result<Role, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::get(format!("{ROLES_PATH}/{id}")))
            .await?;
        read_json(response).await
    }

    pub async fn update_role(
        &self,
        id: u64,
        update: &UpdateRoleRequest,
    ) -> Result<Role, SessionError> {
        let response = self
            .admin_fetch(ApiRequest::put(format!("{ROLES_PATH}/{id}")).json(update)?)
            .await?;
        read_json(response).await
    }

    pub async fn delete_role(&self, id: u64) -> Result<(), SessionError> {
        let response = self
            .admin_fetch(ApiRequest::delete(format!("{ROLES_PATH}/{id}")))
            .await?;
        ensure_success(response).await
    }
}
