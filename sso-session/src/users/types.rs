use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role name that flips the session's `is_admin` flag.
pub const ADMIN_ROLE: &str = "admin";

/// Denormalized profile snapshot returned by the user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub is_wa: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub oauth2_connections: Vec<Oauth2Connection>,
    #[serde(default)]
    pub devices: Vec<Device>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether any of the user's roles is the admin role. The session's
    /// `is_admin` flag is always derived from this, never set directly.
    pub fn has_admin_role(&self) -> bool {
        self.roles.iter().any(|role| role.name == ADMIN_ROLE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A device the backend has associated with one of the user's refresh
/// tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub ua: String,
    #[serde(default)]
    pub ip: String,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oauth2Connection {
    pub id: u64,
    pub user_id: Uuid,
    pub provider: String,
    pub provider_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// List envelope shared by every paginated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub count: i64,
    pub total_pages: u32,
    pub current_page: u32,
    pub has_next_page: bool,
}

/// Editable profile fields for `PUT /api/users/me`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckEmailRequest {
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckEmailResponse {
    pub(crate) exists: bool,
}
