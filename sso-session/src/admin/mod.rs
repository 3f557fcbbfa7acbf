mod permissions;
mod query;
mod roles;
mod users;

pub use permissions::{CreatePermissionRequest, CreatedPermission, UpdatePermissionRequest};
pub use query::ListQuery;
pub use roles::{CreateRoleRequest, CreatedRole, UpdateRoleRequest};
pub use users::{CreateUserRequest, CreatedUser, UpdateUserRequest};
