mod devices;
mod me;
mod types;

pub use types::{
    ADMIN_ROLE, Device, Oauth2Connection, Paginated, Permission, Role, UpdateProfileRequest, User,
};
