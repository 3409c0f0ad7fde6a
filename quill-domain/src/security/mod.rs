mod user;

pub use user::{AuthenticatedUser, User, UserProfile};

/// 角色常量
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_AUTHOR: &str = "Author";
