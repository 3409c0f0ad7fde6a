mod password_service;
mod user_service;

pub use password_service::{BcryptPasswordService, PasswordService};
pub use user_service::{FileBackedUserService, UserService};
