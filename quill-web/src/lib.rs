pub mod app_state;
pub mod extractors;
pub mod handlers;
pub mod security;

pub use app_state::AppState;
pub use handlers::*;
pub use security::{auth_middleware, redirect_middleware};
