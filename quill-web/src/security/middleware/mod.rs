mod auth;
mod redirect;

pub use auth::auth_middleware;
pub use redirect::redirect_middleware;
