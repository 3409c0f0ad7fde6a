mod auth;
mod media;
mod posts;

pub use auth::{get_profile, list_users, login, register};
pub use media::{delete_media, list_media, upload_media};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};

use axum::http::StatusCode;
use quill_service::ServiceError;
use tracing::error;

/// 服务层错误到HTTP状态码的统一映射
pub(crate) fn error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        other => {
            error!("Service error: {}", other);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
