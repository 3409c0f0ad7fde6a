use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_domain::security::ROLE_AUTHOR;
use quill_domain::UserProfile;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::extractors::CurrentUser;
use crate::handlers::error_status;
use crate::AppState;

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[serde(rename = "displayName")]
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,

    #[validate(length(min = 8))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,

    pub username: String,

    #[serde(rename = "displayName")]
    pub display_name: String,

    pub roles: Vec<String>,

    /// 令牌有效期（秒）
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

/// 注册新用户
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, StatusCode> {
    if request.validate().is_err() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // 可配置为仅管理员可注册新用户
    if state.require_admin_for_registration {
        let is_admin = user.map(|CurrentUser(u)| u.is_admin()).unwrap_or(false);
        if !is_admin {
            warn!("Non-admin user attempted to register a new user");
            return Err(StatusCode::FORBIDDEN);
        }
    }

    let roles = vec![ROLE_AUTHOR.to_string()];
    match state
        .user_service
        .create(
            &request.username,
            &request.email,
            &request.display_name,
            &request.password,
            roles,
        )
        .await
    {
        Ok(created) => Ok((StatusCode::CREATED, Json(UserProfile::from(&created))).into_response()),
        Err(e) => Err(error_status(&e)),
    }
}

/// 用户登录
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, StatusCode> {
    let token = match state
        .user_service
        .authenticate(&request.username, &request.password)
        .await
    {
        Ok(Some(token)) => token,
        Ok(None) => return Err(StatusCode::UNAUTHORIZED),
        Err(e) => return Err(error_status(&e)),
    };

    let user = match state.user_service.get(&request.username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(StatusCode::UNAUTHORIZED),
        Err(e) => return Err(error_status(&e)),
    };

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        display_name: user.display_name,
        roles: user.roles,
        expires_in: state.jwt_service.expiration(),
    })
    .into_response())
}

/// 获取当前用户资料
/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, StatusCode> {
    match state.user_service.get(&user.username).await {
        Ok(Some(user)) => Ok(Json(UserProfile::from(&user)).into_response()),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// 列出所有用户名（仅管理员）
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, StatusCode> {
    if !user.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    match state.user_service.list().await {
        Ok(usernames) => Ok(Json(usernames).into_response()),
        Err(e) => Err(error_status(&e)),
    }
}
