use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use quill_domain::AuthenticatedUser;

/// 当前用户提取器
/// 从请求扩展中提取认证中间件注入的用户信息
pub struct CurrentUser(pub AuthenticatedUser);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
