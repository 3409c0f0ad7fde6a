use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;

/// 认证中间件
/// 校验Bearer令牌并把用户信息注入请求扩展
/// 无令牌或校验失败时照常放行，由各handler自行决定是否要求认证
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.jwt_service.verify(token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims.to_authenticated_user());
            }
            Err(e) => {
                // 过期或伪造的令牌按未认证处理
                tracing::debug!("Token verification failed: {}", e);
            }
        }
    }

    next.run(request).await
}
