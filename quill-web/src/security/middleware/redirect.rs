use axum::extract::{Request, State};
use axum::http::{header::LOCATION, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::AppState;

/// 重定向中间件
/// 在常规分发之前查询重定向台账，命中则直接按记录的状态码跳转
pub async fn redirect_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().trim_start_matches('/').to_string();

    // API端点不参与重定向
    if path.is_empty() || path.starts_with("api/") {
        return next.run(request).await;
    }

    if let Some(redirect) = state.redirect_store.lookup(&path).await {
        info!("Redirecting {} to {}", path, redirect.new_url);

        let status = StatusCode::from_u16(redirect.status_code)
            .unwrap_or(StatusCode::MOVED_PERMANENTLY);
        return Response::builder()
            .status(status)
            .header(LOCATION, format!("/{}", redirect.new_url))
            .body(axum::body::Body::empty())
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    }

    next.run(request).await
}
