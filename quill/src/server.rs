use axum::{
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use quill_infra::fs::{FileSystemService, LocalFileSystemService};
use quill_infra::metadata::MetadataStore;
use quill_infra::redirect::RedirectStore;
use quill_infra::security::JwtService;
use quill_service::{
    BcryptPasswordService, FileBackedMediaService, FileBackedPostService, FileBackedUserService,
    MediaService, PasswordService, PostService, UrlService, UserService,
};
use quill_web::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;

/// 创建应用路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // 认证相关路由
        .route("/api/auth/register", post(quill_web::register))
        .route("/api/auth/login", post(quill_web::login))
        .route("/api/auth/profile", get(quill_web::get_profile))
        // 用户管理路由
        .route("/api/users", get(quill_web::list_users))
        // 文章管理路由
        .route(
            "/api/posts",
            get(quill_web::list_posts).post(quill_web::create_post),
        )
        .route(
            "/api/posts/:slug_or_id",
            get(quill_web::get_post)
                .put(quill_web::update_post)
                .delete(quill_web::delete_post),
        )
        // 媒体管理路由
        .route(
            "/api/media",
            get(quill_web::list_media)
                .post(quill_web::upload_media)
                .delete(quill_web::delete_media),
        )
        .layer(
            ServiceBuilder::new()
                // ServiceBuilder中先添加的层在请求时先执行（最外层）
                //
                // 请求路径上的执行顺序：
                // CORS -> trace -> redirect -> auth -> handler
                .layer(TraceLayer::new_for_http())
                // 重定向中间件（改名后的旧链接按记录跳转）
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    |state: State<AppState>, request: Request<axum::body::Body>, next: Next| async move {
                        quill_web::redirect_middleware(state, request, next).await
                    },
                ))
                // 认证中间件（在handler前注入用户信息）
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    |state: State<AppState>, request: Request<axum::body::Body>, next: Next| async move {
                        quill_web::auth_middleware(state, request, next).await
                    },
                )),
        )
        // Router::layer中后添加的层在最外层，保持CORS在请求路径最前
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 健康检查端点
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 初始化应用状态
/// 创建内容目录结构并装配各个服务
pub async fn init_app_state(config: &Config) -> Result<AppState> {
    let local_fs = LocalFileSystemService::new(config.blog.content_root.clone())?;
    local_fs.initialize().await?;
    let fs: Arc<dyn FileSystemService> = Arc::new(local_fs);

    let metadata = Arc::new(MetadataStore::new(fs.clone()));

    // 重定向表从磁盘加载，文件缺失时从空表开始
    let redirect_store = Arc::new(RedirectStore::new(fs.clone()));
    redirect_store.load().await?;

    let jwt_service = Arc::new(JwtService::new(
        &config.security.jwt_secret,
        config.security.jwt_issuer.clone(),
        config.security.jwt_expiration,
    ));

    let password_service: Arc<dyn PasswordService> = Arc::new(BcryptPasswordService::with_cost(
        config.security.bcrypt_cost,
    ));

    let url_service = Arc::new(UrlService::new(&config.blog.base_url));

    let post_service: Arc<dyn PostService> = Arc::new(FileBackedPostService::new(
        fs.clone(),
        metadata.clone(),
        redirect_store.clone(),
    ));

    let user_service: Arc<dyn UserService> = Arc::new(FileBackedUserService::new(
        fs.clone(),
        password_service.clone(),
        jwt_service.clone(),
    ));

    let media_service: Arc<dyn MediaService> = Arc::new(FileBackedMediaService::new(
        fs.clone(),
        url_service.clone(),
    ));

    Ok(AppState {
        post_service,
        user_service,
        media_service,
        jwt_service,
        redirect_store,
        url_service,
        require_admin_for_registration: config.blog.require_admin_for_registration,
    })
}
