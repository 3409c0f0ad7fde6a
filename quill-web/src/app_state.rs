use quill_infra::redirect::RedirectStore;
use quill_infra::security::JwtService;
use quill_service::{MediaService, PostService, UrlService, UserService};
use std::sync::Arc;

/// 应用状态
/// 包含所有需要的服务实例
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<dyn PostService>,
    pub user_service: Arc<dyn UserService>,
    pub media_service: Arc<dyn MediaService>,
    pub jwt_service: Arc<JwtService>,
    pub redirect_store: Arc<RedirectStore>,
    pub url_service: Arc<UrlService>,
    /// 注册新用户是否仅限管理员
    pub require_admin_for_registration: bool,
}
