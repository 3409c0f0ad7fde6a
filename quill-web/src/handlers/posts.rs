use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_domain::{BlogPost, PublishStatus};
use quill_service::{PostQuery, SortField};
use serde::{Deserialize, Serialize};

use crate::extractors::CurrentUser;
use crate::handlers::error_status;
use crate::AppState;

/// 创建Post请求
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(rename = "featuredImage", default)]
    pub featured_image: String,

    #[serde(default)]
    pub publish: bool,
}

impl CreatePostRequest {
    fn into_post(self) -> BlogPost {
        BlogPost {
            title: self.title,
            slug: self.slug,
            description: self.description,
            content: self.content,
            tags: self.tags,
            categories: self.categories,
            featured_image: self.featured_image,
            status: if self.publish {
                PublishStatus::Published
            } else {
                PublishStatus::Draft
            },
            ..Default::default()
        }
    }
}

/// 更新Post请求（字段与创建请求一致）
pub type UpdatePostRequest = CreatePostRequest;

/// Post列表查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,

    #[serde(default)]
    pub include_drafts: bool,

    pub search_query: Option<String>,
    pub sort_by: Option<String>,

    #[serde(default = "default_descending")]
    pub descending: bool,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

fn default_descending() -> bool {
    true
}

/// Post列表响应
#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<BlogPost>,

    #[serde(rename = "totalPosts")]
    pub total_posts: usize,

    pub page: u32,

    #[serde(rename = "pageSize")]
    pub page_size: u32,

    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// 创建Post
/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response, StatusCode> {
    if !user.can_publish() {
        return Err(StatusCode::FORBIDDEN);
    }

    match state.post_service.create(request.into_post(), &user).await {
        Ok(post) => Ok((StatusCode::CREATED, Json(post)).into_response()),
        Err(e) => Err(error_status(&e)),
    }
}

/// 按slug获取Post
/// GET /api/posts/{slug}
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, StatusCode> {
    match state.post_service.get_by_slug(&slug).await {
        Ok(Some(post)) => Ok(Json(post).into_response()),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status(&e)),
    }
}

/// 列出Posts
/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<ListPostsParams>,
) -> Result<Response, StatusCode> {
    // 草稿只对已认证用户可见
    let include_drafts = params.include_drafts && user.is_some();

    let query = PostQuery {
        page: params.page,
        page_size: params.page_size,
        category: params.category,
        tag: params.tag,
        author: params.author,
        include_drafts,
        search: params.search_query,
        sort_by: params
            .sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or_default(),
        descending: params.descending,
    };

    match state.post_service.list(query).await {
        Ok(result) => {
            let has_more = (params.page as usize) * (params.page_size as usize) < result.total;
            Ok(Json(ListPostsResponse {
                posts: result.posts,
                total_posts: result.total,
                page: params.page,
                page_size: params.page_size,
                has_more,
            })
            .into_response())
        }
        Err(e) => Err(error_status(&e)),
    }
}

/// 更新Post
/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Response, StatusCode> {
    match state
        .post_service
        .update(&id, request.into_post(), &user.username)
        .await
    {
        Ok(post) => Ok(Json(post).into_response()),
        Err(e) => Err(error_status(&e)),
    }
}

/// 删除Post
/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, StatusCode> {
    match state.post_service.delete(&id, &user.username).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => Err(error_status(&e)),
    }
}
