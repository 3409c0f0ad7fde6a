use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::path::PathBuf;

use crate::extractors::CurrentUser;
use crate::handlers::error_status;
use crate::AppState;

/// 删除媒体请求
#[derive(Debug, Deserialize)]
pub struct DeleteMediaRequest {
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
}

/// 上传媒体文件
/// POST /api/media （multipart表单，字段名file）
pub async fn upload_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|name| name.to_string())
            .ok_or(StatusCode::BAD_REQUEST)?;
        let content = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

        return match state
            .media_service
            .upload(&file_name, &content, &user.username)
            .await
        {
            Ok(info) => Ok((StatusCode::CREATED, Json(info)).into_response()),
            Err(e) => Err(error_status(&e)),
        };
    }

    Err(StatusCode::BAD_REQUEST)
}

/// 列出当前用户的媒体文件
/// GET /api/media
pub async fn list_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, StatusCode> {
    match state.media_service.list_user_media(&user.username).await {
        Ok(files) => Ok(Json(files).into_response()),
        Err(e) => Err(error_status(&e)),
    }
}

/// 删除媒体文件
/// DELETE /api/media
pub async fn delete_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DeleteMediaRequest>,
) -> Result<Response, StatusCode> {
    match state
        .media_service
        .delete(&request.file_path, &user.username)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => Err(error_status(&e)),
    }
}
