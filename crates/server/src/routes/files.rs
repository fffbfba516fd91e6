use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use service::backend::StoredFile;

use crate::errors::ApiError;
use crate::state::AppState;

pub const FILE_NAME_HEADER: &str = "x-file-name";

/// File routes; upload bodies are capped at `max_upload_bytes`.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/files", post(upload))
        .route("/api/files/:id", get(metadata).delete(remove))
        .route("/api/files/:id/download", get(download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

fn body_error(e: BytesRejection) -> ApiError {
    let status = e.status();
    let error = if status == StatusCode::PAYLOAD_TOO_LARGE { "payload_too_large" } else { "validation" };
    ApiError::new(status, error, e.body_text())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<StoredFile>), ApiError> {
    let body = body.map_err(body_error)?;
    let name = header_str(&headers, FILE_NAME_HEADER)
        .ok_or_else(|| ApiError::bad_request(format!("{FILE_NAME_HEADER} header is required")))?;
    let mime = header_str(&headers, header::CONTENT_TYPE.as_str());
    let stored = state.files.upload(name, mime, body.to_vec()).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn metadata(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<StoredFile>, ApiError> {
    Ok(Json(state.files.metadata(&id).await?))
}

async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let (meta, bytes) = state.files.download(&id).await?;
    let content_type = HeaderValue::from_str(&meta.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = format!("attachment; filename=\"{}\"", meta.name.replace('"', ""));
    let disposition = HeaderValue::from_str(&disposition).unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    Ok(([(header::CONTENT_TYPE, content_type), (header::CONTENT_DISPOSITION, disposition)], bytes).into_response())
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.files.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
