//! Generic CRUD handlers, instantiated once per resource type.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use models::Resource;
use service::{
    filter::RowFilter,
    pagination::{Page, Pagination, DEFAULT_PER_PAGE},
};

use crate::errors::ApiError;
use crate::state::AppState;

/// `/api/{slug}` and `/api/{slug}/:id` for resource `R`.
pub fn routes<R: Resource>() -> Router<AppState> {
    let slug = R::KIND.slug();
    Router::new()
        .route(&format!("/api/{slug}"), get(list::<R>).post(create::<R>))
        .route(&format!("/api/{slug}/:id"), get(fetch::<R>).patch(update::<R>).delete(remove::<R>))
}

fn parse_number(params: &HashMap<String, String>, key: &str, default: usize) -> Result<usize, ApiError> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ApiError::bad_request(format!("{key} must be a non-negative integer"))),
    }
}

pub fn pagination_from_query(params: &HashMap<String, String>) -> Result<Pagination, ApiError> {
    Ok(Pagination {
        page: parse_number(params, "page", 1)?,
        per_page: parse_number(params, "per_page", DEFAULT_PER_PAGE)?,
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|e| ApiError::bad_request(e.body_text()))
}

async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<R>>, ApiError> {
    let pagination = pagination_from_query(&params)?;
    let filter = RowFilter::from_query(R::KIND, &params);
    Ok(Json(state.service::<R>().list_page(&filter, pagination).await?))
}

async fn fetch<R: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<R>, ApiError> {
    Ok(Json(state.service::<R>().get(&id).await?))
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let input = json_body(payload)?;
    let record = state.service::<R>().create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let patch = json_body(payload)?;
    Ok(Json(state.service::<R>().update(&id, patch).await?))
}

async fn remove<R: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.service::<R>().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn pagination_defaults_when_absent() {
        let p = pagination_from_query(&params(&[("companyId", "c1")])).unwrap();
        assert_eq!((p.page, p.per_page), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn pagination_rejects_garbage() {
        assert!(pagination_from_query(&params(&[("page", "two")])).is_err());
        assert!(pagination_from_query(&params(&[("per_page", "-1")])).is_err());
    }
}
