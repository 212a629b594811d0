//! Generic CRUD handlers, instantiated once per [`Record`] kind.
//!
//! Every mutating handler goes through [`parse_draft`] (sanitize, then
//! validate) before a record is built; every response goes through
//! [`project`] with the kind's public allow-list.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::records::{parse_draft, Record, WriteContext};
use crate::security::projection::{project, project_all};
use crate::security::rate_limit::ClientKey;

/// `GET|POST {base}` and `GET|PUT|DELETE {base}/{id}` for `R`.
pub fn router<R: Record>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(fetch::<R>).put(update::<R>).delete(remove::<R>),
        )
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("invalid id".to_string()))
}

pub(crate) fn shape<R: Record>(record: &R) -> Result<Value, ApiError> {
    project(record, &R::PUBLIC).map_err(ApiError::internal)
}

async fn list<R: Record>(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let records = R::collection(&state.store).list();
    let body = project_all(&records, &R::PUBLIC).map_err(ApiError::internal)?;
    Ok(Json(body))
}

async fn fetch<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let record = R::collection(&state.store)
        .get(&id)
        .ok_or(ApiError::NotFound(R::LABEL))?;
    Ok(Json(shape(&record)?))
}

async fn create<R: Record>(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(raw) = payload?;
    let draft = parse_draft::<R>(&raw)?;

    let record = R::create(Uuid::new_v4(), draft, &WriteContext::new(client));
    let id = record.id();
    let body = shape(&record)?;
    R::collection(&state.store).insert(id, record);

    tracing::info!(kind = R::LABEL, %id, "Record created");
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update<R: Record>(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let Json(raw) = payload?;
    let draft = parse_draft::<R>(&raw)?;

    let ctx = WriteContext::new(client);
    let record = R::collection(&state.store)
        .update(&id, |record| record.apply(draft, &ctx))
        .ok_or(ApiError::NotFound(R::LABEL))?;

    tracing::info!(kind = R::LABEL, %id, "Record updated");
    Ok(Json(shape(&record)?))
}

async fn remove<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    R::collection(&state.store)
        .remove(&id)
        .ok_or(ApiError::NotFound(R::LABEL))?;

    tracing::info!(kind = R::LABEL, %id, "Record deleted");
    Ok(Json(json!({ "success": format!("{} deleted", R::LABEL) })))
}
