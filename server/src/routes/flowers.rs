use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use meadow_shared::path::is_slug;
use meadow_shared::{CreateFlower, XRange};
use tracing::{debug, info, warn};

use crate::routes::api::{if_none_match_matches, json_response, not_modified_response};
use crate::state::AppState;
use crate::store::CreateError;

/// Flowers never change once planted, so lookups can be cached aggressively.
const FLOWER_CACHE_CONTROL: &str = "public, max-age=3600";

pub async fn list_flowers(
    State(state): State<AppState>,
    Query(range): Query<XRange>,
) -> Response {
    state.observability.record_list_request();
    if let (Some(min), Some(max)) = (range.min_x, range.max_x)
        && min > max
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let flowers = state.store.list(range, state.max_list);
    debug!(count = flowers.len(), ?range, "listed flowers");
    json_response(StatusCode::OK, &flowers, "no-store", None)
}

pub async fn get_flower(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let found = if is_slug(&slug) {
        state.store.get(&slug)
    } else {
        None
    };
    state.observability.record_lookup(found.is_some());

    let Some(flower) = found else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let etag = flower_etag(&flower.slug);
    if if_none_match_matches(&headers, &etag) {
        return not_modified_response(FLOWER_CACHE_CONTROL, &etag);
    }
    json_response(StatusCode::OK, &flower, FLOWER_CACHE_CONTROL, Some(&etag))
}

pub async fn create_flower(
    State(state): State<AppState>,
    Json(input): Json<CreateFlower>,
) -> Response {
    match state.store.create(input, Utc::now()) {
        Ok(flower) => {
            state.observability.record_created();
            info!(
                slug = %flower.slug,
                x = flower.x(),
                y = flower.y(),
                category = %flower.category,
                "flower planted"
            );
            json_response(StatusCode::CREATED, &flower, "no-store", None)
        }
        Err(err) => {
            match &err {
                CreateError::Validation(_) => state.observability.record_rejection(),
                CreateError::Conflict(_) => state.observability.record_conflict(),
            }
            create_error_response(&err)
        }
    }
}

fn create_error_response(err: &CreateError) -> Response {
    let status = match err {
        CreateError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CreateError::Conflict(slug) => {
            warn!(%slug, "slug space exhausted for create request");
            StatusCode::CONFLICT
        }
    };
    json_response(
        status,
        &serde_json::json!({ "error": err.to_string() }),
        "no-store",
        None,
    )
}

fn flower_etag(slug: &str) -> String {
    format!("\"flower-{slug}\"")
}
