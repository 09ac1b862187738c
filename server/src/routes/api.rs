use std::fmt::Write as _;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "flowers": state.store.len(),
        "observability": {
            "list_requests_total": observability.list_requests_total,
            "lookup_requests_total": observability.lookup_requests_total,
            "lookup_misses_total": observability.lookup_misses_total,
            "flowers_created_total": observability.flowers_created_total,
            "create_conflicts_total": observability.create_conflicts_total,
            "create_rejections_total": observability.create_rejections_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = render_prometheus_metrics(state.store.len(), state.observability.snapshot());
    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(flower_count: usize, observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    write_metric(
        &mut body,
        "meadow_flowers",
        "gauge",
        "Current number of flowers in the store.",
        flower_count as u64,
    );
    write_metric(
        &mut body,
        "meadow_list_requests_total",
        "counter",
        "Total flower list requests.",
        observability.list_requests_total,
    );
    write_metric(
        &mut body,
        "meadow_lookup_requests_total",
        "counter",
        "Total flower lookups by slug.",
        observability.lookup_requests_total,
    );
    write_metric(
        &mut body,
        "meadow_lookup_misses_total",
        "counter",
        "Lookups by slug that found nothing.",
        observability.lookup_misses_total,
    );
    write_metric(
        &mut body,
        "meadow_flowers_created_total",
        "counter",
        "Total flowers planted.",
        observability.flowers_created_total,
    );
    write_metric(
        &mut body,
        "meadow_create_conflicts_total",
        "counter",
        "Create requests rejected with a duplicate slug.",
        observability.create_conflicts_total,
    );
    write_metric(
        &mut body,
        "meadow_create_rejections_total",
        "counter",
        "Create requests rejected by validation.",
        observability.create_rejections_total,
    );
    body
}

fn write_metric(body: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(body, "# HELP {name} {help}");
    let _ = writeln!(body, "# TYPE {name} {kind}");
    let _ = writeln!(body, "{name} {value}");
}

pub(crate) fn json_response<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
    cache_control: &'static str,
    etag: Option<&str>,
) -> Response {
    let Ok(bytes) = serde_json::to_vec(value) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

pub(crate) fn not_modified_response(cache_control: &'static str, etag: &str) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Ok(etag_header) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

pub(crate) fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
