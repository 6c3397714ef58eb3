//! HTTP API route definitions.

use std::any::Any;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::{Layer, ServiceExt};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_user, get_user, health, list_users, route_not_found, welcome, AppState,
};
use crate::error::ApiError;
use crate::metrics;

/// Create the API router.
///
/// Paths are matched case-insensitively and a trailing slash is optional,
/// so the rewrite happens before the inner router picks a route.
pub fn create_router(state: AppState) -> Router {
    let inner = routes().with_state(state);
    let normalized = NormalizePathLayer::trim_trailing_slash()
        .layer(ServiceExt::<Request>::map_request(inner, lowercase_path));

    Router::new()
        .fallback_service(normalized)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Route table without state or outer layers.
fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome).fallback(route_not_found))
        .route("/health", get(health).fallback(route_not_found))
        // Users endpoints
        .route(
            "/api/users",
            get(list_users).post(create_user).fallback(route_not_found),
        )
        .route("/api/users/:id", get(get_user).fallback(route_not_found))
        .fallback(route_not_found)
        .layer(middleware::from_fn(track_metrics))
}

fn lowercase_path(mut req: Request) -> Request {
    let path = req.uri().path();
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return req;
    }

    let lowered = match req.uri().query() {
        Some(query) => format!("{}?{}", path.to_ascii_lowercase(), query),
        None => path.to_ascii_lowercase(),
    };

    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = PathAndQuery::try_from(lowered).ok();
    if let Ok(uri) = Uri::from_parts(parts) {
        *req.uri_mut() = uri;
    }
    req
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().to_string();

    let response = next.run(req).await;

    metrics::record_http_request(start, &method, &endpoint, response.status().as_u16());
    response
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "<unknown>".to_string()
    };

    ApiError::internal(format!("handler panicked: {message}")).into_response()
}
