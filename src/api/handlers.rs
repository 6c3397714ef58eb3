//! HTTP API handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use super::extract::RequestBody;
use crate::error::ApiError;
use crate::metrics;
use crate::users::{find_user, parse_user_id, seed_users, CreatedUser, NewUser, User};
use crate::utils::now_iso;
use crate::validation::{validate, CREATE_USER_SCHEMA, EMAIL_FIELD, NAME_FIELD};

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to Express GitHub Actions Sample API";
/// API version reported by `GET /`.
pub const API_VERSION: &str = "1.0.0";

/// Application state shared with handlers.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    /// When the process started serving.
    pub started_at: Instant,
}

impl AppState {
    /// Create new app state, stamping the start time.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Seconds since start.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Welcome response.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Greeting.
    pub message: &'static str,
    /// API version.
    pub version: &'static str,
    /// ISO-8601 time of the response.
    pub timestamp: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Seconds since process start.
    pub uptime: f64,
    /// ISO-8601 time of the response.
    pub timestamp: String,
}

/// User listing.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: &'static [User],
}

/// A single user.
#[derive(Debug, Serialize)]
pub struct UserResponse<'a> {
    pub user: &'a User,
}

/// Response to a successful create.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: CreatedUser,
    pub message: &'static str,
}

/// Welcome handler.
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
        version: API_VERSION,
        timestamp: now_iso(),
    })
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: state.uptime_secs(),
        timestamp: now_iso(),
    })
}

/// List the seed users.
pub async fn list_users() -> Json<UsersResponse> {
    Json(UsersResponse {
        users: seed_users(),
    })
}

/// Fetch one seed user by id.
#[instrument]
pub async fn get_user(
    Path(raw_id): Path<String>,
) -> Result<Json<UserResponse<'static>>, ApiError> {
    parse_user_id(&raw_id)
        .and_then(find_user)
        .map(|user| Json(UserResponse { user }))
        .ok_or(ApiError::UserNotFound)
}

/// Validate the body and echo back a freshly minted user.
#[instrument(skip(body))]
pub async fn create_user(
    RequestBody(body): RequestBody,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let mut fields = validate(body, CREATE_USER_SCHEMA)?;

    let user = NewUser {
        name: fields.take(NAME_FIELD),
        email: fields.take(EMAIL_FIELD),
    }
    .into_user();

    info!(id = user.id, "user created");
    metrics::inc_users_created();

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user,
            message: "User created successfully",
        }),
    ))
}

/// Fallback for anything no route matches.
pub async fn route_not_found() -> ApiError {
    metrics::inc_routes_not_found();
    ApiError::RouteNotFound
}
