//! HTTP API module: the user endpoints plus welcome and health.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
