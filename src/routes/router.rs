/**
 * Router Configuration
 *
 * Builds the application router:
 *
 * - Public routes: login/signup pages and handlers, logout
 * - Protected routes: the event surface, wrapped in the session gate
 * - Static files under /static, uploaded images under /uploads
 * - A panic-catching layer so even a panicking handler answers a
 *   generic 500
 *
 * The gate is attached with `route_layer` on the protected sub-router,
 * so it runs for exactly those routes no matter how the routers are
 * merged.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, get_service, post};
use axum::{middleware, Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::auth::handlers::{login, logout, signup};
use crate::events::handlers::{
    create_event, delete_event, get_event, list_events, update_event,
};
use crate::middleware::auth::require_session;
use crate::server::state::AppState;

/// Convert a handler panic into a generic 500.
///
/// The panic payload is logged and never reaches the client.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "internal server error" })),
    )
        .into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

/// Create the axum router with all routes configured.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Route Details
///
/// ## Public
///
/// - `GET /login`, `GET /signup` - static form pages
/// - `POST /login` - credential check, session cookie on success
/// - `POST /signup` - account registration
/// - `GET /logout` - session teardown, no-op when anonymous
///
/// ## Protected (session gate)
///
/// - `GET /events` - list events
/// - `GET /events/{id}` - fetch one event
/// - `POST /createEvent` - create an event, triggers the confirmation
///   email
/// - `PUT /events/{id}` - update an event
/// - `DELETE /events/{id}` - delete an event
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route(
            "/login",
            get_service(ServeFile::new("public/login.html")).post(login),
        )
        .route(
            "/signup",
            get_service(ServeFile::new("public/signup.html")).post(signup),
        )
        .route("/logout", get(logout));

    let protected = Router::new()
        .route("/events", get(list_events))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/createEvent", post(create_event))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/static", ServeDir::new("public"))
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
