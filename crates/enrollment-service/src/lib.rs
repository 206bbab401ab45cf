//! Course catalog and enrollment backend.
//!
//! The algorithmic core is the identity/enrollment reconciliation logic:
//! users are re-identified by natural keys (email, phone) without a
//! credential, enrollments commit locally first and mirror to the remote
//! document store best-effort, and the catalog falls back to an embedded
//! sample set when the remote is empty or unreachable. The REST surface
//! carries no logic of its own; any HTTP client is the "UI".

pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod mock_remote;
pub mod query;
pub mod recorder;
pub mod remote;
pub mod remote_client;
pub mod sync;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use accounts::{Accounts, LoginOutcome};
pub use admin::AdminPanel;
pub use catalog::CatalogStore;
pub use config::Config;
pub use handlers::AppState;
pub use mock_remote::MemoryRemote;
pub use recorder::{EnrollOutcome, EnrollmentRecorder};
pub use remote::RemoteStore;
pub use remote_client::HttpRemote;
pub use sync::{SyncHandle, SyncJob};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/courses", get(handlers::list_courses_handler))
        .route("/api/courses/:course_id", get(handlers::get_course_handler))
        .route("/api/register", post(handlers::register_handler))
        .route("/api/profile", get(handlers::profile_handler))
        .route("/api/logout", post(handlers::logout_handler))
        .route("/api/enrollments", post(handlers::enroll_handler))
        .route("/api/admin/login", post(handlers::admin_login_handler))
        .route("/api/admin/users", get(handlers::admin_users_handler))
        .route(
            "/api/admin/enrollments",
            get(handlers::admin_enrollments_handler),
        )
        .route(
            "/api/admin/enrollments/:enrollment_id/status",
            put(handlers::admin_set_status_handler),
        )
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
