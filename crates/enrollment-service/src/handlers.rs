//! API request handlers for the enrollment service

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dpo_common::{Course, Enrollment, EnrollmentStatus, Error, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::accounts::{Accounts, LoginOutcome};
use crate::admin::AdminPanel;
use crate::catalog::CatalogStore;
use crate::query::{filter_courses, ALL_CATEGORIES};
use crate::recorder::{EnrollOutcome, EnrollmentRecorder};

/// Shared application state
pub struct AppState {
    pub catalog: CatalogStore,
    pub accounts: Accounts,
    pub recorder: EnrollmentRecorder,
    pub admin: AdminPanel,
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

/// Catalog listing query
#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
}

/// List of courses matching the query
#[derive(Debug, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
    pub total: usize,
}

/// Request to register or log in
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Response from registration/login
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    /// True when an existing record was restored rather than created
    pub restored: bool,
}

/// Request to enroll the current user in a course
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: String,
}

/// Response from a successful enrollment
#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub success: bool,
    pub user: User,
}

/// Generic success/message response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Admin login request
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// List of registered users
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// List of enrollment requests
#[derive(Debug, Serialize)]
pub struct EnrollmentsResponse {
    pub enrollments: Vec<Enrollment>,
    pub total: usize,
}

/// Request to change an enrollment status
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: EnrollmentStatus,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "enrollment-service"
    }))
}

/// List courses, filtered by search text and category
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
) -> Json<CoursesResponse> {
    let category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let courses = state.catalog.load().await;
    let courses = filter_courses(&courses, &query.search, category);
    let total = courses.len();

    Json(CoursesResponse { courses, total })
}

/// Get a single course by id
pub async fn get_course_handler(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let courses = state.catalog.load().await;

    courses
        .into_iter()
        .find(|course| course.id == course_id)
        .map(Json)
        .ok_or_else(|| ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("Course not found: {course_id}"),
        })
}

/// Register a new user or restore a returning one
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    info!("Registration attempt for email: {}", payload.email);

    let outcome = state
        .accounts
        .register_or_login(&payload.name, &payload.email, &payload.phone)
        .await?;

    let (user, restored) = match outcome {
        LoginOutcome::Restored(user) => (user, true),
        LoginOutcome::Registered(user) => (user, false),
    };

    Ok(Json(RegisterResponse { user, restored }))
}

/// Current session profile
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<User>, ApiError> {
    state.accounts.current_user().await?.map(Json).ok_or_else(|| ApiError {
        status: StatusCode::NOT_FOUND,
        message: "No active session".to_string(),
    })
}

/// Clear the current session
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.accounts.logout().await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Session cleared".to_string(),
    }))
}

/// Enroll the current user in a course
pub async fn enroll_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EnrollRequest>,
) -> Result<Json<EnrollResponse>, ApiError> {
    let user = state.accounts.current_user().await?.ok_or_else(|| ApiError {
        status: StatusCode::UNAUTHORIZED,
        message: "Registration required before enrolling".to_string(),
    })?;

    let courses = state.catalog.load().await;
    let course = courses
        .into_iter()
        .find(|course| course.id == payload.course_id)
        .ok_or_else(|| ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("Course not found: {}", payload.course_id),
        })?;

    match state.recorder.enroll(&user, &course).await? {
        EnrollOutcome::Enrolled(user) => Ok(Json(EnrollResponse {
            success: true,
            user,
        })),
        EnrollOutcome::AlreadyEnrolled => Err(ApiError {
            status: StatusCode::CONFLICT,
            message: format!("Already enrolled in course: {}", course.id),
        }),
    }
}

/// Administrator login
pub async fn admin_login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<User>, ApiError> {
    match state.admin.login(&payload.email, &payload.password).await? {
        Some(admin) => Ok(Json(admin)),
        None => Err(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid administrator credentials".to_string(),
        }),
    }
}

/// List all registered users (admin)
pub async fn admin_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.admin.list_users().await?;
    let total = users.len();

    Ok(Json(UsersResponse { users, total }))
}

/// List all enrollment requests, newest first (admin)
pub async fn admin_enrollments_handler(
    State(state): State<Arc<AppState>>,
) -> Json<EnrollmentsResponse> {
    let enrollments = state.admin.list_enrollments().await;
    let total = enrollments.len();

    Json(EnrollmentsResponse { enrollments, total })
}

/// Change the status of an enrollment request (admin)
pub async fn admin_set_status_handler(
    State(state): State<Arc<AppState>>,
    Path(enrollment_id): Path<String>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let updated = state
        .admin
        .set_enrollment_status(&enrollment_id, payload.status)
        .await?;

    if updated {
        Ok(Json(StatusResponse {
            success: true,
            message: format!("Enrollment {enrollment_id} updated"),
        }))
    } else {
        Err(ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("Enrollment not found: {enrollment_id}"),
        })
    }
}
