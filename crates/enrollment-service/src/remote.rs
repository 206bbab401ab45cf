//! Remote document store seam.
//!
//! The core depends on a document store only through this trait: insert with
//! a generated id, list with optional ordering, lookup by exact field match,
//! and upsert/update by key. Any backend that can do those four things fits;
//! the service ships an HTTP client ([`crate::remote_client::HttpRemote`])
//! and an in-memory mock ([`crate::mock_remote::MemoryRemote`]).

use async_trait::async_trait;
use dpo_common::{Course, Enrollment, EnrollmentStatus, Result, User};

use crate::docs::{CourseDoc, EnrollmentDoc};

pub const COLLECTION_COURSES: &str = "courses";
pub const COLLECTION_ENROLLMENTS: &str = "enrollments";
pub const COLLECTION_USERS: &str = "users";

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All courses in the remote collection.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Insert a course document; returns the generated id.
    async fn insert_course(&self, doc: &CourseDoc) -> Result<String>;

    /// Append an enrollment request; returns the generated id.
    async fn insert_enrollment(&self, doc: &EnrollmentDoc) -> Result<String>;

    /// All enrollment requests, newest first.
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>>;

    /// Change the status of an enrollment request. Returns false when no
    /// request with that id exists.
    async fn set_enrollment_status(&self, id: &str, status: EnrollmentStatus) -> Result<bool>;

    /// Insert or replace the user document keyed by `user.id`.
    async fn upsert_user(&self, user: &User) -> Result<()>;

    /// Replace the enrolled-course list on an existing user document.
    /// Returns false when no document with that id exists.
    async fn update_user_courses(&self, user_id: &str, course_ids: &[String]) -> Result<bool>;

    /// Find a user document by exact email match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
