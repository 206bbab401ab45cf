//! In-memory remote document store for mock mode and tests.
//!
//! Simulates the remote collections without requiring an actual document
//! API. The `set_unavailable` switch makes every call fail, which is how
//! tests exercise the remote-outage paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dpo_common::{Course, Enrollment, EnrollmentStatus, Error, Result, User};
use tokio::sync::RwLock;
use tracing::debug;

use crate::docs::{CourseDoc, EnrollmentDoc, UserDoc};
use crate::remote::RemoteStore;

#[derive(Default)]
pub struct MemoryRemote {
    courses: RwLock<Vec<(String, CourseDoc)>>,
    enrollments: RwLock<Vec<(String, EnrollmentDoc)>>,
    users: RwLock<HashMap<String, UserDoc>>,
    unavailable: AtomicBool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, simulating a remote outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Remote("remote store unavailable".to_string()));
        }
        Ok(())
    }

    fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.check_available()?;

        let courses = self.courses.read().await;
        Ok(courses
            .iter()
            .map(|(id, doc)| doc.clone().into_course(id.clone()))
            .collect())
    }

    async fn insert_course(&self, doc: &CourseDoc) -> Result<String> {
        self.check_available()?;

        let id = Self::generate_id();
        self.courses.write().await.push((id.clone(), doc.clone()));
        debug!("Mock remote: inserted course {}", id);
        Ok(id)
    }

    async fn insert_enrollment(&self, doc: &EnrollmentDoc) -> Result<String> {
        self.check_available()?;

        let id = Self::generate_id();
        self.enrollments
            .write()
            .await
            .push((id.clone(), doc.clone()));
        debug!("Mock remote: inserted enrollment {}", id);
        Ok(id)
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.check_available()?;

        let enrollments = self.enrollments.read().await;
        let mut all: Vec<Enrollment> = enrollments
            .iter()
            .map(|(id, doc)| doc.clone().into_enrollment(id.clone()))
            .collect();

        all.sort_by_key(|e| std::cmp::Reverse(e.timestamp));

        Ok(all)
    }

    async fn set_enrollment_status(&self, id: &str, status: EnrollmentStatus) -> Result<bool> {
        self.check_available()?;

        let mut enrollments = self.enrollments.write().await;
        match enrollments.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, doc)) => {
                doc.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        self.check_available()?;

        self.users
            .write()
            .await
            .insert(user.id.clone(), UserDoc::from_user(user));
        debug!("Mock remote: upserted user {}", user.id);
        Ok(())
    }

    async fn update_user_courses(&self, user_id: &str, course_ids: &[String]) -> Result<bool> {
        self.check_available()?;

        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(doc) => {
                doc.enrolled_courses = course_ids.to_vec();
                doc.last_updated = Some(chrono::Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check_available()?;

        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|doc| doc.email == email)
            .map(|doc| doc.clone().into_user()))
    }
}
