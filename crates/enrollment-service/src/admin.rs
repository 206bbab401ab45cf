//! Administrator panel: users, enrollment requests, status changes.
//!
//! The credential check is a hardcoded match kept for the demo; hardening it
//! is explicitly out of scope.

use std::sync::Arc;

use dpo_common::{Enrollment, EnrollmentStatus, Result, User};
use tracing::{info, warn};
use user_directory::{Directory, SessionStore};

use crate::remote::RemoteStore;

pub const ADMIN_EMAIL: &str = "admin@dpo.ru";
pub const ADMIN_PASSWORD: &str = "admin123";

const ADMIN_USER_ID: &str = "admin_001";

/// Exact-match credential check for the demo administrator.
pub fn verify_credentials(email: &str, password: &str) -> bool {
    email.trim() == ADMIN_EMAIL && password.trim() == ADMIN_PASSWORD
}

/// Heuristic used to flag administrator accounts by address.
pub fn is_admin_email(email: &str) -> bool {
    email.contains("admin") || email.ends_with("@dpo.ru")
}

#[derive(Clone)]
pub struct AdminPanel {
    directory: Directory,
    session: SessionStore,
    remote: Arc<dyn RemoteStore>,
}

impl AdminPanel {
    pub fn new(directory: Directory, session: SessionStore, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            directory,
            session,
            remote,
        }
    }

    /// Sign in as the administrator. On a credential match the fixed admin
    /// user is stored in the directory and becomes the current session;
    /// otherwise nothing is written and `None` is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        if !verify_credentials(email, password) {
            return Ok(None);
        }

        let admin = User {
            id: ADMIN_USER_ID.to_string(),
            name: "Администратор".to_string(),
            email: ADMIN_EMAIL.to_string(),
            phone: "+79990000000".to_string(),
            enrolled_courses: vec![],
        };

        self.directory.upsert_user(&admin).await?;
        self.session.set_current(&admin).await?;

        info!("Administrator signed in");
        Ok(Some(admin))
    }

    /// All locally registered users.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.directory.list_all().await
    }

    /// All enrollment requests, newest first. An unreachable remote yields
    /// an empty list rather than an error.
    pub async fn list_enrollments(&self) -> Vec<Enrollment> {
        match self.remote.list_enrollments().await {
            Ok(enrollments) => enrollments,
            Err(e) => {
                warn!("Failed to load enrollment requests: {}", e);
                Vec::new()
            }
        }
    }

    /// Change the status of an enrollment request. This is the only path
    /// that mutates an enrollment after creation.
    pub async fn set_enrollment_status(
        &self,
        enrollment_id: &str,
        status: EnrollmentStatus,
    ) -> Result<bool> {
        let updated = self.remote.set_enrollment_status(enrollment_id, status).await?;
        if updated {
            info!("Enrollment {} status set to {:?}", enrollment_id, status);
        }
        Ok(updated)
    }
}
