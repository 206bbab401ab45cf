//! User records and identifier generation

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A registered user.
///
/// Users are identified across sessions by their natural keys (email,
/// case-insensitively, and phone) rather than by a login credential. The
/// `enrolled_courses` collection is order-irrelevant; duplicate prevention is
/// the caller's job, not the store's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Generated identifier, see [`generate_user_id`]
    pub id: String,

    /// Display name
    pub name: String,

    /// Email, used case-insensitively as the primary natural key
    pub email: String,

    /// Phone, used exactly as the secondary natural key; may be blank
    pub phone: String,

    /// Identifiers of courses the user has enrolled in
    pub enrolled_courses: Vec<String>,
}

impl User {
    /// Whether the user already enrolled in the given course.
    pub fn has_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    /// A copy of this user with `course_id` appended to the enrolled set.
    pub fn with_enrollment(&self, course_id: &str) -> User {
        let mut updated = self.clone();
        updated.enrolled_courses.push(course_id.to_string());
        updated
    }
}

/// Generate a user identifier from the creation time and a hash of the email.
///
/// The format is `user_<millis>_<8 hex chars of sha256(lowercased email)>`,
/// which makes collisions between distinct registrations unlikely without
/// requiring a central id allocator.
pub fn generate_user_id(email: &str, now_ms: i64) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    let fingerprint = hex::encode(digest);
    format!("user_{}_{}", now_ms, &fingerprint[..8])
}
