//! Wire shapes for remote documents.
//!
//! Remote documents are dynamic-shaped: any field may be missing. Every
//! field here carries a default (missing `hours` → 0, missing `status` →
//! pending, missing strings → empty, missing lists → empty), so the mapping
//! from a well-formed JSON object to a record is total.

use chrono::{DateTime, Utc};
use dpo_common::{Course, Enrollment, EnrollmentStatus, User};
use serde::{Deserialize, Serialize};

/// A document paired with the identifier the remote store assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
}

/// Course document in the remote `courses` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub syllabus: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub contact_email: String,
}

impl CourseDoc {
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            duration: course.duration.clone(),
            price: course.price,
            instructor: course.instructor.clone(),
            hours: course.hours,
            syllabus: course.syllabus.clone(),
            requirements: course.requirements.clone(),
            contact_email: course.contact_email.clone(),
        }
    }

    /// Build a course record from this document under the id the remote
    /// store assigned.
    pub fn into_course(self, id: String) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            duration: self.duration,
            price: self.price,
            instructor: self.instructor,
            hours: self.hours,
            syllabus: self.syllabus,
            requirements: self.requirements,
            contact_email: self.contact_email,
        }
    }
}

/// Enrollment document in the remote `enrollments` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDoc {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl EnrollmentDoc {
    /// Snapshot of a user's request to enroll in a course, taken at
    /// submission time.
    pub fn new(user: &User, course: &Course, timestamp: i64) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_phone: user.phone.clone(),
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            timestamp,
            status: EnrollmentStatus::Pending,
            created_at: Some(Utc::now()),
        }
    }

    pub fn into_enrollment(self, id: String) -> Enrollment {
        Enrollment {
            id,
            user_id: self.user_id,
            user_name: self.user_name,
            user_email: self.user_email,
            user_phone: self.user_phone,
            course_id: self.course_id,
            course_title: self.course_title,
            timestamp: self.timestamp,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// User document in the remote `users` collection, keyed by user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl UserDoc {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            enrolled_courses: user.enrolled_courses.clone(),
            last_updated: Some(Utc::now()),
        }
    }

    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            enrolled_courses: self.enrolled_courses,
        }
    }
}
