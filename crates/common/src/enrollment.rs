//! Enrollment requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an enrollment request.
///
/// Only the administrator path may move a request out of `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// An enrollment request as read back from the remote collection.
///
/// Immutable after creation except for `status`. The user and course fields
/// are snapshots taken at submission time; later changes to either record do
/// not propagate here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Identifier assigned by the remote store
    pub id: String,

    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,

    pub course_id: String,
    pub course_title: String,

    /// Submission time, milliseconds since epoch
    pub timestamp: i64,

    pub status: EnrollmentStatus,

    /// Submission time as recorded by the remote store, when present
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EnrollmentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<EnrollmentStatus>("\"approved\"").unwrap(),
            EnrollmentStatus::Approved
        );
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Pending);
    }
}
