//! Enrollment recorder: local commit, then best-effort remote mirror

use chrono::Utc;
use dpo_common::{Course, Result, User};
use tracing::{debug, info};
use user_directory::{Directory, SessionStore};

use crate::docs::EnrollmentDoc;
use crate::sync::{SyncHandle, SyncJob};

/// Outcome of an enrollment attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollOutcome {
    /// The user was enrolled; carries the updated record.
    Enrolled(User),

    /// The user had already enrolled in this course; nothing was written.
    AlreadyEnrolled,
}

/// Records a user's intent to enroll in a course and keeps derived state
/// consistent.
///
/// The local directory write is synchronous and authoritative: once it
/// succeeds, the enrollment is final. The enrollment-request snapshot and
/// the remote user mirror are submitted to the background sync queue and
/// may be lost on remote failure without affecting local state.
#[derive(Clone)]
pub struct EnrollmentRecorder {
    directory: Directory,
    session: SessionStore,
    sync: SyncHandle,
}

impl EnrollmentRecorder {
    pub fn new(directory: Directory, session: SessionStore, sync: SyncHandle) -> Self {
        Self {
            directory,
            session,
            sync,
        }
    }

    /// Enroll `user` in `course`.
    ///
    /// Duplicate enrollments are reported as [`EnrollOutcome::AlreadyEnrolled`]
    /// with no writes. A failing directory write aborts before the session
    /// update and before any remote submission.
    pub async fn enroll(&self, user: &User, course: &Course) -> Result<EnrollOutcome> {
        if user.has_enrolled(&course.id) {
            debug!(
                "User {} is already enrolled in course {}",
                user.id, course.id
            );
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let updated = user.with_enrollment(&course.id);

        self.directory.upsert_user(&updated).await?;
        self.session.set_current(&updated).await?;

        let timestamp = Utc::now().timestamp_millis();
        self.sync.submit(SyncJob::RecordEnrollment(EnrollmentDoc::new(
            &updated, course, timestamp,
        )));
        self.sync.submit(SyncJob::MirrorCourses {
            user_id: updated.id.clone(),
            course_ids: updated.enrolled_courses.clone(),
        });

        info!("User {} enrolled in course {}", updated.id, course.id);

        Ok(EnrollOutcome::Enrolled(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_courses;
    use crate::mock_remote::MemoryRemote;
    use crate::remote::RemoteStore;
    use crate::sync;
    use std::sync::Arc;
    use user_directory::MemoryKv;

    struct Fixture {
        recorder: EnrollmentRecorder,
        directory: Directory,
        session: SessionStore,
        remote: Arc<MemoryRemote>,
        sync: SyncHandle,
    }

    fn fixture() -> Fixture {
        let kv = Arc::new(MemoryKv::new());
        let directory = Directory::new(kv.clone());
        let session = SessionStore::new(kv);
        let remote = Arc::new(MemoryRemote::new());
        let sync = sync::spawn(remote.clone(), 16);
        let recorder = EnrollmentRecorder::new(directory.clone(), session.clone(), sync.clone());

        Fixture {
            recorder,
            directory,
            session,
            remote,
            sync,
        }
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Анна".to_string(),
            email: "anna@x.com".to_string(),
            phone: String::new(),
            enrolled_courses: vec![],
        }
    }

    #[tokio::test]
    async fn test_enroll_commits_locally_before_any_remote_write() {
        let f = fixture();
        let course = &sample_courses()[0];

        let outcome = f.recorder.enroll(&user(), course).await.unwrap();

        let updated = match outcome {
            EnrollOutcome::Enrolled(u) => u,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(updated.enrolled_courses, vec![course.id.clone()]);

        // Both halves of the dual write landed immediately.
        let stored = f.directory.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.enrolled_courses, vec![course.id.clone()]);
        let session = f.session.current().await.unwrap().unwrap();
        assert_eq!(session.enrolled_courses, vec![course.id.clone()]);
    }

    #[tokio::test]
    async fn test_enroll_mirrors_to_remote_in_background() {
        let f = fixture();
        f.remote.upsert_user(&user()).await.unwrap();
        let course = &sample_courses()[0];

        f.recorder.enroll(&user(), course).await.unwrap();
        f.sync.flush().await;

        let enrollments = f.remote.list_enrollments().await.unwrap();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].user_id, "u1");
        assert_eq!(enrollments[0].course_id, course.id);
        assert_eq!(enrollments[0].course_title, course.title);

        let mirrored = f
            .remote
            .find_user_by_email("anna@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mirrored.enrolled_courses, vec![course.id.clone()]);
    }

    #[tokio::test]
    async fn test_remote_failure_never_rolls_back_local_state() {
        let f = fixture();
        f.remote.set_unavailable(true);
        let course = &sample_courses()[0];

        // No error escapes the caller.
        let outcome = f.recorder.enroll(&user(), course).await.unwrap();
        assert!(matches!(outcome, EnrollOutcome::Enrolled(_)));
        f.sync.flush().await;

        // Local state is authoritative despite the lost mirror writes.
        let stored = f.directory.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.enrolled_courses, vec![course.id.clone()]);

        f.remote.set_unavailable(false);
        assert!(f.remote.list_enrollments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_enroll_is_reported_and_writes_nothing() {
        let f = fixture();
        let course = &sample_courses()[0];

        let updated = match f.recorder.enroll(&user(), course).await.unwrap() {
            EnrollOutcome::Enrolled(u) => u,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let outcome = f.recorder.enroll(&updated, course).await.unwrap();
        assert_eq!(outcome, EnrollOutcome::AlreadyEnrolled);
        f.sync.flush().await;

        // The enrolled set did not grow and no second request was recorded.
        let stored = f.directory.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.enrolled_courses.len(), 1);
        assert_eq!(f.remote.list_enrollments().await.unwrap().len(), 1);
    }
}
