//! Background sync worker for best-effort remote writes.
//!
//! Local state is authoritative once written; the remote store is a mirror.
//! Jobs are submitted fire-and-forget onto a bounded queue and drained by a
//! worker task. The policy is no-retry, log-and-drop: a failed remote write
//! is logged and lost, a full queue drops the job at submission. Two jobs
//! submitted close together carry no ordering guarantee for callers.

use std::sync::Arc;

use dpo_common::User;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::docs::EnrollmentDoc;
use crate::remote::RemoteStore;

/// A unit of background remote work.
pub enum SyncJob {
    /// Append an enrollment request snapshot to the remote collection.
    RecordEnrollment(EnrollmentDoc),

    /// Mirror a user's enrolled-course list onto the remote user document.
    MirrorCourses {
        user_id: String,
        course_ids: Vec<String>,
    },

    /// Mirror a full user profile onto the remote user document.
    MirrorProfile(User),

    /// Test seam: acknowledge once every job queued before this one has
    /// been processed. Not used on any runtime path.
    Flush(oneshot::Sender<()>),
}

/// Handle for submitting jobs to the sync worker.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncJob>,
}

impl SyncHandle {
    /// Submit a job without blocking. A full or closed queue logs and drops
    /// the job; there is no durable retry log.
    pub fn submit(&self, job: SyncJob) {
        if let Err(e) = self.tx.try_send(job) {
            warn!("Dropping background sync job: {}", e);
        }
    }

    /// Wait until every previously submitted job has been processed.
    ///
    /// Deterministic test seam; default runtime behavior never awaits the
    /// worker.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(SyncJob::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

/// Spawn the sync worker and return a handle to it.
pub fn spawn(remote: Arc<dyn RemoteStore>, queue_capacity: usize) -> SyncHandle {
    let (tx, mut rx) = mpsc::channel(queue_capacity);

    tokio::spawn(async move {
        info!("Sync worker started");

        while let Some(job) = rx.recv().await {
            match job {
                SyncJob::RecordEnrollment(doc) => {
                    match remote.insert_enrollment(&doc).await {
                        Ok(id) => debug!(
                            "Recorded enrollment {} for user {} in course {}",
                            id, doc.user_id, doc.course_id
                        ),
                        Err(e) => error!(
                            "Failed to record enrollment for user {}: {}",
                            doc.user_id, e
                        ),
                    }
                }
                SyncJob::MirrorCourses {
                    user_id,
                    course_ids,
                } => {
                    if let Err(e) = remote.update_user_courses(&user_id, &course_ids).await {
                        error!("Failed to mirror courses for user {}: {}", user_id, e);
                    }
                }
                SyncJob::MirrorProfile(user) => {
                    if let Err(e) = remote.upsert_user(&user).await {
                        error!("Failed to mirror user {}: {}", user.id, e);
                    }
                }
                SyncJob::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        info!("Sync worker stopped");
    });

    SyncHandle { tx }
}
