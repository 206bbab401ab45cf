//! Current-session snapshot, independent of the identity directory

use std::sync::Arc;

use dpo_common::{Result, User};
use tracing::warn;

use crate::kv::KeyValue;

const CURRENT_USER_KEY: &str = "current_user";

/// Holds at most one "current user" snapshot.
///
/// The session owns a value copy of the user record, not a reference into
/// the directory: mutating one does not touch the other. Callers that change
/// enrollment state must write BOTH [`crate::Directory::upsert_user`] and
/// [`SessionStore::set_current`] with the updated record, or the two diverge
/// until the next explicit re-login. That dual-write contract is part of the
/// observable behavior and is deliberately not papered over here.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValue>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    /// Store a snapshot of `user` as the active session.
    ///
    /// Does not write through to the identity directory.
    pub async fn set_current(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.kv.set(CURRENT_USER_KEY, &json).await
    }

    /// The last stored snapshot, or nothing if never set or cleared.
    pub async fn current(&self) -> Result<Option<User>> {
        match self.kv.get(CURRENT_USER_KEY).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    warn!("Discarding unreadable session record: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Remove the session only; directory entries are untouched.
    pub async fn clear(&self) -> Result<()> {
        self.kv.remove(CURRENT_USER_KEY).await
    }
}
