//! Identity directory: primary user table plus natural-key indices

use std::sync::Arc;

use dpo_common::{Result, User};
use tracing::{debug, warn};

use crate::kv::KeyValue;

/// Set of all user ids, the primary-table index for bulk reads.
const ALL_USERS_KEY: &str = "users:all";

fn user_key(id: &str) -> String {
    format!("user:{id}")
}

fn email_key(email: &str) -> String {
    format!("email:{}", email.trim().to_lowercase())
}

fn phone_key(phone: &str) -> String {
    format!("phone:{}", phone.trim())
}

/// Durable mapping from user id to user record, with email and phone
/// lookup indices.
///
/// Index entries are overwritten unconditionally on every save: if the same
/// email is later saved under a different generated id, the index silently
/// repoints to the new id and the old record stays reachable only by direct
/// id lookup. Last write wins; divergent records under one email are never
/// merged.
#[derive(Clone)]
pub struct Directory {
    kv: Arc<dyn KeyValue>,
}

impl Directory {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    /// Insert or overwrite the record keyed by `user.id`, and repoint the
    /// email/phone indices for non-blank natural keys.
    pub async fn upsert_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;

        self.kv.set(&user_key(&user.id), &json).await?;
        self.kv.set_add(ALL_USERS_KEY, &user.id).await?;

        if !user.email.trim().is_empty() {
            self.kv.set(&email_key(&user.email), &user.id).await?;
        }
        if !user.phone.trim().is_empty() {
            self.kv.set(&phone_key(&user.phone), &user.id).await?;
        }

        debug!("Stored user record: {}", user.id);
        Ok(())
    }

    /// Find a user id by email, case-insensitively.
    pub async fn find_id_by_email(&self, email: &str) -> Result<Option<String>> {
        self.kv.get(&email_key(email)).await
    }

    /// Find a user id by phone, exact match.
    pub async fn find_id_by_phone(&self, phone: &str) -> Result<Option<String>> {
        self.kv.get(&phone_key(phone)).await
    }

    /// Load the record for `id`. A record that fails to parse is treated as
    /// absent, not as a fatal error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        match self.kv.get(&user_key(id)).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    warn!("Discarding unreadable user record {}: {}", id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// All well-formed user records. Malformed entries are skipped, never
    /// abort the bulk read.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let ids = self.kv.set_members(ALL_USERS_KEY).await?;

        let mut users = Vec::new();
        for id in &ids {
            if let Ok(Some(user)) = self.get_by_id(id).await {
                users.push(user);
            }
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    fn user(id: &str, email: &str, phone: &str) -> User {
        User {
            id: id.to_string(),
            name: "Анна Петрова".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            enrolled_courses: vec![],
        }
    }

    fn directory() -> (Directory, Arc<MemoryKv>) {
        let kv = Arc::new(MemoryKv::new());
        (Directory::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn test_upsert_then_find_by_email() {
        let (directory, _) = directory();
        let u = user("u1", "anna@x.com", "");

        directory.upsert_user(&u).await.unwrap();

        assert_eq!(
            directory.find_id_by_email("anna@x.com").await.unwrap(),
            Some("u1".to_string())
        );
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let (directory, _) = directory();
        directory
            .upsert_user(&user("u1", "Anna@X.com", ""))
            .await
            .unwrap();

        assert_eq!(
            directory.find_id_by_email("ANNA@x.COM").await.unwrap(),
            Some("u1".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_by_id_returns_equal_record() {
        let (directory, _) = directory();
        let u = user("u1", "anna@x.com", "+79991112233");

        directory.upsert_user(&u).await.unwrap();

        assert_eq!(directory.get_by_id("u1").await.unwrap(), Some(u));
    }

    #[tokio::test]
    async fn test_find_by_phone_is_exact() {
        let (directory, _) = directory();
        directory
            .upsert_user(&user("u1", "anna@x.com", "+79991112233"))
            .await
            .unwrap();

        assert_eq!(
            directory.find_id_by_phone("+79991112233").await.unwrap(),
            Some("u1".to_string())
        );
        assert_eq!(directory.find_id_by_phone("79991112233").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reused_email_repoints_index_last_write_wins() {
        let (directory, _) = directory();

        directory
            .upsert_user(&user("u1", "a@x.com", ""))
            .await
            .unwrap();
        directory
            .upsert_user(&user("u2", "A@x.com", ""))
            .await
            .unwrap();

        // The index now resolves to the newer id.
        assert_eq!(
            directory.find_id_by_email("a@x.com").await.unwrap(),
            Some("u2".to_string())
        );

        // The old record stays reachable by direct id lookup only.
        assert!(directory.get_by_id("u1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_natural_keys_are_not_indexed() {
        let (directory, kv) = directory();
        directory.upsert_user(&user("u1", "  ", "")).await.unwrap();

        assert_eq!(kv.get("email:").await.unwrap(), None);
        assert_eq!(kv.get("phone:").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_absent_for_single_read() {
        let (directory, kv) = directory();

        kv.set("user:u1", "{not json").await.unwrap();

        assert_eq!(directory.get_by_id("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_skipped_in_bulk_read() {
        let (directory, kv) = directory();

        directory
            .upsert_user(&user("u1", "a@x.com", ""))
            .await
            .unwrap();
        directory
            .upsert_user(&user("u2", "b@x.com", ""))
            .await
            .unwrap();

        // Corrupt one record behind the directory's back.
        kv.set("user:u1", "{not json").await.unwrap();

        let users = directory.list_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u2");
    }
}
