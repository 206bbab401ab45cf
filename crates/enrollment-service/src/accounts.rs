//! Registration and login by natural key.
//!
//! There is no password: a returning user is recognized by email (primary)
//! or phone (secondary), first against the local directory, then against
//! the remote store. Registration and login are one flow, as a returning
//! user entering their data again must get their record restored rather
//! than a duplicate.

use std::sync::Arc;

use chrono::Utc;
use dpo_common::{generate_user_id, Error, Result, User};
use tracing::{info, warn};
use user_directory::{Directory, SessionStore};

use crate::remote::RemoteStore;
use crate::sync::{SyncHandle, SyncJob};

/// Outcome of a registration/login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// An existing user was recognized by natural key and restored.
    Restored(User),

    /// A new user record was created.
    Registered(User),
}

#[derive(Clone)]
pub struct Accounts {
    directory: Directory,
    session: SessionStore,
    remote: Arc<dyn RemoteStore>,
    sync: SyncHandle,
}

impl Accounts {
    pub fn new(
        directory: Directory,
        session: SessionStore,
        remote: Arc<dyn RemoteStore>,
        sync: SyncHandle,
    ) -> Self {
        Self {
            directory,
            session,
            remote,
            sync,
        }
    }

    /// Restore a returning user or register a new one.
    ///
    /// Lookup order: local email index, local phone index (non-blank phone
    /// only), then a best-effort remote lookup by email where any remote
    /// error counts as "not found". Only a miss everywhere creates a new
    /// record. Validation failures return [`Error::InvalidInput`] before
    /// any write.
    pub async fn register_or_login(
        &self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<LoginOutcome> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        let phone = phone.trim();

        if name.is_empty() || email.is_empty() {
            return Err(Error::InvalidInput(
                "name and email are required".to_string(),
            ));
        }
        if !is_well_formed_email(&email) {
            return Err(Error::InvalidInput(format!("malformed email: {email}")));
        }

        let existing_id = match self.directory.find_id_by_email(&email).await? {
            Some(id) => Some(id),
            None if !phone.is_empty() => self.directory.find_id_by_phone(phone).await?,
            None => None,
        };

        if let Some(id) = existing_id {
            if let Some(user) = self.directory.get_by_id(&id).await? {
                self.session.set_current(&user).await?;
                info!("Restored returning user {}", user.id);
                return Ok(LoginOutcome::Restored(user));
            }
            // Dangling index entry; treat the user as new.
            warn!("Natural-key index points at missing record {}", id);
        }

        match self.remote.find_user_by_email(&email).await {
            Ok(Some(user)) => {
                self.directory.upsert_user(&user).await?;
                self.session.set_current(&user).await?;
                info!("Adopted user {} from remote store", user.id);
                return Ok(LoginOutcome::Restored(user));
            }
            Ok(None) => {}
            Err(e) => warn!("Remote user lookup failed, treating as absent: {}", e),
        }

        let user = User {
            id: generate_user_id(&email, Utc::now().timestamp_millis()),
            name: name.to_string(),
            email,
            phone: phone.to_string(),
            enrolled_courses: vec![],
        };

        self.directory.upsert_user(&user).await?;
        self.session.set_current(&user).await?;
        self.sync.submit(SyncJob::MirrorProfile(user.clone()));

        info!("Registered new user {}", user.id);
        Ok(LoginOutcome::Registered(user))
    }

    /// The current session snapshot, if any.
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.session.current().await
    }

    /// Clear the session. Directory records are untouched.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }
}

fn is_well_formed_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_remote::MemoryRemote;
    use crate::sync;
    use user_directory::MemoryKv;

    struct Fixture {
        accounts: Accounts,
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
        let accounts = Accounts::new(
            directory.clone(),
            session.clone(),
            remote.clone(),
            sync.clone(),
        );

        Fixture {
            accounts,
            directory,
            session,
            remote,
            sync,
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_and_session() {
        let f = fixture();

        let outcome = f
            .accounts
            .register_or_login("Анна", "Anna@X.com", "+79991112233")
            .await
            .unwrap();

        let user = match outcome {
            LoginOutcome::Registered(u) => u,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(user.id.starts_with("user_"));
        // Email is normalized to lowercase before storage.
        assert_eq!(user.email, "anna@x.com");

        assert_eq!(f.directory.get_by_id(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(f.session.current().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_returning_user_is_restored_by_case_varied_email() {
        let f = fixture();

        let first = f
            .accounts
            .register_or_login("Анна", "a@x.com", "")
            .await
            .unwrap();
        let LoginOutcome::Registered(user) = first else {
            panic!("expected registration");
        };

        f.session.clear().await.unwrap();

        let second = f
            .accounts
            .register_or_login("Анна", "A@x.com", "")
            .await
            .unwrap();

        assert_eq!(second, LoginOutcome::Restored(user.clone()));
        assert_eq!(f.session.current().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_returning_user_is_restored_by_phone() {
        let f = fixture();

        let LoginOutcome::Registered(user) = f
            .accounts
            .register_or_login("Анна", "a@x.com", "+79991112233")
            .await
            .unwrap()
        else {
            panic!("expected registration");
        };

        // Different email, same phone: the secondary natural key wins.
        let outcome = f
            .accounts
            .register_or_login("Анна", "new@x.com", "+79991112233")
            .await
            .unwrap();

        assert_eq!(outcome, LoginOutcome::Restored(user));
    }

    #[tokio::test]
    async fn test_validation_rejects_blank_and_malformed_input() {
        let f = fixture();

        for (name, email) in [("", "a@x.com"), ("Анна", ""), ("Анна", "not-an-email")] {
            let err = f
                .accounts
                .register_or_login(name, email, "")
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{name:?}/{email:?}");
        }

        // Nothing was written.
        assert!(f.directory.list_all().await.unwrap().is_empty());
        assert_eq!(f.session.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_user_known_only_remotely_is_adopted() {
        let f = fixture();

        let remote_user = User {
            id: "user_1_aaaaaaaa".to_string(),
            name: "Анна".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            enrolled_courses: vec!["c9".to_string()],
        };
        f.remote.upsert_user(&remote_user).await.unwrap();

        let outcome = f
            .accounts
            .register_or_login("Анна", "a@x.com", "")
            .await
            .unwrap();

        assert_eq!(outcome, LoginOutcome::Restored(remote_user.clone()));
        // The adopted record is now local, enrolled courses included.
        assert_eq!(
            f.directory.get_by_id(&remote_user.id).await.unwrap(),
            Some(remote_user)
        );
    }

    #[tokio::test]
    async fn test_remote_outage_falls_back_to_registration() {
        let f = fixture();
        f.remote.set_unavailable(true);

        let outcome = f
            .accounts
            .register_or_login("Анна", "a@x.com", "")
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Registered(_)));
    }

    #[tokio::test]
    async fn test_registration_mirrors_profile_to_remote() {
        let f = fixture();

        f.accounts
            .register_or_login("Анна", "a@x.com", "")
            .await
            .unwrap();
        f.sync.flush().await;

        assert!(f
            .remote
            .find_user_by_email("a@x.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_session_only() {
        let f = fixture();

        let LoginOutcome::Registered(user) = f
            .accounts
            .register_or_login("Анна", "a@x.com", "")
            .await
            .unwrap()
        else {
            panic!("expected registration");
        };

        f.accounts.logout().await.unwrap();

        assert_eq!(f.accounts.current_user().await.unwrap(), None);
        assert_eq!(f.directory.get_by_id(&user.id).await.unwrap(), Some(user));
    }

    #[test]
    fn test_email_well_formedness() {
        assert!(is_well_formed_email("a@x.com"));
        assert!(!is_well_formed_email("ax.com"));
        assert!(!is_well_formed_email("@x.com"));
        assert!(!is_well_formed_email("a@xcom"));
        assert!(!is_well_formed_email("a@.com"));
    }
}
