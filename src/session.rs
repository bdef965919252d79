//! Session store: who is signed in.
//!
//! The store owns the current user and keeps the authenticated flag in
//! lockstep with it. Credentials are checked against the demo directory in
//! [`crate::user`], and a successful login is persisted to the injected
//! [`KeyValueStore`] so a later process can restore it with [`SessionStore::init`].

use crate::storage::{KeyValueStore, StorageError};
use crate::user::{demo_users, Role, User};
use std::time::Duration;
use thiserror::Error;

pub const USER_KEY: &str = "user";
pub const AUTH_KEY: &str = "isAuthenticated";
pub const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";
pub const REMEMBERED_PASSWORD_KEY: &str = "rememberedPassword";
pub const REMEMBERED_COMPANY_KEY: &str = "rememberedCompany";
pub const REMEMBER_ME_KEY: &str = "rememberMe";

/// The only value of `isAuthenticated` that counts as signed in
pub const AUTH_MARKER: &str = "true";

/// Every key logout clears
pub const SESSION_KEYS: &[&str] = &[
    USER_KEY,
    AUTH_KEY,
    REMEMBERED_EMAIL_KEY,
    REMEMBERED_PASSWORD_KEY,
    REMEMBERED_COMPANY_KEY,
    REMEMBER_ME_KEY,
];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This account is not registered as {expected}")]
    RoleMismatch { expected: Role },

    #[error("Password is required")]
    MissingPassword,

    #[error("Saved session is unreadable: {0}")]
    PersistedStateCorrupt(String),

    #[error("Failed to save session: {0}")]
    Storage(#[from] StorageError),
}

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(User),
}

/// What `init` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A saved session was restored
    Restored,
    /// Nothing (or no valid marker) to restore; state untouched
    Empty,
    /// Saved data was malformed and has been wiped
    Reset,
}

pub struct SessionStore {
    state: SessionState,
    storage: Box<dyn KeyValueStore>,
    login_delay: Duration,
}

impl SessionStore {
    pub fn new(storage: Box<dyn KeyValueStore>, login_delay: Duration) -> Self {
        Self {
            state: SessionState::Anonymous,
            storage,
            login_delay,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn KeyValueStore {
        self.storage.as_mut()
    }

    /// Hand the storage back, dropping the in-memory session
    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }

    /// Sign in against the demo directory.
    ///
    /// Waits out the simulated round trip first, then checks the account,
    /// the requested role and the password, in that order. On failure the
    /// current state is left as it was. Signing in while already signed in
    /// replaces the current user.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        login_type: Role,
    ) -> Result<User, AuthError> {
        tokio::time::sleep(self.login_delay).await;

        let user = demo_users()
            .get(email)
            .ok_or(AuthError::InvalidCredentials)?;

        if user.role != login_type {
            return Err(AuthError::RoleMismatch {
                expected: login_type,
            });
        }

        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let serialized = serde_json::to_string(user).map_err(StorageError::from)?;
        self.storage.set_all(&[
            (USER_KEY, serialized),
            (AUTH_KEY, AUTH_MARKER.to_string()),
        ])?;

        self.state = SessionState::Authenticated(user.clone());
        tracing::info!(email = %user.email, role = %user.role, "signed in");
        Ok(user.clone())
    }

    /// Sign out and forget everything saved, including remembered form values
    pub fn logout(&mut self) {
        self.state = SessionState::Anonymous;
        if let Err(e) = self.storage.remove_all(SESSION_KEYS) {
            tracing::warn!(error = %e, "failed to clear saved session");
        }
        tracing::info!("signed out");
    }

    /// Restore a saved session, if there is one.
    ///
    /// Malformed saved data is logged and handled like a logout; it never
    /// reaches the caller.
    pub fn init(&mut self) -> InitOutcome {
        match self.saved_user() {
            Ok(Some(user)) => {
                tracing::debug!(email = %user.email, "restored saved session");
                self.state = SessionState::Authenticated(user);
                InitOutcome::Restored
            }
            Ok(None) => InitOutcome::Empty,
            Err(e) => {
                tracing::error!(error = %e, "error parsing saved user data");
                self.logout();
                InitOutcome::Reset
            }
        }
    }

    fn saved_user(&self) -> Result<Option<User>, AuthError> {
        let (Some(raw), Some(flag)) = (self.storage.get(USER_KEY), self.storage.get(AUTH_KEY))
        else {
            return Ok(None);
        };
        if raw.is_empty() || flag != AUTH_MARKER {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::PersistedStateCorrupt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::path::Path;

    const DELAY: Duration = Duration::from_millis(1500);

    fn store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStore::new()), DELAY)
    }

    fn restart(store: SessionStore) -> SessionStore {
        SessionStore::new(store.into_storage(), DELAY)
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_every_demo_account() {
        for (email, expected) in demo_users() {
            let mut s = store();
            let user = s.login(email, "secret", expected.role).await.unwrap();
            assert_eq!(&user, expected);
            assert!(s.is_authenticated());
            assert_eq!(s.user(), Some(expected));
            assert_eq!(s.is_admin(), expected.role == Role::Admin);
            assert_eq!(s.storage().get(AUTH_KEY).as_deref(), Some(AUTH_MARKER));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_simulated_latency() {
        let mut s = store();
        let start = tokio::time::Instant::now();
        s.login("user@demo.com", "pw", Role::User).await.unwrap();
        assert!(start.elapsed() >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_email_is_rejected() {
        let mut s = store();
        let err = s
            .login("nobody@demo.com", "pw", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(s.state(), &SessionState::Anonymous);
        assert!(s.storage().get(USER_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_role_mismatch_names_expected_type() {
        let mut s = store();
        let err = s
            .login("admin@xl.com", "pw", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RoleMismatch { expected: Role::User }));
        assert_eq!(err.to_string(), "This account is not registered as user");
        assert!(!s.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_password_is_rejected() {
        let mut s = store();
        let err = s.login("user@demo.com", "", Role::User).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingPassword));
        assert!(!s.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_login_keeps_prior_session() {
        let mut s = store();
        s.login("technician@demo.com", "pw", Role::User)
            .await
            .unwrap();
        let before = s.state().clone();

        assert!(s.login("ghost@demo.com", "pw", Role::User).await.is_err());
        assert_eq!(s.state(), &before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_while_authenticated_overwrites() {
        let mut s = store();
        s.login("user@demo.com", "pw", Role::User).await.unwrap();
        s.login("admin@indosat.com", "pw", Role::Admin)
            .await
            .unwrap();
        assert_eq!(s.user().unwrap().email, "admin@indosat.com");
        assert!(s.is_admin());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_everything() {
        let mut s = store();
        s.login("user@demo.com", "pw", Role::User).await.unwrap();
        s.storage_mut()
            .set_all(&[
                (REMEMBERED_EMAIL_KEY, "user@demo.com".to_string()),
                (REMEMBER_ME_KEY, "true".to_string()),
            ])
            .unwrap();

        s.logout();
        assert!(s.user().is_none());
        assert!(!s.is_authenticated());
        for key in SESSION_KEYS {
            assert!(s.storage().get(key).is_none(), "{} survived logout", key);
        }

        // Idempotent
        s.logout();
        assert_eq!(s.state(), &SessionState::Anonymous);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_restores_after_restart() {
        let mut s = store();
        let user = s.login("admin@telkom.com", "pw", Role::Admin).await.unwrap();

        let mut s = restart(s);
        assert!(!s.is_authenticated());
        assert_eq!(s.init(), InitOutcome::Restored);
        assert_eq!(s.user(), Some(&user));
        assert!(s.is_authenticated());
    }

    #[test]
    fn test_init_without_saved_state() {
        let mut s = store();
        assert_eq!(s.init(), InitOutcome::Empty);
        assert_eq!(s.state(), &SessionState::Anonymous);
    }

    #[test]
    fn test_init_requires_exact_marker() {
        let user = serde_json::to_string(&demo_users()["user@demo.com"]).unwrap();
        for flag in ["TRUE", "1", "yes", ""] {
            let mut storage = MemoryStore::new();
            storage
                .set_all(&[(USER_KEY, user.clone()), (AUTH_KEY, flag.to_string())])
                .unwrap();
            let mut s = SessionStore::new(Box::new(storage), DELAY);
            assert_eq!(s.init(), InitOutcome::Empty, "flag {:?}", flag);
            assert!(!s.is_authenticated());
        }
    }

    #[test]
    fn test_init_corrupt_user_resets() {
        let mut storage = MemoryStore::new();
        storage
            .set_all(&[
                (USER_KEY, "{not json".to_string()),
                (AUTH_KEY, AUTH_MARKER.to_string()),
                (REMEMBERED_EMAIL_KEY, "x@y.z".to_string()),
            ])
            .unwrap();

        let mut s = SessionStore::new(Box::new(storage), DELAY);
        assert_eq!(s.init(), InitOutcome::Reset);
        assert!(!s.is_authenticated());
        assert!(s.storage().get(USER_KEY).is_none());
        assert!(s.storage().get(REMEMBERED_EMAIL_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_logout_then_init_is_anonymous() {
        let mut s = store();
        s.login("admin@telkom.com", "x", Role::Admin).await.unwrap();
        s.logout();

        let mut s = restart(s);
        assert_eq!(s.init(), InitOutcome::Empty);
        assert_eq!(s.state(), &SessionState::Anonymous);
    }

    /// Replace `dir/sub` with a plain file so every later write under it fails
    fn break_storage(dir: &Path) {
        let sub = dir.join("sub");
        std::fs::remove_dir_all(&sub).unwrap();
        std::fs::write(&sub, "not a directory").unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_persist_failure_stays_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("storage.json");
        let mut storage = FileStore::open(&path);
        storage.set_all(&[("seed", "1".to_string())]).unwrap();
        break_storage(dir.path());

        let mut s = SessionStore::new(Box::new(storage), DELAY);
        let err = s
            .login("user@demo.com", "pw", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(s.state(), &SessionState::Anonymous);
        assert!(s.storage().get(USER_KEY).is_none());
        assert!(s.storage().get(AUTH_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_sticks_when_storage_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("storage.json");
        let mut s = SessionStore::new(Box::new(FileStore::open(&path)), DELAY);
        s.login("user@demo.com", "pw", Role::User).await.unwrap();
        break_storage(dir.path());

        s.logout();
        assert!(!s.is_authenticated());
        for key in SESSION_KEYS {
            assert!(s.storage().get(key).is_none(), "{} survived logout", key);
        }
        assert_eq!(s.init(), InitOutcome::Empty);
        assert!(!s.is_authenticated());
    }
}
