//! Account actions behind the auth and profile forms.
//!
//! Each action validates its form first; only a clean form goes on to the
//! simulated round trip. Successful actions return the path the shell
//! should navigate to next.

use crate::config::{Action, LatencyConfig};
use crate::forms::{
    ChangePasswordForm, FieldErrors, LoginForm, PasswordResetForm, ProfileForm, RegistrationForm,
    ResetRequestForm,
};
use crate::session::{
    AuthError, SessionStore, REMEMBERED_COMPANY_KEY, REMEMBERED_EMAIL_KEY,
    REMEMBERED_PASSWORD_KEY, REMEMBER_ME_KEY,
};
use crate::storage::KeyValueStore;
use crate::user::{Role, User};
use thiserror::Error;

pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Error)]
pub enum LoginFailure {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Where a signed-in user lands
pub fn landing_path(is_admin: bool) -> &'static str {
    if is_admin {
        ADMIN_DASHBOARD_PATH
    } else {
        DASHBOARD_PATH
    }
}

/// Validate the login form, sign in, then store or forget the remembered fields
pub async fn submit_login(
    store: &mut SessionStore,
    form: &LoginForm,
) -> Result<(User, &'static str), LoginFailure> {
    form.validate().map_err(LoginFailure::Invalid)?;

    let user = store
        .login(&form.email, &form.password, form.login_type)
        .await?;

    let storage = store.storage_mut();
    let remembered = if form.remember_me {
        storage.set_all(&[
            (REMEMBERED_EMAIL_KEY, form.email.clone()),
            (REMEMBERED_PASSWORD_KEY, form.password.clone()),
            (REMEMBERED_COMPANY_KEY, form.company.clone()),
            (REMEMBER_ME_KEY, "true".to_string()),
        ])
    } else {
        storage.remove_all(&[
            REMEMBERED_EMAIL_KEY,
            REMEMBERED_PASSWORD_KEY,
            REMEMBERED_COMPANY_KEY,
            REMEMBER_ME_KEY,
        ])
    };
    if let Err(e) = remembered {
        tracing::warn!(error = %e, "failed to update remembered login");
    }

    let path = landing_path(user.is_admin());
    Ok((user, path))
}

/// Prefill for the login form from a previous remember-me login
pub fn remembered_login(storage: &dyn KeyValueStore) -> Option<LoginForm> {
    if storage.get(REMEMBER_ME_KEY).as_deref() != Some("true") {
        return None;
    }
    let company = storage.get(REMEMBERED_COMPANY_KEY).unwrap_or_default();
    Some(LoginForm {
        login_type: if company.is_empty() {
            Role::User
        } else {
            Role::Admin
        },
        company,
        email: storage.get(REMEMBERED_EMAIL_KEY).unwrap_or_default(),
        password: storage.get(REMEMBERED_PASSWORD_KEY).unwrap_or_default(),
        remember_me: true,
    })
}

/// Simulated account service for the non-login forms
#[derive(Debug, Clone, Default)]
pub struct AccountActions {
    latency: LatencyConfig,
}

impl AccountActions {
    pub fn new(latency: LatencyConfig) -> Self {
        Self { latency }
    }

    async fn round_trip(&self, action: Action) {
        tracing::debug!(action = action.as_str(), "simulated request");
        tokio::time::sleep(self.latency.delay(action)).await;
    }

    /// Forgot-password step 1. Success means "go to step 2", no navigation.
    pub async fn request_reset_link(&self, form: &ResetRequestForm) -> Result<(), FieldErrors> {
        form.validate()?;
        self.round_trip(Action::ResetLink).await;
        Ok(())
    }

    /// Forgot-password step 2
    pub async fn reset_password(
        &self,
        form: &PasswordResetForm,
    ) -> Result<&'static str, FieldErrors> {
        form.validate()?;
        self.round_trip(Action::PasswordReset).await;
        Ok("/?passwordReset=1")
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<&'static str, FieldErrors> {
        form.validate()?;
        self.round_trip(Action::Registration).await;
        Ok("/?success=1")
    }

    pub async fn change_password(
        &self,
        form: &ChangePasswordForm,
    ) -> Result<&'static str, FieldErrors> {
        form.validate()?;
        self.round_trip(Action::PasswordChange).await;
        Ok("/profile")
    }

    pub async fn save_profile(&self, form: &ProfileForm) -> Result<&'static str, FieldErrors> {
        form.validate()?;
        self.round_trip(Action::ProfileSave).await;
        Ok("/profile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::time::Duration;
    use tokio::time::Instant;

    fn store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStore::new()), Duration::from_millis(1500))
    }

    fn user_form() -> LoginForm {
        LoginForm {
            email: "user@demo.com".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_login_routes_by_role() {
        let mut s = store();
        let (user, path) = submit_login(&mut s, &user_form()).await.unwrap();
        assert_eq!(user.email, "user@demo.com");
        assert_eq!(path, DASHBOARD_PATH);

        let admin = LoginForm {
            login_type: Role::Admin,
            company: "PT Telkom Indonesia".to_string(),
            email: "admin@telkom.com".to_string(),
            password: "pw".to_string(),
            remember_me: false,
        };
        let (_, path) = submit_login(&mut s, &admin).await.unwrap();
        assert_eq!(path, ADMIN_DASHBOARD_PATH);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_skips_store_and_delay() {
        let mut s = store();
        let start = Instant::now();
        let err = submit_login(&mut s, &LoginForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoginFailure::Invalid(ref e) if e.contains_key("email")));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(!s.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_error_passes_through() {
        let mut s = store();
        let form = LoginForm {
            email: "admin@xl.com".to_string(),
            ..user_form()
        };
        let err = submit_login(&mut s, &form).await.unwrap_err();
        assert_eq!(err.to_string(), "This account is not registered as user");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remember_me_round_trip() {
        let mut s = store();
        let form = LoginForm {
            remember_me: true,
            ..user_form()
        };
        submit_login(&mut s, &form).await.unwrap();

        let prefill = remembered_login(s.storage()).unwrap();
        assert_eq!(prefill.email, "user@demo.com");
        assert_eq!(prefill.login_type, Role::User);

        submit_login(&mut s, &user_form()).await.unwrap();
        assert!(remembered_login(s.storage()).is_none());

        submit_login(&mut s, &form).await.unwrap();
        s.logout();
        assert!(remembered_login(s.storage()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_registration_waits_then_redirects() {
        let actions = AccountActions::default();
        let form = RegistrationForm {
            company: "PT Akusara Barindo Jaya".to_string(),
            full_name: "Budi".to_string(),
            age: "25".to_string(),
            gender: "Male".to_string(),
            email: "budi@demo.com".to_string(),
            password: "password1".to_string(),
            confirm_password: "password1".to_string(),
            agree_to_terms: true,
        };
        let start = Instant::now();
        assert_eq!(actions.register(&form).await.unwrap(), "/?success=1");
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forgot_password_flow() {
        let actions = AccountActions::default();
        assert!(actions
            .request_reset_link(&ResetRequestForm {
                email: "bad".to_string()
            })
            .await
            .is_err());
        actions
            .request_reset_link(&ResetRequestForm {
                email: "user@demo.com".to_string(),
            })
            .await
            .unwrap();

        let target = actions
            .reset_password(&PasswordResetForm {
                new_password: "secret".to_string(),
                confirm_password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(target, "/?passwordReset=1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_password_and_profile() {
        let actions = AccountActions::new(LatencyConfig {
            enabled: Some(false),
            ..Default::default()
        });
        let form = ChangePasswordForm {
            current_password: "old".to_string(),
            new_password: "Str0ngPass".to_string(),
            confirm_password: "Str0ngPass".to_string(),
        };
        assert_eq!(actions.change_password(&form).await.unwrap(), "/profile");
        assert_eq!(
            actions.save_profile(&ProfileForm::default()).await.unwrap(),
            "/profile"
        );
    }
}
