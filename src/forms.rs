//! Form validation.
//!
//! Every form is checked field by field before anything is submitted; a
//! failing form yields one message per offending field and nothing else
//! happens.

use crate::user::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Field name -> message
pub type FieldErrors = BTreeMap<&'static str, String>;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required".to_string());
    } else if !is_valid_email(email) {
        errors.insert("email", "Invalid email format".to_string());
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Password strength rule for a changed password: length, lower, upper, digit
pub fn password_strength_error(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }
    None
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub login_type: Role,
    pub company: String,
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.login_type == Role::Admin && self.company.is_empty() {
            errors.insert("company", "Company is required for admin login".to_string());
        }
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.insert("password", "Password is required".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub company: String,
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.company.is_empty() {
            errors.insert("company", "Company is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            errors.insert("fullName", "Full name is required".to_string());
        }
        if self.age.is_empty() {
            errors.insert("age", "Age is required".to_string());
        } else if !matches!(self.age.trim().parse::<f64>(), Ok(n) if (16.0..=100.0).contains(&n)) {
            errors.insert("age", "Please enter a valid age (16-100)".to_string());
        }
        if self.gender.is_empty() {
            errors.insert("gender", "Gender is required".to_string());
        }
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.insert("password", "Password is required".to_string());
        } else if self.password.chars().count() < 8 {
            errors.insert(
                "password",
                "Password must be at least 8 characters".to_string(),
            );
        }
        if self.confirm_password.is_empty() {
            errors.insert(
                "confirmPassword",
                "Please confirm your password".to_string(),
            );
        } else if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match".to_string());
        }
        if !self.agree_to_terms {
            errors.insert(
                "terms",
                "You must agree to the Terms & Conditions and Privacy Policy".to_string(),
            );
        }
        finish(errors)
    }
}

/// Forgot-password step 1
#[derive(Debug, Clone, Default)]
pub struct ResetRequestForm {
    pub email: String,
}

impl ResetRequestForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        finish(errors)
    }
}

/// Forgot-password step 2
#[derive(Debug, Clone, Default)]
pub struct PasswordResetForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordResetForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.new_password.is_empty() {
            errors.insert("newPassword", "New password is required".to_string());
        } else if self.new_password.chars().count() < 6 {
            errors.insert(
                "newPassword",
                "Password must be at least 6 characters".to_string(),
            );
        }
        if self.confirm_password.is_empty() {
            errors.insert(
                "confirmPassword",
                "Please confirm your password".to_string(),
            );
        } else if self.new_password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.insert(
                "currentPassword",
                "Current password is required".to_string(),
            );
        }
        if let Some(msg) = password_strength_error(&self.new_password) {
            errors.insert("newPassword", msg.to_string());
        }
        if self.new_password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match".to_string());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            username: "User".to_string(),
            full_name: "Userrrrr".to_string(),
            email: "user123@gmail.com".to_string(),
            age: "18".to_string(),
            gender: "Male".to_string(),
            phone: String::new(),
        }
    }
}

impl ProfileForm {
    /// Set a field by its form name; returns false for unknown fields
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "username" => &mut self.username,
            "fullName" | "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "age" => &mut self.age,
            "gender" => &mut self.gender,
            "phone" => &mut self.phone,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            errors.insert("fullName", "Full name is required".to_string());
        }
        check_email(&mut errors, &self.email);
        if !self.age.is_empty() && self.age.trim().parse::<u32>().is_err() {
            errors.insert("age", "Age must be a number".to_string());
        }
        finish(errors)
    }
}
