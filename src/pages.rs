//! Page bodies.

use crate::forms::ProfileForm;
use crate::layout::SIDEBAR_ROUTES;
use crate::router::{Location, Route};
use crate::user::User;

/// Read-only view of the session that pages render from
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub user: Option<&'a User>,
    pub profile: &'a ProfileForm,
    pub reset_step: u8,
}

/// Hint shown on chrome pages when nobody is signed in. Nothing is enforced.
pub fn redirect_hint(pathname: &str, authenticated: bool) -> Option<String> {
    if authenticated || !SIDEBAR_ROUTES.contains(&pathname) {
        return None;
    }
    Some("Not signed in. Use `/go /` to log in.".to_string())
}

pub fn render(location: &Location, ctx: &PageContext<'_>) -> Vec<String> {
    let Some(route) = location.route() else {
        return vec![format!("Nothing here: {}", location.pathname)];
    };

    match route {
        Route::Login => login(location),
        Route::Register => vec![
            "Create your outsideplant. account".to_string(),
            "  /register company=.. fullName=.. age=.. gender=.. email=.. password=.. confirmPassword=.. terms=yes".to_string(),
            "  Already have an account? /go /".to_string(),
        ],
        Route::ForgotPassword => forgot_password(ctx.reset_step),
        Route::Dashboard => vec![
            "Overview of field operations, photo reports, security and payments.".to_string(),
            "  Modules: /field-operations-tracking /photo-based-reporting".to_string(),
            "           /smart-cluster-security /integrated-payments".to_string(),
        ],
        Route::FieldOperationsTracking => {
            vec!["Real-time technician tracking and task assignment.".to_string()]
        }
        Route::PhotoBasedReporting => {
            vec!["Automatic photo checks and field reports.".to_string()]
        }
        Route::IntegratedPayments => vec!["Unified billing and payment records.".to_string()],
        Route::SmartClusterSecurity => {
            vec!["Face ID access, gate control and security alerts.".to_string()]
        }
        Route::Profile => profile(ctx),
        Route::EditProfile => edit_profile(ctx.profile),
        Route::ChangePassword => vec![
            "Update your password to keep your account secure".to_string(),
            "  Use at least 8 characters, upper and lower case letters and a number.".to_string(),
            "  /change-password <current> <new> <confirm>    /cancel".to_string(),
        ],
    }
}

fn login(location: &Location) -> Vec<String> {
    let mut lines = Vec::new();
    if location.query_flag("success") {
        lines.push("Account created successfully!".to_string());
    }
    if location.query_flag("passwordReset") {
        lines.push("Password reset successfully! Please log in.".to_string());
    }
    lines.push("Welcome Back!".to_string());
    lines.push("Login to your outsideplant. account".to_string());
    lines.push(
        "  /login <email> <password> [user|admin] [--company NAME] [--remember]".to_string(),
    );
    lines.push("  /go /forgot-password    /go /register    /demo-users".to_string());
    lines
}

fn forgot_password(step: u8) -> Vec<String> {
    if step >= 2 {
        vec![
            "Set a new password".to_string(),
            "  /reset <new-password> <confirm-password>".to_string(),
        ]
    } else {
        vec![
            "Forgot your password?".to_string(),
            "  /forgot <email>    Back to login: /go /".to_string(),
        ]
    }
}

fn profile(ctx: &PageContext<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    match ctx.user {
        Some(user) => {
            lines.push(user.name.clone());
            lines.push(format!("  {}", user.email));
            lines.push(format!("  role: {}", user.role));
            if let Some(company) = &user.company {
                lines.push(format!("  company: {}", company));
            }
        }
        None => lines.push("Not signed in.".to_string()),
    }
    lines.push(format!(
        "  username: {}  full name: {}  age: {}  gender: {}",
        ctx.profile.username, ctx.profile.full_name, ctx.profile.age, ctx.profile.gender
    ));
    lines.push("  /go /edit-profile    /go /change-password    /logout".to_string());
    lines
}

fn edit_profile(form: &ProfileForm) -> Vec<String> {
    vec![
        "Update your personal information and preferences".to_string(),
        format!("  username={}", form.username),
        format!("  fullName={}", form.full_name),
        format!("  email={}", form.email),
        format!("  age={}", form.age),
        format!("  gender={}", form.gender),
        format!("  phone={}", form.phone),
        "  /edit-profile key=value ...    /cancel".to_string(),
    ]
}
