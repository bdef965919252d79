use crate::{
    actions::{self, AccountActions, LoginFailure},
    forms::{
        ChangePasswordForm, FieldErrors, LoginForm, PasswordResetForm, ProfileForm,
        RegistrationForm, ResetRequestForm,
    },
    layout::{resolve_layout, BackAction},
    pages::{self, PageContext},
    render,
    router::{Route, Router},
    session::{InitOutcome, SessionState, SessionStore},
    transcript::Transcript,
    user::{demo_users, Role},
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::time::Instant;

pub struct Context {
    pub session_id: String,
    pub storage_label: String,
    pub transcript: Transcript,
    pub session: SessionStore,
    pub actions: AccountActions,
    pub router: Router,
    pub sidebar_open: bool,
    pub profile: ProfileForm,
    pub reset_step: u8,
}

pub fn show_demo_users() {
    println!("Demo accounts (any non-empty password):");
    for (email, user) in demo_users() {
        let company = user
            .company
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        println!("  {:<22} {:<6} {}{}", email, user.role, user.name, company);
    }
}

pub async fn run_repl(mut ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("outsideplant - type /help for commands, /exit to quit");
    enter(&mut ctx);

    loop {
        match rl.readline("op> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if handle_command(&mut ctx, line).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Navigate and render. Entering the login page restores a saved session and
/// sends an already signed-in user on to their dashboard.
pub fn go(ctx: &mut Context, target: &str) {
    let from = ctx.router.location().to_string();
    ctx.router.navigate(target);
    let _ = ctx.transcript.navigate(&from, target);
    enter(ctx);
}

fn enter(ctx: &mut Context) {
    match ctx.router.location().route() {
        Some(Route::Login) => {
            let outcome = ctx.session.init();
            let email = ctx.session.user().map(|u| u.email.clone());
            let _ = ctx.transcript.session_init(
                match outcome {
                    InitOutcome::Restored => "restored",
                    InitOutcome::Empty => "empty",
                    InitOutcome::Reset => "reset",
                },
                email.as_deref(),
            );
            if ctx.session.is_authenticated() {
                let landing = actions::landing_path(ctx.session.is_admin());
                println!("Already signed in, redirecting to {}", landing);
                go(ctx, landing);
                return;
            }
        }
        Some(Route::ForgotPassword) => ctx.reset_step = 1,
        _ => {}
    }
    show(ctx);
}

fn show(ctx: &Context) {
    let location = ctx.router.location();
    let page_ctx = PageContext {
        user: ctx.session.user(),
        profile: &ctx.profile,
        reset_step: ctx.reset_step,
    };

    let mut body = Vec::new();
    if let Some(hint) = pages::redirect_hint(&location.pathname, ctx.session.is_authenticated()) {
        body.push(hint);
    }
    if location.route() == Some(Route::Login) {
        if let Some(saved) = actions::remembered_login(ctx.session.storage()) {
            body.push(format!("Remembered: {} ({})", saved.email, saved.login_type));
        }
    }
    body.extend(pages::render(location, &page_ctx));

    let now = chrono::Local::now();
    println!();
    println!(
        "{}",
        render::frame(&location.pathname, ctx.sidebar_open, &body, &now)
    );
    println!();
}

fn busy(label: &str) {
    print!("{}... ", label);
    let _ = std::io::stdout().flush();
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors {
        println!("  {}: {}", field, message);
    }
}

/// Split `key=value` arguments, ignoring anything without '='
fn key_values(args: &[String]) -> Vec<(&str, &str)> {
    args.iter().filter_map(|a| a.split_once('=')).collect()
}

fn truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "yes" | "true" | "1" | "y")
}

async fn handle_command(ctx: &mut Context, line: &str) -> bool {
    let parts = match shell_words::split(line) {
        Ok(parts) => parts,
        Err(e) => {
            println!("Cannot parse command: {}", e);
            return false;
        }
    };
    let Some(cmd) = parts.first() else {
        return false;
    };
    let args = &parts[1..];

    match cmd.as_str() {
        "/exit" | "/quit" => return true,
        "/help" => {
            println!("Navigation:");
            println!("  /go <path>      - open a page (e.g. /go /dashboard)");
            println!("  /back           - header back button, where the page has one");
            println!("  /cancel         - leave the current form");
            println!("  /toggle         - collapse or expand the sidebar");
            println!("  /refresh        - render the current page again");
            println!("Account:");
            println!("  /login <email> <password> [user|admin] [--company NAME] [--remember]");
            println!("  /logout         - sign out and clear saved data");
            println!("  /whoami         - show the signed-in user");
            println!("  /demo-users     - list demo accounts");
            println!("  /register key=value ...  (company fullName age gender email password confirmPassword terms)");
            println!("  /forgot <email>");
            println!("  /reset <new-password> <confirm-password>");
            println!("  /change-password <current> <new> <confirm>");
            println!("  /edit-profile key=value ...  (username fullName email age gender phone)");
            println!("Other:");
            println!("  /session        - show session info");
            println!("  /help           - show commands");
            println!("  /exit           - quit");
        }
        "/go" => match args.first() {
            Some(target) => go(ctx, target),
            None => println!("Usage: /go <path>"),
        },
        "/back" => {
            let layout = resolve_layout(&ctx.router.location().pathname);
            match layout.page_config.on_back_click {
                Some(BackAction::HistoryBack) if layout.page_config.show_back_button => {
                    let from = ctx.router.location().to_string();
                    if ctx.router.back() {
                        let to = ctx.router.location().to_string();
                        let _ = ctx.transcript.navigate(&from, &to);
                        enter(ctx);
                    } else {
                        println!("Nothing to go back to");
                    }
                }
                _ => println!("No back button on this page"),
            }
        }
        "/cancel" => match ctx.router.location().route() {
            Some(Route::EditProfile | Route::ChangePassword) => go(ctx, "/profile"),
            Some(Route::Register | Route::ForgotPassword) => go(ctx, "/"),
            _ => println!("Nothing to cancel"),
        },
        "/toggle" => {
            ctx.sidebar_open = !ctx.sidebar_open;
            show(ctx);
        }
        "/refresh" => show(ctx),
        "/login" => handle_login(ctx, args).await,
        "/logout" => {
            let email = ctx.session.user().map(|u| u.email.clone());
            ctx.session.logout();
            let _ = ctx.transcript.logout(email.as_deref());
            println!("Logged out successfully!");
            go(ctx, "/");
        }
        "/whoami" => match ctx.session.state() {
            SessionState::Authenticated(user) => println!(
                "{} <{}> ({}{})",
                user.name,
                user.email,
                user.role,
                if user.is_admin() { ", admin" } else { "" }
            ),
            SessionState::Anonymous => println!("Not signed in"),
        },
        "/demo-users" => show_demo_users(),
        "/register" => {
            let mut form = RegistrationForm::default();
            for (key, value) in key_values(args) {
                match key {
                    "company" => form.company = value.to_string(),
                    "fullName" | "full_name" => form.full_name = value.to_string(),
                    "age" => form.age = value.to_string(),
                    "gender" => form.gender = value.to_string(),
                    "email" => form.email = value.to_string(),
                    "password" => form.password = value.to_string(),
                    "confirmPassword" | "confirm_password" => {
                        form.confirm_password = value.to_string()
                    }
                    "terms" => form.agree_to_terms = truthy(value),
                    other => println!("  ignoring unknown field: {}", other),
                }
            }
            let started = Instant::now();
            busy("Creating account");
            let result = ctx.actions.register(&form).await;
            finish_action(ctx, "registration", started, result);
        }
        "/forgot" => {
            let form = ResetRequestForm {
                email: args.first().cloned().unwrap_or_default(),
            };
            let started = Instant::now();
            busy("Sending reset link");
            match ctx.actions.request_reset_link(&form).await {
                Ok(()) => {
                    println!("done");
                    let _ = ctx
                        .transcript
                        .action_ok("reset_link", started.elapsed().as_millis() as u64);
                    ctx.reset_step = 2;
                    if ctx.router.location().route() != Some(Route::ForgotPassword) {
                        ctx.router.navigate("/forgot-password");
                    }
                    show(ctx);
                }
                Err(errors) => reject(ctx, "reset_link", &errors),
            }
        }
        "/reset" => {
            if ctx.reset_step < 2 {
                println!("Request a reset link first: /forgot <email>");
                return false;
            }
            let form = PasswordResetForm {
                new_password: args.first().cloned().unwrap_or_default(),
                confirm_password: args.get(1).cloned().unwrap_or_default(),
            };
            let started = Instant::now();
            busy("Resetting password");
            let result = ctx.actions.reset_password(&form).await;
            if result.is_ok() {
                ctx.reset_step = 1;
            }
            finish_action(ctx, "password_reset", started, result);
        }
        "/change-password" => {
            let form = ChangePasswordForm {
                current_password: args.first().cloned().unwrap_or_default(),
                new_password: args.get(1).cloned().unwrap_or_default(),
                confirm_password: args.get(2).cloned().unwrap_or_default(),
            };
            let started = Instant::now();
            busy("Changing password");
            let result = ctx.actions.change_password(&form).await;
            if result.is_ok() {
                println!("Password changed successfully!");
            }
            finish_action(ctx, "password_change", started, result);
        }
        "/edit-profile" => {
            let mut form = ctx.profile.clone();
            for (key, value) in key_values(args) {
                if !form.set(key, value) {
                    println!("  ignoring unknown field: {}", key);
                }
            }
            let started = Instant::now();
            busy("Saving profile");
            let result = ctx.actions.save_profile(&form).await;
            if result.is_ok() {
                ctx.profile = form;
                println!("Profile updated successfully!");
            }
            finish_action(ctx, "profile_save", started, result);
        }
        "/session" => {
            println!("Session: {}", ctx.session_id);
            println!("Transcript: {:?}", ctx.transcript.path);
            println!("Storage: {}", ctx.storage_label);
            println!("Location: {}", ctx.router.location());
            println!("History depth: {}", ctx.router.depth());
            println!(
                "Sidebar: {}",
                if ctx.sidebar_open { "open" } else { "collapsed" }
            );
        }
        _ => println!("Unknown command: {}", cmd),
    }
    false
}

fn reject(ctx: &mut Context, form: &str, errors: &FieldErrors) {
    println!("check the form");
    print_field_errors(errors);
    let _ = ctx.transcript.form_rejected(form, errors);
}

fn finish_action(
    ctx: &mut Context,
    name: &str,
    started: Instant,
    result: Result<&'static str, FieldErrors>,
) {
    match result {
        Ok(target) => {
            println!("done");
            let _ = ctx
                .transcript
                .action_ok(name, started.elapsed().as_millis() as u64);
            go(ctx, target);
        }
        Err(errors) => reject(ctx, name, &errors),
    }
}

async fn handle_login(ctx: &mut Context, args: &[String]) {
    let mut form = LoginForm::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--remember" => form.remember_me = true,
            "--company" => form.company = iter.next().cloned().unwrap_or_default(),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    form.email = positional.next().unwrap_or_default();
    form.password = positional.next().unwrap_or_default();
    if let Some(kind) = positional.next() {
        match Role::from_str(&kind) {
            Some(role) => form.login_type = role,
            None => {
                println!("Login type must be 'user' or 'admin'");
                return;
            }
        }
    }

    busy("Signing in");
    match actions::submit_login(&mut ctx.session, &form).await {
        Ok((user, landing)) => {
            println!("welcome, {}", user.name);
            let _ = ctx.transcript.login_ok(&user.email, user.role.as_str());
            go(ctx, landing);
        }
        Err(LoginFailure::Invalid(errors)) => reject(ctx, "login", &errors),
        Err(LoginFailure::Auth(e)) => {
            println!("failed");
            println!("  {}", e);
            let _ = ctx.transcript.login_failed(&form.email, &e.to_string());
        }
    }
}
