use crate::forms::FieldErrors;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of what happened in one shell session
pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, storage: &str, start_path: &str) -> Result<()> {
        self.log(
            "session_start",
            serde_json::json!({ "storage": storage, "path": start_path }),
        )
    }

    pub fn navigate(&mut self, from: &str, to: &str) -> Result<()> {
        self.log("navigate", serde_json::json!({ "from": from, "to": to }))
    }

    pub fn login_ok(&mut self, email: &str, role: &str) -> Result<()> {
        self.log(
            "login_ok",
            serde_json::json!({ "email": email, "role": role }),
        )
    }

    /// Never records the password
    pub fn login_failed(&mut self, email: &str, error: &str) -> Result<()> {
        self.log(
            "login_failed",
            serde_json::json!({ "email": email, "error": error }),
        )
    }

    pub fn logout(&mut self, email: Option<&str>) -> Result<()> {
        self.log("logout", serde_json::json!({ "email": email }))
    }

    /// Log the outcome of restoring a saved session
    pub fn session_init(&mut self, outcome: &str, email: Option<&str>) -> Result<()> {
        self.log(
            "session_init",
            serde_json::json!({ "outcome": outcome, "email": email }),
        )
    }

    /// Log a form that failed field validation
    pub fn form_rejected(&mut self, form: &str, errors: &FieldErrors) -> Result<()> {
        self.log(
            "form_rejected",
            serde_json::json!({ "form": form, "fields": errors.keys().collect::<Vec<_>>() }),
        )
    }

    /// Log a simulated account action that completed
    pub fn action_ok(&mut self, action: &str, duration_ms: u64) -> Result<()> {
        self.log(
            "action_ok",
            serde_json::json!({ "action": action, "duration_ms": duration_ms }),
        )
    }
}
