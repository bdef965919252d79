use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Special storage path that keeps everything in memory
pub const MEMORY_STORAGE: &str = ":memory:";

const MAX_LATENCY_MS: u64 = 60_000;
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Simulated round-trip delays, one per account action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    ResetLink,
    PasswordReset,
    Registration,
    PasswordChange,
    ProfileSave,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::ResetLink => "reset_link",
            Self::PasswordReset => "password_reset",
            Self::Registration => "registration",
            Self::PasswordChange => "password_change",
            Self::ProfileSave => "profile_save",
        }
    }
}

/// Configuration for simulated latency (milliseconds)
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LatencyConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub login: Option<u64>,
    #[serde(default)]
    pub reset_link: Option<u64>,
    #[serde(default)]
    pub password_reset: Option<u64>,
    #[serde(default)]
    pub registration: Option<u64>,
    #[serde(default)]
    pub password_change: Option<u64>,
    #[serde(default)]
    pub profile_save: Option<u64>,
}

impl LatencyConfig {
    fn millis(&self, action: Action) -> u64 {
        match action {
            Action::Login => self.login.unwrap_or(1500),
            Action::ResetLink => self.reset_link.unwrap_or(1500),
            Action::PasswordReset => self.password_reset.unwrap_or(1500),
            Action::Registration => self.registration.unwrap_or(2000),
            Action::PasswordChange => self.password_change.unwrap_or(0),
            Action::ProfileSave => self.profile_save.unwrap_or(0),
        }
    }

    /// Delay for an action; zero when latency simulation is disabled
    pub fn delay(&self, action: Action) -> Duration {
        if self.enabled == Some(false) {
            return Duration::ZERO;
        }
        Duration::from_millis(self.millis(action))
    }

    fn all(&self) -> [(Action, Option<u64>); 6] {
        [
            (Action::Login, self.login),
            (Action::ResetLink, self.reset_link),
            (Action::PasswordReset, self.password_reset),
            (Action::Registration, self.registration),
            (Action::PasswordChange, self.password_change),
            (Action::ProfileSave, self.profile_save),
        ]
    }
}

/// Where the session key-value store lives
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<String>,
}

/// Shell behaviour
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ShellConfig {
    #[serde(default)]
    pub sidebar_open: Option<bool>,
    #[serde(default)]
    pub transcripts_dir: Option<PathBuf>,
    #[serde(default)]
    pub start_path: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

fn config_dir_name() -> &'static str {
    ".outsideplant"
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.outsideplant/config.local.toml) > project (.outsideplant/config.toml)
    /// > user (~/.outsideplant/config.toml) > built-in defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(config_dir_name()).join("config.toml");
            if user_config.exists() {
                config.merge(Self::load_from(&user_config)?);
            }
        }

        let project_config = Path::new(config_dir_name()).join("config.toml");
        if project_config.exists() {
            config.merge(Self::load_from(&project_config)?);
        }

        // Should be gitignored
        let local_config = Path::new(config_dir_name()).join("config.local.toml");
        if local_config.exists() {
            config.merge(Self::load_from(&local_config)?);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority for every field it sets)
    pub fn merge(&mut self, other: Config) {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }

        if other.storage.path.is_some() {
            self.storage.path = other.storage.path;
        }

        let l = other.latency;
        if l.enabled.is_some() {
            self.latency.enabled = l.enabled;
        }
        if l.login.is_some() {
            self.latency.login = l.login;
        }
        if l.reset_link.is_some() {
            self.latency.reset_link = l.reset_link;
        }
        if l.password_reset.is_some() {
            self.latency.password_reset = l.password_reset;
        }
        if l.registration.is_some() {
            self.latency.registration = l.registration;
        }
        if l.password_change.is_some() {
            self.latency.password_change = l.password_change;
        }
        if l.profile_save.is_some() {
            self.latency.profile_save = l.profile_save;
        }

        if other.shell.sidebar_open.is_some() {
            self.shell.sidebar_open = other.shell.sidebar_open;
        }
        if other.shell.transcripts_dir.is_some() {
            self.shell.transcripts_dir = other.shell.transcripts_dir;
        }
        if other.shell.start_path.is_some() {
            self.shell.start_path = other.shell.start_path;
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    pub fn sidebar_open(&self) -> bool {
        self.shell.sidebar_open.unwrap_or(true)
    }

    pub fn start_path(&self) -> &str {
        self.shell.start_path.as_deref().unwrap_or("/")
    }

    /// Storage location; `None` means in-memory
    pub fn storage_path(&self) -> Option<PathBuf> {
        match self.storage.path.as_deref() {
            Some(MEMORY_STORAGE) => None,
            Some(path) => Some(PathBuf::from(shell_expand_home(path))),
            None => Some(
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(config_dir_name())
                    .join("storage.json"),
            ),
        }
    }

    pub fn transcripts_dir(&self, root: &Path) -> PathBuf {
        self.shell
            .transcripts_dir
            .clone()
            .unwrap_or_else(|| root.join(config_dir_name()).join("sessions"))
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                errors.push(ValidationError {
                    field: "log_level".to_string(),
                    message: format!(
                        "Unknown log level '{}', expected one of {}",
                        level,
                        LOG_LEVELS.join(", ")
                    ),
                });
            }
        }

        if let Some(path) = &self.storage.path {
            if path.trim().is_empty() {
                errors.push(ValidationError {
                    field: "storage.path".to_string(),
                    message: "Must not be empty".to_string(),
                });
            }
        }

        for (action, ms) in self.latency.all() {
            if let Some(ms) = ms {
                if ms > MAX_LATENCY_MS {
                    errors.push(ValidationError {
                        field: format!("latency.{}", action.as_str()),
                        message: format!("Must be at most {} ms, got {}", MAX_LATENCY_MS, ms),
                    });
                }
            }
        }

        if let Some(start) = &self.shell.start_path {
            if !start.starts_with('/') {
                errors.push(ValidationError {
                    field: "shell.start_path".to_string(),
                    message: format!("Path must start with '/', got '{}'", start),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn shell_expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
