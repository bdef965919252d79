mod actions;
mod cli;
mod config;
mod forms;
mod header;
mod layout;
mod logging;
mod pages;
mod render;
mod router;
mod session;
mod sidebar;
mod storage;
mod transcript;
mod user;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "outsideplant",
    about = "Field operations dashboard in the terminal"
)]
pub struct Args {
    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "OUTSIDEPLANT_STORAGE",
        value_name = "PATH",
        help = "Session storage file, or :memory: to keep nothing"
    )]
    pub storage: Option<String>,

    #[arg(long, help = "Skip the simulated network delays")]
    pub no_delay: bool,

    #[arg(long, help = "Session transcripts directory")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Page to open first (default: /)")]
    pub path: Option<String>,

    #[arg(long, help = "List the demo accounts and exit")]
    pub list_demo_users: bool,

    #[arg(long, help = "Debug output (log level debug)")]
    pub debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load()?
    };

    if let Some(storage) = &args.storage {
        cfg.storage.path = Some(storage.clone());
    }
    if args.no_delay {
        cfg.latency.enabled = Some(false);
    }
    if let Some(path) = &args.path {
        cfg.shell.start_path = Some(path.clone());
    }
    if let Some(dir) = &args.transcripts_dir {
        cfg.shell.transcripts_dir = Some(dir.clone());
    }

    if let Err(errors) = cfg.validate() {
        for e in &errors {
            eprintln!("config error: {}", e);
        }
        anyhow::bail!("invalid configuration ({} error(s))", errors.len());
    }

    if args.list_demo_users {
        cli::show_demo_users();
        return Ok(());
    }

    logging::init(if args.debug { "debug" } else { cfg.log_level() })?;

    let (store, storage_label): (Box<dyn storage::KeyValueStore>, String) =
        match cfg.storage_path() {
            Some(path) => {
                let store = storage::FileStore::open(&path);
                let label = store.path().display().to_string();
                (Box::new(store), label)
            }
            None => (
                Box::new(storage::MemoryStore::new()),
                config::MEMORY_STORAGE.to_string(),
            ),
        };
    tracing::debug!(storage = %storage_label, "session storage ready");

    let session = session::SessionStore::new(store, cfg.latency.delay(config::Action::Login));

    let root = std::env::current_dir()?;
    let transcripts_dir = cfg.transcripts_dir(&root);
    std::fs::create_dir_all(&transcripts_dir)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcript_path = transcripts_dir.join(format!("{}.jsonl", session_id));
    let mut transcript = transcript::Transcript::new(&transcript_path, &session_id)?;
    transcript.session_start(&storage_label, cfg.start_path())?;

    let ctx = cli::Context {
        session_id,
        storage_label,
        transcript,
        session,
        actions: actions::AccountActions::new(cfg.latency.clone()),
        router: router::Router::new(cfg.start_path()),
        sidebar_open: cfg.sidebar_open(),
        profile: forms::ProfileForm::default(),
        reset_step: 1,
    };

    cli::run_repl(ctx).await
}
