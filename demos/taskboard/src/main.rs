//! Todosync task board
//!
//! Keeps a terminal view of the favorite-labelled tasks in sync with the
//! remote task list.
//!
//! Settings come from the environment (see `todosync::config`) and can be
//! overridden with flags:
//! - TODOSYNC_API_TOKEN / --token: bearer token (required)
//! - TODOSYNC_API_URL / --api-url: sync endpoint
//! - TODOSYNC_SNAPSHOT / --snapshot: snapshot file
//! - TODOSYNC_INTERVAL_SECS / --interval: seconds between syncs
//! - RUST_LOG / --log-level: log filter
//!
//! Commands on stdin: `u` (update), `s` (full sync), `q` (quit). When stdin
//! is closed (a service, a container, `</dev/null`) the board keeps running
//! until interrupted.

mod health;
mod render;

use std::future::Future;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use todosync::prelude::*;
use todosync::scheduler;

use crate::render::TerminalRenderer;

/// Todosync task board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sync endpoint URL
    #[arg(long)]
    api_url: Option<String>,

    /// API token
    #[arg(long)]
    token: Option<String>,

    /// Snapshot file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Seconds between automatic syncs
    #[arg(short, long)]
    interval: Option<u32>,

    /// Merge policy (append, replace-on-full-sync)
    #[arg(long)]
    merge_policy: Option<MergePolicy>,

    /// Task scorer (random, due-date)
    #[arg(long)]
    scorer: Option<ScorePolicy>,

    /// Serve /health, /ready and /live on this address
    #[arg(long)]
    health_addr: Option<SocketAddr>,

    /// Disable colors and the live countdown
    #[arg(long)]
    plain: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Apply command line overrides to `base` and validate.
    fn configure(&self, base: SyncConfig) -> Result<SyncConfig, ConfigError> {
        let mut builder = SyncConfigBuilder::from_config(base);
        if let Some(url) = &self.api_url {
            builder = builder.api_url(url.clone());
        }
        if let Some(token) = &self.token {
            builder = builder.api_token(token.clone());
        }
        if let Some(path) = &self.snapshot {
            builder = builder.snapshot_path(path.clone());
        }
        if let Some(secs) = self.interval {
            builder = builder.interval_secs(secs);
        }
        if let Some(policy) = self.merge_policy {
            builder = builder.merge_policy(policy);
        }
        if let Some(scorer) = self.scorer {
            builder = builder.scorer(scorer);
        }
        builder.build()
    }
}

/// Board errors.
#[derive(Debug, Error)]
enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scheduler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Commands read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardCommand {
    Update,
    FullSync,
    Quit,
    Help,
}

impl BoardCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "u" | "update" => Some(Self::Update),
            "s" | "sync" => Some(Self::FullSync),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

const HELP: &str = "commands: u(pdate) | s(ync, full) | q(uit)";

/// Forward commands from `input` to the scheduler until `q` or `stop`.
///
/// End of input only stops reading; the loop then waits for `stop` alone.
async fn command_loop<I, S>(input: I, handle: &SyncHandle, stop: S) -> Result<(), BoardError>
where
    I: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(stop);
    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    info!("stdin closed, running until interrupted");
                    input_open = false;
                    continue;
                };
                match BoardCommand::parse(&line) {
                    Some(BoardCommand::Update) => handle.update().await?,
                    Some(BoardCommand::FullSync) => handle.full_sync().await?,
                    Some(BoardCommand::Quit) => return Ok(()),
                    Some(BoardCommand::Help) => eprintln!("{}", HELP),
                    None if line.trim().is_empty() => {}
                    None => eprintln!("unknown command {:?}; {}", line.trim(), HELP),
                }
            }
            _ = &mut stop => return Ok(()),
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), BoardError> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = args.configure(SyncConfig::from_env()?)?;
    info!(?config, "todosync-board v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpSyncClient::from_config(&config)?;
    let store = JsonFileStore::new(&config.snapshot_path);
    let engine = SyncEngine::open(client, store)?;

    let ansi = !args.plain && std::io::stdout().is_terminal();
    let mut renderer = TerminalRenderer::new(std::io::stdout(), ansi);
    renderer.on_content(engine.content());

    let engine = engine
        .with_interval(config.interval_secs)
        .with_merge_policy(config.merge_policy)
        .with_scorer(config.scorer.build())
        .with_observer(Box::new(renderer));

    let (handle, task) = scheduler::spawn(engine, SchedulerConfig::default());

    if let Some(addr) = args.health_addr {
        let health_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(err) = health::start_health_server(addr, health_handle).await {
                error!(error = %err, "health server failed");
            }
        });
    }

    eprintln!("{}", HELP);
    let interrupted = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    command_loop(BufReader::new(tokio::io::stdin()), &handle, interrupted).await?;

    if let Err(err) = handle.shutdown().await {
        warn!(error = %err, "scheduler already stopped");
    }
    let engine = task.await?;
    info!(
        tasks = engine.content().tasks.len(),
        cursor = %engine.content().sync_cursor,
        "stopped"
    );

    Ok(())
}
