//! votegate: authenticate, register a face, and cast exactly one vote.

mod detections;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use votegate_remote::{HttpClient, RestDescriptorStore, RestIdentityStore, RestVoteLedger};
use votegate_store::{DescriptorStore, VoteLedger};
use votegate_store_lmdb::LmdbEnvironment;
use votegate_types::SystemClock;
use votegate_workflow::{
    init_logging, Collaborators, Credential, Identity, LedgerBackend, VoteGateConfig,
    VotingWorkflow, WorkflowError,
};

use crate::detections::{DetectionFileCamera, JsonDetector};

#[derive(Parser)]
#[command(name = "votegate", about = "Identity-gated single-vote casting")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VOTEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the local ledger.
    #[arg(long, env = "VOTEGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Ledger backend: "lmdb" or "remote".
    #[arg(long, env = "VOTEGATE_LEDGER_BACKEND")]
    ledger_backend: Option<String>,

    /// Base URL of the identity REST API.
    #[arg(long, env = "VOTEGATE_IDENTITY_URL")]
    identity_url: Option<String>,

    /// Base URL of the document store.
    #[arg(long, env = "VOTEGATE_DOCUMENTS_URL")]
    documents_url: Option<String>,

    #[arg(long, env = "VOTEGATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "VOTEGATE_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Per-call deadline in milliseconds; 0 disables it.
    #[arg(long, env = "VOTEGATE_CALL_TIMEOUT_MS")]
    call_timeout_ms: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOTEGATE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTEGATE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Sign in (or up), register the face from a detections file, and vote.
    Vote {
        #[arg(long, env = "VOTEGATE_EMAIL")]
        email: String,

        #[arg(long, env = "VOTEGATE_PASSWORD", hide_env_values = true)]
        password: String,

        /// JSON array of face descriptors produced by the face detector.
        #[arg(long)]
        detections: PathBuf,

        /// Create the account instead of signing in.
        #[arg(long)]
        sign_up: bool,
    },
    /// Inspect the vote ledger.
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(clap::Subcommand)]
enum LedgerAction {
    /// Show the vote record for one identity.
    Show { identity: String },
    /// Count recorded votes (local ledger only).
    Count,
}

fn parse_backend(s: &str) -> anyhow::Result<LedgerBackend> {
    match s.to_ascii_lowercase().as_str() {
        "lmdb" => Ok(LedgerBackend::Lmdb),
        "remote" => Ok(LedgerBackend::Remote),
        other => bail!("unknown ledger backend '{other}' (expected lmdb or remote)"),
    }
}

/// File settings as the base, flags and env vars on top.
fn effective_config(cli: &Cli) -> anyhow::Result<VoteGateConfig> {
    let base = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            VoteGateConfig::from_toml_file(&path)
                .with_context(|| format!("loading config from {path}"))?
        }
        None => VoteGateConfig::default(),
    };

    let ledger_backend = match cli.ledger_backend.as_deref() {
        Some(s) => parse_backend(s)?,
        None => base.ledger_backend,
    };

    Ok(VoteGateConfig {
        data_dir: cli.data_dir.clone().unwrap_or(base.data_dir),
        ledger_backend,
        identity_url: cli.identity_url.clone().unwrap_or(base.identity_url),
        documents_url: cli.documents_url.clone().unwrap_or(base.documents_url),
        api_key: cli.api_key.clone().unwrap_or(base.api_key),
        auth_token: cli.auth_token.clone().or(base.auth_token),
        call_timeout_ms: cli.call_timeout_ms.unwrap_or(base.call_timeout_ms),
        log_format: cli.log_format.clone().unwrap_or(base.log_format),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        ..base
    })
}

fn documents_client(config: &VoteGateConfig) -> anyhow::Result<HttpClient> {
    if config.documents_url.is_empty() {
        bail!("the remote ledger backend needs documents_url");
    }
    let client = HttpClient::new(&config.documents_url)?;
    Ok(match &config.auth_token {
        Some(token) => client.with_bearer(token),
        None => client,
    })
}

fn open_lmdb(config: &VoteGateConfig) -> anyhow::Result<LmdbEnvironment> {
    LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)
        .with_context(|| format!("opening ledger in {}", config.data_dir.display()))
}

/// Ledger and descriptor store for the configured backend.
fn stores(
    config: &VoteGateConfig,
) -> anyhow::Result<(Arc<dyn VoteLedger>, Arc<dyn DescriptorStore>)> {
    Ok(match config.ledger_backend {
        LedgerBackend::Lmdb => {
            let env = open_lmdb(config)?;
            (Arc::new(env.vote_ledger()), Arc::new(env.descriptor_store()))
        }
        LedgerBackend::Remote => {
            let client = documents_client(config)?;
            (
                Arc::new(RestVoteLedger::new(client.clone())),
                Arc::new(RestDescriptorStore::new(client)),
            )
        }
    })
}

async fn run_vote(
    config: &VoteGateConfig,
    credential: Credential,
    detections: PathBuf,
    sign_up: bool,
) -> anyhow::Result<()> {
    let (ledger, descriptors) = stores(config)?;
    let identity = RestIdentityStore::new(HttpClient::new(&config.identity_url)?, &config.api_key);

    let workflow = VotingWorkflow::new(
        Collaborators {
            identity: Arc::new(identity),
            camera: Arc::new(DetectionFileCamera::new(detections)),
            detector: Arc::new(JsonDetector),
            descriptors,
            ledger,
            clock: Arc::new(SystemClock),
        },
        config.workflow_options(),
    );

    let token = workflow.open_session();
    let outcome = async {
        if sign_up {
            workflow.sign_up(&token, &credential).await?;
        } else {
            workflow.sign_in(&token, &credential).await?;
        }
        workflow.register_biometric(&token).await?;
        workflow.cast_vote(&token).await
    }
    .await;
    workflow.logout(&token);

    match outcome {
        Ok(receipt) => {
            println!("vote recorded for {} at {}", receipt.identity, receipt.timestamp);
            Ok(())
        }
        Err(e @ WorkflowError::AlreadyVoted { .. }) => {
            println!("{e}");
            Ok(())
        }
        Err(e) if e.is_retryable() => Err(anyhow::Error::new(e).context("try again")),
        Err(e) => Err(e.into()),
    }
}

async fn run_ledger(config: &VoteGateConfig, action: LedgerAction) -> anyhow::Result<()> {
    match action {
        LedgerAction::Show { identity } => {
            let identity = Identity::new(identity)?;
            let (ledger, _) = stores(config)?;
            match ledger.get(&identity).await? {
                Some(record) => println!(
                    "{}: voted={} at {}",
                    record.identity, record.cast, record.timestamp
                ),
                None => println!("{identity}: no vote recorded"),
            }
        }
        LedgerAction::Count => {
            if config.ledger_backend != LedgerBackend::Lmdb {
                bail!("ledger count is only available for the lmdb backend");
            }
            let count = open_lmdb(config)?.vote_ledger().len()?;
            println!("{count}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    init_logging(config.log_format()?, &config.log_level)?;
    tracing::debug!(backend = ?config.ledger_backend, data_dir = %config.data_dir.display(), "configuration loaded");

    match cli.command {
        Command::Vote {
            email,
            password,
            detections,
            sign_up,
        } => run_vote(&config, Credential::new(email, password), detections, sign_up).await,
        Command::Ledger { action } => run_ledger(&config, action).await,
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
