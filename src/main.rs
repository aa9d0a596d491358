mod config;
mod deploy;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lock::{DistributedLock, RedisLockBackend};
use metrics::{run_metrics_server, Metrics, MetricsServerConfig};
use networking::{BeaconNode, HttpBeaconNode};
use scanner::{load_chain_spec, RangeScanner, ScanContext, TailingScanner};
use storage::SqliteStore;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::deploy::{deploy, Deployment};

#[derive(Parser, Debug)]
#[command(about = "Ingest beacon chain blocks into a queryable store")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or upgrade the database schema.
    Migrate,
    /// Create scan tasks from a deployment file.
    Deploy {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Follow the chain head.
    Scan,
    /// Run the enabled range tasks.
    Backfill,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command {
        Command::Migrate => {
            SqliteStore::open(&config.database.path).context("failed to migrate database")?;
            info!(path = %config.database.path.display(), "Database schema is up to date");
        }
        Command::Deploy { file } => {
            let deployment = Deployment::load(&file)?;
            let store = SqliteStore::open(&config.database.path).context("failed to open database")?;
            let report = deploy(&store, &deployment)?;
            info!(?report, "Deployment finished");
        }
        Command::Scan => {
            let ctx = context(&config).await?;
            let shutdown = shutdown_signal();
            TailingScanner::new(ctx).run(shutdown).await;
        }
        Command::Backfill => {
            let ctx = context(&config).await?;
            let shutdown = shutdown_signal();
            RangeScanner::new(ctx).run(shutdown).await;
        }
    }

    Ok(())
}

async fn context(config: &Config) -> Result<Arc<ScanContext>> {
    let store = Arc::new(SqliteStore::open(&config.database.path).context("failed to open database")?);

    let node: Arc<dyn BeaconNode> = Arc::new(
        HttpBeaconNode::new(&config.beacon.url, config.beacon_timeout())
            .context("failed to build beacon node client")?,
    );
    let spec = load_chain_spec(node.as_ref()).await;

    let mut ctx = ScanContext::new(node, store, spec).with_config(config.scanner_config());

    if let Some(redis) = &config.redis {
        let backend = RedisLockBackend::connect(&redis.url)
            .await
            .context("failed to connect to redis")?;
        let lock = DistributedLock::new(Arc::new(backend));
        info!(lock_ttl_secs = redis.lock_ttl_secs, "Task coordination through redis enabled");
        ctx = ctx.with_lock(Arc::new(lock));
    }

    if let Some(metrics_config) = &config.metrics {
        let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
        let server_config = MetricsServerConfig::from(metrics_config);
        tokio::spawn({
            let metrics = Arc::clone(&metrics);
            async move {
                if let Err(err) = run_metrics_server(server_config, metrics).await {
                    error!(%err, "Metrics server exited");
                }
            }
        });
        ctx = ctx.with_metrics(metrics);
    }

    Ok(Arc::new(ctx))
}

/// Flips to `true` on Ctrl-C.
fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(err) => warn!(%err, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = tx.send(true);
    });
    rx
}
