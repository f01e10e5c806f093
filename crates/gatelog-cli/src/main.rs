//! gatelog - facility visit log demo
//!
//! Runs the full pipeline over an in-memory store with seeded demo
//! actors and device secrets. A simulated scanner authenticates
//! through the credential gateway and emits entry/exit scans on a
//! timer; the pipeline reacts on the change feed and its effects show
//! up in the structured log output.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: tracing filter directive (default: `info`)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use gatelog_auth::{CredentialGateway, Sha256Signer, StaticRegistry};
use gatelog_pipeline::{
    DeliveryReceipt, IngestionTrigger, NotificationDispatcher, OccupancyAggregator, ProviderError,
    PushPayload, PushProvider, TriggerConfig,
};
use gatelog_store::{ActorProfile, EventStore, MemoryStore};
use gatelog_types::{ActorId, LogId, Role};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Facility visit log demo.
#[derive(Parser, Debug)]
#[command(name = "gatelog")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline with a simulated scanner until ctrl-c.
    Serve {
        /// Maximum concurrent side-effect workers
        #[arg(long, default_value_t = 8)]
        workers: usize,

        /// Change feed buffer size
        #[arg(long, default_value_t = 256)]
        feed_buffer: usize,

        /// Seconds between simulated scans
        #[arg(long, default_value_t = 3)]
        scan_interval: u64,
    },
}

/// Push provider that logs instead of delivering.
struct TracingPushProvider;

#[async_trait]
impl PushProvider for TracingPushProvider {
    async fn send(
        &self,
        destination: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, ProviderError> {
        info!(
            destination,
            actor = %payload.actor_id,
            title = payload.title,
            "push notification (demo: logged only)"
        );
        Ok(DeliveryReceipt(format!("demo-{destination}")))
    }
}

const DEMO_ACTORS: &[(&str, &str, Option<&str>)] = &[
    ("s-1001", "Aoi Tanaka", Some("push-token-1001")),
    ("s-1002", "Ren Suzuki", Some("push-token-1002")),
    ("s-1003", "Mio Sato", None),
];

async fn seed_actors(store: &MemoryStore) -> Result<()> {
    for (id, name, destination) in DEMO_ACTORS {
        let mut profile = ActorProfile::new(ActorId::new(*id), *name, Utc::now());
        if let Some(dest) = destination {
            profile = profile.with_push_destination(*dest);
        }
        store.upsert_actor(profile).await?;
    }
    Ok(())
}

fn demo_gateway() -> CredentialGateway {
    let registry = StaticRegistry::new()
        .with_secret("scanner-001", Role::EdgeScanner, "demo-scanner-secret")
        .with_secret("admin-001", Role::Administrator, "demo-admin-secret");
    CredentialGateway::new(
        Arc::new(registry),
        Arc::new(Sha256Signer::new("demo-signing-key")),
    )
}

/// Walks the demo actors, entering each and exiting them in turn.
async fn simulate_scans(store: Arc<MemoryStore>, interval: Duration) {
    let mut open: Vec<(LogId, ActorId)> = Vec::new();
    let mut next = 0usize;
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        // Enter everyone first, then drain in arrival order.
        if next < DEMO_ACTORS.len() {
            let actor = ActorId::new(DEMO_ACTORS[next].0);
            next += 1;
            match store.create_log(actor.clone(), Utc::now()).await {
                Ok(log_id) => {
                    info!(%actor, %log_id, "scan: entered");
                    open.push((log_id, actor));
                }
                Err(e) => info!(%actor, error = %e, "scan rejected"),
            }
        } else if let Some((log_id, actor)) = open.first().cloned() {
            open.remove(0);
            match store.mark_exited(log_id, Utc::now()).await {
                Ok(()) => info!(%actor, %log_id, "scan: exited"),
                Err(e) => info!(%actor, error = %e, "scan rejected"),
            }
        } else {
            next = 0;
        }
    }
}

async fn serve(workers: usize, feed_buffer: usize, scan_interval: u64) -> Result<()> {
    let store = Arc::new(MemoryStore::with_feed_capacity(feed_buffer));
    seed_actors(&store).await?;

    let gateway = demo_gateway();
    let credential = gateway
        .authenticate_device("scanner-001", b"demo-scanner-secret")
        .context("demo scanner failed to authenticate")?;
    info!(subject = %credential.subject_id, role = %credential.role, "scanner authenticated");

    let dispatcher = Arc::new(NotificationDispatcher::new(
        store.clone(),
        Arc::new(TracingPushProvider),
    ));
    let aggregator = Arc::new(OccupancyAggregator::new(store.clone()));
    let trigger = IngestionTrigger::new(
        dispatcher,
        aggregator,
        TriggerConfig {
            worker_limit: workers,
        },
    );

    let feed = store.subscribe();
    let pipeline = tokio::spawn(trigger.run(feed));
    let scanner = tokio::spawn(simulate_scans(
        store.clone(),
        Duration::from_secs(scan_interval.max(1)),
    ));

    info!(workers, feed_buffer, "gatelog pipeline running, ctrl-c to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    scanner.abort();
    pipeline.abort();
    if let Some(aggregate) = store.read_aggregate().await? {
        info!(
            occupancy = aggregate.current_count,
            "shutting down"
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Serve {
            workers,
            feed_buffer,
            scan_interval,
        } => serve(workers, feed_buffer, scan_interval).await,
    }
}
