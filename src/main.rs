//! LabReserve Server — lab-PC reservation and session-lifecycle engine.
//!
//! Main entry point that wires the stores, services, notification bus,
//! and sweep together.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use labreserve_core::config::AppConfig;
use labreserve_core::error::AppError;
use labreserve_core::traits::notifier::{BlockNotifier, TracingBlockNotifier};
use labreserve_database::memory::{
    MemoryBlockStore, MemoryReservationStore, MemoryResourceStore, MemoryViolationStore,
};
use labreserve_database::postgres::{
    PgBlockStore, PgReservationStore, PgResourceStore, PgViolationStore,
};
use labreserve_database::{
    BlockStore, DatabasePool, ReservationStore, ResourceStore, ViolationStore,
};
use labreserve_realtime::NotificationBus;
use labreserve_service::{
    BlockService, LedgerService, RegistryService, ReservationLocks, SuspensionService,
};
use labreserve_worker::{Sweep, SweepScheduler};

#[tokio::main]
async fn main() {
    let env = std::env::var("LABRESERVE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// The four stores, behind either backend.
struct Stores {
    resources: Arc<dyn ResourceStore>,
    reservations: Arc<dyn ReservationStore>,
    blocks: Arc<dyn BlockStore>,
    violations: Arc<dyn ViolationStore>,
}

async fn connect_stores(config: &AppConfig) -> Result<Stores, AppError> {
    if config.database.url == "memory" {
        tracing::warn!("Using in-memory stores; state will not survive a restart");
        return Ok(Stores {
            resources: Arc::new(MemoryResourceStore::new()),
            reservations: Arc::new(MemoryReservationStore::new()),
            blocks: Arc::new(MemoryBlockStore::new()),
            violations: Arc::new(MemoryViolationStore::new()),
        });
    }

    let db_pool = DatabasePool::connect(&config.database).await?;
    labreserve_database::migration::run_migrations(db_pool.pool()).await?;
    Ok(Stores {
        resources: Arc::new(PgResourceStore::new(db_pool.pool().clone())),
        reservations: Arc::new(PgReservationStore::new(db_pool.pool().clone())),
        blocks: Arc::new(PgBlockStore::new(db_pool.pool().clone())),
        violations: Arc::new(PgViolationStore::new(db_pool.pool().clone())),
    })
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LabReserve v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = connect_stores(&config).await?;

    // ── Step 2: Notification bus ─────────────────────────────────
    let bus = Arc::new(NotificationBus::new(config.bus.buffer_size));

    // ── Step 3: Services ─────────────────────────────────────────
    // The rendering/API layer is an external collaborator; it receives
    // these service handles. This binary itself only drives the sweep.
    let locks = Arc::new(ReservationLocks::new());
    let notifier: Arc<dyn BlockNotifier> = Arc::new(TracingBlockNotifier);

    let registry = Arc::new(RegistryService::new(
        Arc::clone(&stores.resources),
        Arc::clone(&stores.reservations),
        Arc::clone(&bus),
        Arc::clone(&locks),
    ));
    let suspensions = Arc::new(SuspensionService::new(
        Arc::clone(&stores.violations),
        Arc::clone(&bus),
        config.suspension.clone(),
    ));
    let ledger = Arc::new(LedgerService::new(
        Arc::clone(&stores.resources),
        Arc::clone(&stores.reservations),
        Arc::clone(&suspensions),
        Arc::clone(&bus),
        Arc::clone(&locks),
        config.reservation.clone(),
    ));
    let _blocks = Arc::new(BlockService::new(
        Arc::clone(&stores.resources),
        Arc::clone(&stores.reservations),
        Arc::clone(&stores.blocks),
        Arc::clone(&bus),
        notifier,
        Arc::clone(&locks),
        config.reservation.clone(),
    ));
    tracing::info!(
        resources = registry.list_all().await?.len(),
        "Services initialized"
    );

    // ── Step 4: Sweep scheduler ──────────────────────────────────
    let sweep = Arc::new(Sweep::new(
        Arc::clone(&ledger),
        Arc::clone(&suspensions),
        config.sweep.clone(),
    ));
    let mut scheduler = SweepScheduler::new(Arc::clone(&sweep), config.sweep.clone()).await?;
    scheduler.start().await?;

    tracing::info!("LabReserve running; press Ctrl+C to stop");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await?;
    tracing::info!("LabReserve shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
