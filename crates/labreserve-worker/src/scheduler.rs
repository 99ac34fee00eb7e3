//! Cron scheduler driving the sweep.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::info;

use labreserve_core::AppError;
use labreserve_core::config::sweep::SweepConfig;

use crate::sweep::Sweep;

/// Runs the sweep every `interval_seconds`.
pub struct SweepScheduler {
    scheduler: JobScheduler,
    sweep: Arc<Sweep>,
    config: SweepConfig,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("interval_seconds", &self.config.interval_seconds)
            .finish()
    }
}

impl SweepScheduler {
    /// Creates a new scheduler for the given sweep.
    pub async fn new(sweep: Arc<Sweep>, config: SweepConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self {
            scheduler,
            sweep,
            config,
        })
    }

    /// Registers the sweep job and starts ticking.
    pub async fn start(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("Sweep is disabled by configuration");
            return Ok(());
        }

        let sweep = Arc::clone(&self.sweep);
        let schedule = format!("*/{} * * * * *", self.config.interval_seconds);
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                sweep.tick(Utc::now()).await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {e}")))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!(
            interval_seconds = self.config.interval_seconds,
            "Sweep scheduler started"
        );
        Ok(())
    }

    /// Stops ticking.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shut down scheduler: {e}")))?;
        info!("Sweep scheduler shut down");
        Ok(())
    }
}
