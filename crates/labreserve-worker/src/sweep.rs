//! The three sweep passes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error};

use labreserve_core::config::sweep::SweepConfig;
use labreserve_service::{LedgerService, SuspensionService};

/// One tick of the expiry/warning/reinstatement sweep.
///
/// The three passes are independent and order-insensitive; each is
/// wrapped so a failure in one never aborts the others or the next
/// tick. All mutation goes through the ledger's and suspension
/// service's own idempotent operations, so the sweep stays correct when
/// it races live requests or another sweep process.
#[derive(Debug, Clone)]
pub struct Sweep {
    ledger: Arc<LedgerService>,
    suspensions: Arc<SuspensionService>,
    config: SweepConfig,
}

impl Sweep {
    /// Creates a new sweep.
    pub fn new(
        ledger: Arc<LedgerService>,
        suspensions: Arc<SuspensionService>,
        config: SweepConfig,
    ) -> Self {
        Self {
            ledger,
            suspensions,
            config,
        }
    }

    /// Runs the three passes for the given instant.
    pub async fn tick(&self, now: DateTime<Utc>) {
        match self.ledger.expire_due(now).await {
            Ok(0) => {}
            Ok(expired) => debug!(expired, "Sweep expired sessions"),
            Err(e) => error!(error = %e, "Sweep expiry pass failed"),
        }

        let lead = Duration::minutes(self.config.warning_lead_minutes);
        let slack = Duration::seconds(self.config.warning_slack_seconds);
        match self
            .ledger
            .warn_ending(now, now + lead - slack, now + lead + slack)
            .await
        {
            Ok(0) => {}
            Ok(warned) => debug!(warned, "Sweep sent ending-soon warnings"),
            Err(e) => error!(error = %e, "Sweep warning pass failed"),
        }

        match self.suspensions.auto_release_expired(now).await {
            Ok(0) => {}
            Ok(released) => debug!(released, "Sweep released suspensions"),
            Err(e) => error!(error = %e, "Sweep reinstatement pass failed"),
        }
    }
}
