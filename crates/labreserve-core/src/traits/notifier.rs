//! Outbound notification transport trait.
//!
//! Block approvals dispatch an access notice to each address in the
//! group's notification list. The transport (email, SMS) lives outside
//! this system; the allocator only needs something to hand the notice to.

use async_trait::async_trait;

use crate::result::AppResult;

/// Transport for block-approval notices.
#[async_trait]
pub trait BlockNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a notice to the given addresses. A failed delivery must not
    /// roll back the approval that triggered it.
    async fn notify(
        &self,
        addresses: &[String],
        subject: &str,
        body: &str,
        attachment: Option<&str>,
    ) -> AppResult<()>;
}

/// Default notifier that only logs the notice. Used when no real
/// transport is wired in (tests, single-node demo).
#[derive(Debug, Default)]
pub struct TracingBlockNotifier;

#[async_trait]
impl BlockNotifier for TracingBlockNotifier {
    async fn notify(
        &self,
        addresses: &[String],
        subject: &str,
        _body: &str,
        attachment: Option<&str>,
    ) -> AppResult<()> {
        tracing::info!(
            recipients = addresses.len(),
            subject,
            has_attachment = attachment.is_some(),
            "Block-approval notice dispatched"
        );
        Ok(())
    }
}
