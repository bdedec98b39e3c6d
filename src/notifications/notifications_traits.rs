use async_trait::async_trait;

use crate::notifications::notifications_model::ContributionNotification;

/// Trait for the notification sink collaborator.
///
/// Delivery is best-effort: the ledger attempts it once after commit, logs a
/// failure and never lets it affect the committed contribution.
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    async fn notify_contribution(
        &self,
        to_email: &str,
        notification: &ContributionNotification,
    ) -> anyhow::Result<()>;
}
