use async_trait::async_trait;
use log::info;

use crate::notifications::notifications_model::ContributionNotification;
use crate::notifications::notifications_traits::NotifierTrait;

/// Notifier that writes the event to the application log instead of
/// delivering mail. Default sink for tests and headless deployments.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl NotifierTrait for LogNotifier {
    async fn notify_contribution(
        &self,
        to_email: &str,
        notification: &ContributionNotification,
    ) -> anyhow::Result<()> {
        info!(
            "contribution of {} toward '{}' by {} (owner: {})",
            notification.amount, notification.goal_name, notification.contributor_name, to_email
        );
        Ok(())
    }
}
