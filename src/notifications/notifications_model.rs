use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payload handed to the notification sink after a contribution commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionNotification {
    pub amount: Decimal,
    pub goal_name: String,
    pub contributor_name: String,
}
