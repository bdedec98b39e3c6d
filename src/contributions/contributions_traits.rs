use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::contributions::contributions_errors::Result;
use crate::contributions::contributions_model::{Contribution, ContributionView, NewContribution};

/// Trait for ledger engine operations
#[async_trait]
pub trait ContributionServiceTrait: Send + Sync {
    async fn create_contribution(&self, new_contribution: NewContribution)
        -> Result<Contribution>;
    async fn list_contributions(
        &self,
        goal_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Vec<ContributionView>>;
    async fn get_contribution(
        &self,
        contribution_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<ContributionView>;
    async fn recompute_funded_total(&self, goal_id: &str) -> Result<Decimal>;
    fn update_contribution(&self, contribution_id: &str) -> Result<Contribution>;
    fn delete_contribution(&self, contribution_id: &str) -> Result<()>;
}
