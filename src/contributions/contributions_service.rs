use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::{debug, error};
use rust_decimal::Decimal;

use crate::constants::{ANONYMOUS_CONTRIBUTOR_NAME, MAX_WRITE_ATTEMPTS};
use crate::contributions::contributions_errors::{ContributionError, Result};
use crate::contributions::contributions_model::{
    Contribution, ContributionDB, ContributionView, NewContribution,
};
use crate::contributions::contributions_repository::ContributionRepository;
use crate::contributions::contributions_traits::ContributionServiceTrait;
use crate::db::{get_connection, is_lock_contention, DbPool, GoalLocks};
use crate::goals::{Goal, GoalDB, GoalRepository};
use crate::notifications::{ContributionNotification, NotifierTrait};
use crate::users::UserLookupTrait;

/// The ledger engine: creates contributions, keeps each goal's funded total
/// consistent with its contribution set, and masks amounts on read.
pub struct ContributionService {
    pool: Arc<DbPool>,
    locks: Arc<GoalLocks>,
    users: Arc<dyn UserLookupTrait>,
    notifier: Arc<dyn NotifierTrait>,
}

impl ContributionService {
    /// Creates a new ContributionService instance with injected collaborators
    pub fn new(
        pool: Arc<DbPool>,
        locks: Arc<GoalLocks>,
        users: Arc<dyn UserLookupTrait>,
        notifier: Arc<dyn NotifierTrait>,
    ) -> Self {
        Self {
            pool,
            locks,
            users,
            notifier,
        }
    }

    /// Runs `f` inside an immediate transaction, retrying the whole closure
    /// (precondition checks included) a bounded number of times on storage
    /// contention.
    fn run_write<T, F>(&self, conn: &mut SqliteConnection, f: F) -> Result<T>
    where
        F: Fn(&mut SqliteConnection) -> Result<T>,
    {
        let mut attempts = 0;
        loop {
            match conn.immediate_transaction(|tx| f(tx)) {
                Err(ContributionError::Database(ref e)) if is_lock_contention(e) => {
                    attempts += 1;
                    if attempts >= MAX_WRITE_ATTEMPTS {
                        return Err(ContributionError::Busy);
                    }
                }
                other => return other,
            }
        }
    }

    fn load_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<GoalDB> {
        GoalRepository::find_by_id(conn, goal_id).map_err(|e| match e {
            diesel::result::Error::NotFound => {
                ContributionError::NotFound(format!("goal {}", goal_id))
            }
            other => other.into(),
        })
    }

    async fn view_of(
        &self,
        contribution: Contribution,
        goal: &Goal,
        viewer_id: Option<&str>,
    ) -> Result<ContributionView> {
        let contributor = self.users.get_user(&contribution.contributor_id).await?;
        Ok(ContributionView::project(
            &contribution,
            goal,
            &contributor,
            viewer_id,
        ))
    }

    /// Post-commit owner notification: attempted once on a detached task,
    /// logged on failure, never surfaced to the contributor.
    fn dispatch_notification(&self, goal: &GoalDB, contribution: &ContributionDB) {
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let owner_id = goal.owner_id.clone();
        let goal_name = goal.name.clone();
        let contributor_id = contribution.contributor_id.clone();
        let amount = Decimal::from_str(&contribution.amount).unwrap_or_default();

        tokio::spawn(async move {
            let owner = match users.get_user(&owner_id).await {
                Ok(owner) => owner,
                Err(e) => {
                    error!(
                        "Skipping contribution notification, cannot resolve goal owner {}: {}",
                        owner_id, e
                    );
                    return;
                }
            };

            let contributor_name = match users.get_user(&contributor_id).await {
                Ok(profile) => profile
                    .username
                    .unwrap_or_else(|| ANONYMOUS_CONTRIBUTOR_NAME.to_string()),
                Err(_) => ANONYMOUS_CONTRIBUTOR_NAME.to_string(),
            };

            let notification = ContributionNotification {
                amount,
                goal_name,
                contributor_name,
            };
            if let Err(e) = notifier
                .notify_contribution(&owner.email, &notification)
                .await
            {
                error!("Contribution notification delivery failed: {:#}", e);
            }
        });
    }
}

#[async_trait]
impl ContributionServiceTrait for ContributionService {
    async fn create_contribution(
        &self,
        new_contribution: NewContribution,
    ) -> Result<Contribution> {
        new_contribution.validate()?;
        debug!(
            "Creating contribution of {} toward goal {}",
            new_contribution.amount, new_contribution.goal_id
        );

        // Serialize against every other state transition of this goal; other
        // goals keep going in parallel.
        let _guard = self
            .locks
            .acquire(&new_contribution.goal_id)
            .await
            .ok_or(ContributionError::Timeout)?;

        let mut conn = get_connection(&self.pool)?;
        let (contribution_row, goal_row) = self.run_write(&mut conn, |tx| {
            let goal = Self::load_goal(tx, &new_contribution.goal_id)?;

            // Ownership is immutable, but the re-check costs one compare.
            if goal.owner_id == new_contribution.contributor_id {
                return Err(ContributionError::SelfFunding);
            }

            // Remaining is computed from the row as committed right now, not
            // from anything read before the lock was taken.
            let price = Decimal::from_str(&goal.price).unwrap_or_default();
            let raised = Decimal::from_str(&goal.raised).unwrap_or_default();
            let remaining = price - raised;
            if remaining <= Decimal::ZERO {
                return Err(ContributionError::AlreadyFunded);
            }
            if new_contribution.canonical_amount() > remaining {
                return Err(ContributionError::ExceedsRemaining { remaining });
            }

            let row = ContributionRepository::insert(tx, &new_contribution)?;

            // The funded total is always rewritten from the contribution
            // rows, never incremented, so a repair can regenerate it and a
            // partial earlier write cannot poison it.
            let total = ContributionRepository::sum_for_goal(tx, &goal.id)?;
            GoalRepository::set_raised(tx, &goal.id, total)?;

            Ok((row, goal))
        })?;

        self.dispatch_notification(&goal_row, &contribution_row);
        Ok(Contribution::from(contribution_row))
    }

    async fn list_contributions(
        &self,
        goal_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<Vec<ContributionView>> {
        let mut conn = get_connection(&self.pool)?;
        let goal = Goal::from(Self::load_goal(&mut conn, goal_id)?);
        let rows = ContributionRepository::load_by_goal(&mut conn, goal_id)?;
        drop(conn);

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(
                self.view_of(Contribution::from(row), &goal, viewer_id)
                    .await?,
            );
        }
        Ok(views)
    }

    async fn get_contribution(
        &self,
        contribution_id: &str,
        viewer_id: Option<&str>,
    ) -> Result<ContributionView> {
        let mut conn = get_connection(&self.pool)?;
        let row = ContributionRepository::find_by_id(&mut conn, contribution_id).map_err(|e| {
            match e {
                diesel::result::Error::NotFound => {
                    ContributionError::NotFound(format!("contribution {}", contribution_id))
                }
                other => other.into(),
            }
        })?;
        let goal = Goal::from(Self::load_goal(&mut conn, &row.goal_id)?);
        drop(conn);

        self.view_of(Contribution::from(row), &goal, viewer_id).await
    }

    /// Idempotent repair helper: regenerates the materialized funded total
    /// strictly from the contribution rows.
    async fn recompute_funded_total(&self, goal_id: &str) -> Result<Decimal> {
        let _guard = self
            .locks
            .acquire(goal_id)
            .await
            .ok_or(ContributionError::Timeout)?;

        let mut conn = get_connection(&self.pool)?;
        self.run_write(&mut conn, |tx| {
            Self::load_goal(tx, goal_id)?;
            let total = ContributionRepository::sum_for_goal(tx, goal_id)?;
            GoalRepository::set_raised(tx, goal_id, total)?;
            Ok(total)
        })
    }

    fn update_contribution(&self, _contribution_id: &str) -> Result<Contribution> {
        Err(ContributionError::NotAllowed(
            "Contributions are append-only and cannot be edited".to_string(),
        ))
    }

    fn delete_contribution(&self, _contribution_id: &str) -> Result<()> {
        Err(ContributionError::NotAllowed(
            "Contributions are append-only and cannot be deleted".to_string(),
        ))
    }
}
