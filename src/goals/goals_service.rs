use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use rust_decimal::Decimal;

use crate::constants::{COMBINED_FEED_LIMIT, MAX_WRITE_ATTEMPTS};
use crate::db::{get_connection, is_lock_contention, DbPool, GoalLocks};
use crate::goals::goals_errors::{GoalError, Result};
use crate::goals::goals_model::{Goal, GoalDB, GoalIdentity, GoalUpdate, NewGoal};
use crate::goals::goals_repository::GoalRepository;
use crate::goals::goals_traits::GoalServiceTrait;

/// Service for managing funding goals, including the duplication
/// ("copy into my list") flow.
pub struct GoalService {
    pool: Arc<DbPool>,
    locks: Arc<GoalLocks>,
}

impl GoalService {
    /// Creates a new GoalService instance. The lock registry must be shared
    /// with the contribution service so both serialize on the same goals.
    pub fn new(pool: Arc<DbPool>, locks: Arc<GoalLocks>) -> Self {
        Self { pool, locks }
    }

    /// Runs `f` inside an immediate transaction, retrying the whole closure
    /// (checks included) a bounded number of times on storage contention.
    fn run_write<T, F>(&self, conn: &mut SqliteConnection, f: F) -> Result<T>
    where
        F: Fn(&mut SqliteConnection) -> Result<T>,
    {
        let mut attempts = 0;
        loop {
            match conn.immediate_transaction(|tx| f(tx)) {
                Err(GoalError::Database(ref e)) if is_lock_contention(e) => {
                    attempts += 1;
                    if attempts >= MAX_WRITE_ATTEMPTS {
                        return Err(GoalError::Busy);
                    }
                }
                other => return other,
            }
        }
    }

    fn load_goal(&self, goal_id: &str) -> Result<GoalDB> {
        let mut conn = get_connection(&self.pool)?;
        GoalRepository::find_by_id(&mut conn, goal_id)
            .map_err(|e| not_found_as(e, goal_id))
    }
}

fn not_found_as(err: diesel::result::Error, goal_id: &str) -> GoalError {
    match err {
        diesel::result::Error::NotFound => GoalError::NotFound(goal_id.to_string()),
        other => other.into(),
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.load_goal(goal_id).map(Goal::from)
    }

    fn list_goals_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = GoalRepository::load_by_owner(&mut conn, owner_id)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn list_recent(&self, page: i64) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = GoalRepository::load_recent(&mut conn, page)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn list_top(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = GoalRepository::load_top(&mut conn)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    /// Recent and most-copied goals merged, de-duplicated by id, capped.
    fn combined_feed(&self, page: i64) -> Result<Vec<Goal>> {
        let mut feed = self.list_recent(page)?;
        feed.extend(self.list_top()?);

        let mut seen = HashSet::new();
        feed.retain(|goal| seen.insert(goal.id.clone()));
        feed.truncate(COMBINED_FEED_LIMIT);
        Ok(feed)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        debug!("Creating goal '{}' for {}", new_goal.name, new_goal.owner_id);

        let mut conn = get_connection(&self.pool)?;
        let row = self.run_write(&mut conn, |tx| {
            if GoalRepository::find_duplicate(tx, &new_goal.owner_id, &new_goal.identity())?
                .is_some()
            {
                return Err(GoalError::DuplicateGoal);
            }
            Ok(GoalRepository::insert_new(tx, &new_goal)?)
        })?;

        Ok(Goal::from(row))
    }

    async fn update_goal(
        &self,
        goal_id: &str,
        actor_id: &str,
        update: GoalUpdate,
    ) -> Result<Goal> {
        update.validate()?;

        let _guard = self
            .locks
            .acquire(goal_id)
            .await
            .ok_or(GoalError::Timeout)?;

        let mut conn = get_connection(&self.pool)?;
        let row = self.run_write(&mut conn, |tx| {
            let goal = GoalRepository::find_by_id(tx, goal_id)
                .map_err(|e| not_found_as(e, goal_id))?;
            if goal.owner_id != actor_id {
                return Err(GoalError::NotAllowed(
                    "Only the owner may edit a goal".to_string(),
                ));
            }
            let raised = Decimal::from_str(&goal.raised).unwrap_or_default();
            if raised > Decimal::ZERO {
                return Err(GoalError::AlreadyFunded(raised));
            }

            let changeset = update.to_changeset(Utc::now().naive_utc());
            GoalRepository::update_descriptive(tx, goal_id, &changeset)?;
            Ok(GoalRepository::find_by_id(tx, goal_id)?)
        })?;

        Ok(Goal::from(row))
    }

    async fn delete_goal(&self, goal_id: &str, actor_id: &str) -> Result<()> {
        let guard = self
            .locks
            .acquire(goal_id)
            .await
            .ok_or(GoalError::Timeout)?;

        let mut conn = get_connection(&self.pool)?;
        self.run_write(&mut conn, |tx| {
            let goal = GoalRepository::find_by_id(tx, goal_id)
                .map_err(|e| not_found_as(e, goal_id))?;
            if goal.owner_id != actor_id {
                return Err(GoalError::NotAllowed(
                    "Only the owner may delete a goal".to_string(),
                ));
            }
            // Contributions go with the goal via the cascade.
            GoalRepository::delete(tx, goal_id)?;
            Ok(())
        })?;

        // The goal is gone; its lock entry can go too.
        drop(guard);
        self.locks.evict(goal_id);
        Ok(())
    }

    /// Copies a goal into another owner's list and bumps the source's
    /// popularity counter. Both mutations commit atomically; a bumped counter
    /// without a copy (or the reverse) is never observable.
    async fn copy_goal(&self, source_goal_id: &str, new_owner_id: &str) -> Result<Goal> {
        debug!("Copying goal {} for {}", source_goal_id, new_owner_id);

        let _guard = self
            .locks
            .acquire(source_goal_id)
            .await
            .ok_or(GoalError::Timeout)?;

        let mut conn = get_connection(&self.pool)?;
        let row = self.run_write(&mut conn, |tx| {
            let source = GoalRepository::find_by_id(tx, source_goal_id)
                .map_err(|e| not_found_as(e, source_goal_id))?;
            if source.owner_id == new_owner_id {
                return Err(GoalError::SelfCopy);
            }
            if GoalRepository::find_duplicate(tx, new_owner_id, &GoalIdentity::from(&source))?
                .is_some()
            {
                return Err(GoalError::AlreadyCopied);
            }

            GoalRepository::bump_copied_count(tx, source_goal_id)?;
            Ok(GoalRepository::insert_copy(tx, &source, new_owner_id)?)
        })?;

        Ok(Goal::from(row))
    }
}
