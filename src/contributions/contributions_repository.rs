use chrono::Utc;
use diesel::prelude::*;
use diesel::QueryResult;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::contributions::contributions_model::{ContributionDB, NewContribution};
use crate::schema::contributions;

/// Storage access for contributions. As with goals, every function takes the
/// caller's connection so it runs inside whatever transaction is open.
pub struct ContributionRepository;

impl ContributionRepository {
    pub(crate) fn find_by_id(
        conn: &mut SqliteConnection,
        contribution_id: &str,
    ) -> QueryResult<ContributionDB> {
        contributions::table
            .find(contribution_id)
            .first::<ContributionDB>(conn)
    }

    pub(crate) fn load_by_goal(
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> QueryResult<Vec<ContributionDB>> {
        contributions::table
            .filter(contributions::goal_id.eq(goal_id))
            .order(contributions::created_at.asc())
            .load::<ContributionDB>(conn)
    }

    pub(crate) fn insert(
        conn: &mut SqliteConnection,
        new_contribution: &NewContribution,
    ) -> QueryResult<ContributionDB> {
        let row = ContributionDB {
            id: Uuid::new_v4().to_string(),
            goal_id: new_contribution.goal_id.clone(),
            contributor_id: new_contribution.contributor_id.clone(),
            amount: new_contribution.canonical_amount().to_string(),
            hidden: new_contribution.hidden,
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(contributions::table)
            .values(&row)
            .returning(ContributionDB::as_returning())
            .get_result(conn)
    }

    /// Sums the goal's contribution amounts from the authoritative rows.
    /// Amounts are summed as decimals, not floats, to keep scale-2 exactness.
    pub(crate) fn sum_for_goal(conn: &mut SqliteConnection, goal_id: &str) -> QueryResult<Decimal> {
        let amounts: Vec<String> = contributions::table
            .filter(contributions::goal_id.eq(goal_id))
            .select(contributions::amount)
            .load::<String>(conn)?;

        Ok(amounts.iter().fold(Decimal::ZERO, |total, amount| {
            total + Decimal::from_str(amount).unwrap_or_default()
        }))
    }
}
