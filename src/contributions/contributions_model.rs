use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{ANONYMOUS_CONTRIBUTOR_NAME, MONEY_SCALE};
use crate::contributions::contributions_errors::{ContributionError, Result};
use crate::goals::Goal;
use crate::users::UserProfile;

/// Domain model representing a committed contribution.
/// Contributions are append-only; once committed they never change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: String,
    pub goal_id: String,
    pub contributor_id: String,
    pub amount: Decimal,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// Database model for contributions
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Insertable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContributionDB {
    pub id: String,
    pub goal_id: String,
    pub contributor_id: String,
    pub amount: String,
    pub hidden: bool,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new contribution
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub goal_id: String,
    pub contributor_id: String,
    pub amount: Decimal,
    pub hidden: bool,
}

impl NewContribution {
    /// The amount as it will be persisted: canonical scale-2.
    ///
    /// Every check and write goes through this value, so an input that only
    /// differs below a cent can never slip past validation and commit.
    pub fn canonical_amount(&self) -> Decimal {
        self.amount.round_dp(MONEY_SCALE)
    }

    /// Validates the new contribution data
    pub fn validate(&self) -> Result<()> {
        if self.goal_id.trim().is_empty() {
            return Err(ContributionError::InvalidData(
                "Goal ID cannot be empty".to_string(),
            ));
        }
        if self.contributor_id.trim().is_empty() {
            return Err(ContributionError::InvalidData(
                "Contributor ID cannot be empty".to_string(),
            ));
        }
        if self.canonical_amount() <= Decimal::ZERO {
            return Err(ContributionError::InvalidData(
                "Contribution amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-viewer read model of a contribution.
///
/// Computed at query time; the stored entity is never mutated to mask it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionView {
    pub id: String,
    pub goal_id: String,
    pub contributor_id: String,
    /// `None` when the amount is hidden from this viewer.
    pub amount: Option<Decimal>,
    pub hidden: bool,
    pub contributor_name: String,
    pub contributor_image: String,
    pub created_at: DateTime<Utc>,
}

impl ContributionView {
    /// Projects a contribution for one viewer (`None` = anonymous).
    ///
    /// A hidden amount stays visible to the contributor and to the goal's
    /// owner; everyone else, anonymous viewers included, sees no amount.
    pub fn project(
        contribution: &Contribution,
        goal: &Goal,
        contributor: &UserProfile,
        viewer_id: Option<&str>,
    ) -> Self {
        let is_contributor = viewer_id == Some(contribution.contributor_id.as_str());
        let is_owner = viewer_id == Some(goal.owner_id.as_str());

        let amount = if contribution.hidden && !is_contributor && !is_owner {
            None
        } else {
            Some(contribution.amount)
        };

        let contributor_name = contributor
            .username
            .clone()
            .unwrap_or_else(|| ANONYMOUS_CONTRIBUTOR_NAME.to_string());

        // Display image falls back: contributor avatar -> goal image -> empty.
        let contributor_image = contributor
            .avatar_url
            .clone()
            .unwrap_or_else(|| goal.image.clone());

        ContributionView {
            id: contribution.id.clone(),
            goal_id: contribution.goal_id.clone(),
            contributor_id: contribution.contributor_id.clone(),
            amount,
            hidden: contribution.hidden,
            contributor_name,
            contributor_image,
            created_at: contribution.created_at,
        }
    }
}

impl From<ContributionDB> for Contribution {
    fn from(row: ContributionDB) -> Self {
        Contribution {
            id: row.id,
            goal_id: row.goal_id,
            contributor_id: row.contributor_id,
            amount: Decimal::from_str(&row.amount).unwrap_or_default(),
            hidden: row.hidden,
            created_at: Utc.from_utc_datetime(&row.created_at),
        }
    }
}
