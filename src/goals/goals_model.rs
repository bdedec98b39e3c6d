use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{GOAL_DESCRIPTION_MAX_LEN, GOAL_NAME_MAX_LEN, MONEY_SCALE};
use crate::goals::goals_errors::{GoalError, Result};

/// Domain model representing a funding goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Materialized sum of the goal's contributions; never incremented in place.
    pub raised: Decimal,
    pub copied_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Amount still fundable toward this goal.
    pub fn remaining(&self) -> Decimal {
        self.price - self.raised
    }
}

/// Database model for goals
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Insertable,
    AsChangeset,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    pub description: Option<String>,
    pub price: String,
    pub raised: String,
    pub copied_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub owner_id: String,
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl NewGoal {
    /// Validates the new goal data
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(GoalError::InvalidData(
                "Owner ID cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(GoalError::InvalidData(
                "Goal name cannot be empty".to_string(),
            ));
        }
        if self.name.len() > GOAL_NAME_MAX_LEN {
            return Err(GoalError::InvalidData(format!(
                "Goal name cannot exceed {} characters",
                GOAL_NAME_MAX_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.len() > GOAL_DESCRIPTION_MAX_LEN {
                return Err(GoalError::InvalidData(format!(
                    "Goal description cannot exceed {} characters",
                    GOAL_DESCRIPTION_MAX_LEN
                )));
            }
        }
        if self.price <= Decimal::ZERO {
            return Err(GoalError::InvalidData(
                "Goal price must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn identity(&self) -> GoalIdentity {
        GoalIdentity {
            name: self.name.clone(),
            link: self.link.clone(),
            image: self.image.clone(),
            price: self.price.round_dp(MONEY_SCALE).to_string(),
            description: self.description.clone(),
        }
    }
}

/// Input model for editing a goal's descriptive fields.
/// Only applied while the goal has no funding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

impl GoalUpdate {
    /// Validates the goal update data
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(GoalError::InvalidData(
                    "Goal name cannot be empty".to_string(),
                ));
            }
            if name.len() > GOAL_NAME_MAX_LEN {
                return Err(GoalError::InvalidData(format!(
                    "Goal name cannot exceed {} characters",
                    GOAL_NAME_MAX_LEN
                )));
            }
        }
        if let Some(description) = &self.description {
            if description.len() > GOAL_DESCRIPTION_MAX_LEN {
                return Err(GoalError::InvalidData(format!(
                    "Goal description cannot exceed {} characters",
                    GOAL_DESCRIPTION_MAX_LEN
                )));
            }
        }
        if let Some(price) = self.price {
            if price <= Decimal::ZERO {
                return Err(GoalError::InvalidData(
                    "Goal price must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn to_changeset(&self, updated_at: NaiveDateTime) -> GoalUpdateDB {
        GoalUpdateDB {
            name: self.name.clone(),
            link: self.link.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            price: self
                .price
                .map(|p| p.round_dp(MONEY_SCALE).to_string()),
            updated_at,
        }
    }
}

/// Changeset for descriptive goal edits; absent fields are left untouched
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct GoalUpdateDB {
    pub name: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// De-duplication key: the attribute tuple an owner cannot post twice.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalIdentity {
    pub name: String,
    pub link: Option<String>,
    pub image: String,
    /// Canonical scale-2 text, as persisted.
    pub price: String,
    pub description: Option<String>,
}

impl From<&GoalDB> for GoalIdentity {
    fn from(row: &GoalDB) -> Self {
        GoalIdentity {
            name: row.name.clone(),
            link: row.link.clone(),
            image: row.image.clone(),
            price: row.price.clone(),
            description: row.description.clone(),
        }
    }
}

impl From<GoalDB> for Goal {
    fn from(row: GoalDB) -> Self {
        Goal {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            link: row.link,
            image: row.image,
            description: row.description,
            price: Decimal::from_str(&row.price).unwrap_or_default(),
            raised: Decimal::from_str(&row.raised).unwrap_or_default(),
            copied_count: row.copied_count,
            created_at: Utc.from_utc_datetime(&row.created_at),
            updated_at: Utc.from_utc_datetime(&row.updated_at),
        }
    }
}
