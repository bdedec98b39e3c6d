use chrono::Utc;
use diesel::prelude::*;
use diesel::QueryResult;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::constants::{RECENT_GOALS_PAGE_SIZE, TOP_GOALS_LIMIT};
use crate::goals::goals_model::{GoalDB, GoalIdentity, GoalUpdateDB, NewGoal};
use crate::schema::goals;

/// Storage access for goals.
///
/// Every function takes an explicit connection so callers decide the
/// transactional scope: a service passes the connection of an already-open
/// transaction and the statements join it.
pub struct GoalRepository;

impl GoalRepository {
    pub(crate) fn find_by_id(conn: &mut SqliteConnection, goal_id: &str) -> QueryResult<GoalDB> {
        goals::table.find(goal_id).first::<GoalDB>(conn)
    }

    /// Finds a goal of `owner_id` matching the full de-duplication key.
    pub(crate) fn find_duplicate(
        conn: &mut SqliteConnection,
        owner_id: &str,
        identity: &GoalIdentity,
    ) -> QueryResult<Option<GoalDB>> {
        let mut query = goals::table
            .filter(goals::owner_id.eq(owner_id))
            .filter(goals::name.eq(&identity.name))
            .filter(goals::image.eq(&identity.image))
            .filter(goals::price.eq(&identity.price))
            .into_boxed();

        query = match &identity.link {
            Some(link) => query.filter(goals::link.eq(link.clone())),
            None => query.filter(goals::link.is_null()),
        };
        query = match &identity.description {
            Some(description) => query.filter(goals::description.eq(description.clone())),
            None => query.filter(goals::description.is_null()),
        };

        query.first::<GoalDB>(conn).optional()
    }

    pub(crate) fn insert_new(conn: &mut SqliteConnection, new_goal: &NewGoal) -> QueryResult<GoalDB> {
        let now = Utc::now().naive_utc();
        let identity = new_goal.identity();
        let row = GoalDB {
            id: Uuid::new_v4().to_string(),
            owner_id: new_goal.owner_id.clone(),
            name: identity.name,
            link: identity.link,
            image: identity.image,
            description: identity.description,
            price: identity.price,
            raised: Decimal::ZERO.to_string(),
            copied_count: 0,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(goals::table)
            .values(&row)
            .returning(GoalDB::as_returning())
            .get_result(conn)
    }

    /// Inserts a fresh copy of `source` for `new_owner_id`, with no funding
    /// and no popularity of its own.
    pub(crate) fn insert_copy(
        conn: &mut SqliteConnection,
        source: &GoalDB,
        new_owner_id: &str,
    ) -> QueryResult<GoalDB> {
        let now = Utc::now().naive_utc();
        let row = GoalDB {
            id: Uuid::new_v4().to_string(),
            owner_id: new_owner_id.to_string(),
            name: source.name.clone(),
            link: source.link.clone(),
            image: source.image.clone(),
            description: source.description.clone(),
            price: source.price.clone(),
            raised: Decimal::ZERO.to_string(),
            copied_count: 0,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(goals::table)
            .values(&row)
            .returning(GoalDB::as_returning())
            .get_result(conn)
    }

    pub(crate) fn bump_copied_count(
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> QueryResult<usize> {
        diesel::update(goals::table.find(goal_id))
            .set((
                goals::copied_count.eq(goals::copied_count + 1),
                goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
    }

    pub(crate) fn update_descriptive(
        conn: &mut SqliteConnection,
        goal_id: &str,
        changeset: &GoalUpdateDB,
    ) -> QueryResult<usize> {
        diesel::update(goals::table.find(goal_id))
            .set(changeset)
            .execute(conn)
    }

    /// Overwrites the materialized funded total with a freshly computed sum.
    pub(crate) fn set_raised(
        conn: &mut SqliteConnection,
        goal_id: &str,
        total: Decimal,
    ) -> QueryResult<usize> {
        diesel::update(goals::table.find(goal_id))
            .set((
                goals::raised.eq(total.to_string()),
                goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
    }

    pub(crate) fn delete(conn: &mut SqliteConnection, goal_id: &str) -> QueryResult<usize> {
        diesel::delete(goals::table.find(goal_id)).execute(conn)
    }

    pub(crate) fn load_by_owner(
        conn: &mut SqliteConnection,
        owner_id: &str,
    ) -> QueryResult<Vec<GoalDB>> {
        goals::table
            .filter(goals::owner_id.eq(owner_id))
            .order(goals::created_at.desc())
            .limit(RECENT_GOALS_PAGE_SIZE)
            .load::<GoalDB>(conn)
    }

    pub(crate) fn load_recent(conn: &mut SqliteConnection, page: i64) -> QueryResult<Vec<GoalDB>> {
        let skip = (page.max(1) - 1) * RECENT_GOALS_PAGE_SIZE;
        goals::table
            .order(goals::created_at.desc())
            .limit(RECENT_GOALS_PAGE_SIZE)
            .offset(skip)
            .load::<GoalDB>(conn)
    }

    pub(crate) fn load_top(conn: &mut SqliteConnection) -> QueryResult<Vec<GoalDB>> {
        goals::table
            .order(goals::copied_count.desc())
            .limit(TOP_GOALS_LIMIT)
            .load::<GoalDB>(conn)
    }
}
