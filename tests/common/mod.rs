use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use wishfund_core::contributions::ContributionService;
use wishfund_core::db::{self, GoalLocks};
use wishfund_core::goals::{GoalService, NewGoal};
use wishfund_core::notifications::LogNotifier;
use wishfund_core::users::{InMemoryUserDirectory, UserLookupTrait, UserProfile};

/// A fully wired ledger on a throwaway SQLite database.
pub struct TestLedger {
    pub goals: Arc<GoalService>,
    pub contributions: Arc<ContributionService>,
    pub users: Arc<InMemoryUserDirectory>,
    pub locks: Arc<GoalLocks>,
    // Keeps the database directory alive for the duration of the test.
    _tmp: tempfile::TempDir,
}

pub fn new_ledger() -> TestLedger {
    build_ledger(GoalLocks::new())
}

/// A ledger whose goal locks give up after `deadline` instead of the
/// production wait.
#[allow(dead_code)]
pub fn new_ledger_with_lock_deadline(deadline: Duration) -> TestLedger {
    build_ledger(GoalLocks::with_deadline(deadline))
}

fn build_ledger(locks: GoalLocks) -> TestLedger {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(tmp.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let locks = Arc::new(locks);
    let users = Arc::new(InMemoryUserDirectory::new());
    let user_lookup: Arc<dyn UserLookupTrait> = users.clone();

    let goals = Arc::new(GoalService::new(Arc::clone(&pool), Arc::clone(&locks)));
    let contributions = Arc::new(ContributionService::new(
        pool,
        Arc::clone(&locks),
        user_lookup,
        Arc::new(LogNotifier),
    ));

    TestLedger {
        goals,
        contributions,
        users,
        locks,
        _tmp: tmp,
    }
}

pub fn seed_user(directory: &InMemoryUserDirectory, id: &str, username: Option<&str>) {
    directory.insert(UserProfile {
        id: id.to_string(),
        username: username.map(str::to_string),
        avatar_url: None,
        email: format!("{}@example.com", id),
    });
}

pub fn new_goal(owner_id: &str, name: &str, price: Decimal) -> NewGoal {
    NewGoal {
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        link: None,
        image: "https://img.example/gift.png".to_string(),
        description: Some("A very nice gift".to_string()),
        price,
    }
}
