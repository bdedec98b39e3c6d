/// Decimal scale for all monetary amounts (price, raised, contribution amount)
pub const MONEY_SCALE: u32 = 2;

/// Page size for the recent-goals feed
pub const RECENT_GOALS_PAGE_SIZE: i64 = 20;

/// Number of goals returned by the most-copied feed
pub const TOP_GOALS_LIMIT: i64 = 5;

/// Upper bound on the combined recent/top feed
pub const COMBINED_FEED_LIMIT: usize = 40;

/// Display name used when a contributor has not exposed a username
pub const ANONYMOUS_CONTRIBUTOR_NAME: &str = "Anonymous";

/// Attempts per write before surfacing contention to the caller
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Seconds a request may wait on a goal's ledger lock
pub const GOAL_LOCK_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a goal name
pub const GOAL_NAME_MAX_LEN: usize = 250;

/// Maximum length of a goal description
pub const GOAL_DESCRIPTION_MAX_LEN: usize = 1024;
