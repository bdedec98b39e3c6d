use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

use crate::constants::GOAL_LOCK_TIMEOUT_SECS;

/// Registry of per-goal write locks.
///
/// Every state transition of a goal (contribution insert plus aggregate
/// recompute, duplication counter bump, repair recompute) runs while holding
/// that goal's lock, so transitions of one goal are serialized while distinct
/// goals proceed in parallel. The lock scope is a single goal id, never the
/// whole ledger.
pub struct GoalLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
    deadline: Duration,
}

impl Default for GoalLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalLocks {
    pub fn new() -> Self {
        Self::with_deadline(Duration::from_secs(GOAL_LOCK_TIMEOUT_SECS))
    }

    /// Builds a registry with a custom acquisition deadline.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            deadline,
        }
    }

    /// Acquires the lock for one goal, waiting at most the registry's
    /// deadline. Returns `None` when the wait expires; nothing has been
    /// applied at that point and the caller may retry.
    pub async fn acquire(&self, goal_id: &str) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let entry = self
                .locks
                .entry(goal_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };

        timeout(self.deadline, lock.lock_owned()).await.ok()
    }

    /// Drops the entry for a goal that no longer exists, so the registry
    /// does not grow with every deleted goal. Skipped while another task
    /// still holds or awaits the lock.
    pub fn evict(&self, goal_id: &str) {
        self.locks
            .remove_if(goal_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
