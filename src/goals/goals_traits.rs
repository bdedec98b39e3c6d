use async_trait::async_trait;

use crate::goals::goals_errors::Result;
use crate::goals::goals_model::{Goal, GoalUpdate, NewGoal};

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    fn list_goals_by_owner(&self, owner_id: &str) -> Result<Vec<Goal>>;
    fn list_recent(&self, page: i64) -> Result<Vec<Goal>>;
    fn list_top(&self) -> Result<Vec<Goal>>;
    fn combined_feed(&self, page: i64) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, goal_id: &str, actor_id: &str, update: GoalUpdate)
        -> Result<Goal>;
    async fn delete_goal(&self, goal_id: &str, actor_id: &str) -> Result<()>;
    async fn copy_goal(&self, source_goal_id: &str, new_owner_id: &str) -> Result<Goal>;
}
