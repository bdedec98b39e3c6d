use async_trait::async_trait;

use crate::users::users_errors::Result;
use crate::users::users_model::UserProfile;

/// Trait for the identity-lookup collaborator
#[async_trait]
pub trait UserLookupTrait: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<UserProfile>;
}
