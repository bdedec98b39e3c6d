use async_trait::async_trait;
use dashmap::DashMap;

use crate::users::users_errors::{Result, UserLookupError};
use crate::users::users_model::UserProfile;
use crate::users::users_traits::UserLookupTrait;

/// In-memory identity directory for single-process embedders and tests.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<String, UserProfile>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    pub fn insert(&self, user: UserProfile) {
        self.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserLookupTrait for InMemoryUserDirectory {
    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.users
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| UserLookupError::NotFound(user_id.to_string()))
    }
}
