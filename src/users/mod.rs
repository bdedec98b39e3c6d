// Module declarations
pub(crate) mod users_directory;
pub(crate) mod users_errors;
pub(crate) mod users_model;
pub(crate) mod users_traits;

// Re-export the public interface
pub use users_directory::InMemoryUserDirectory;
pub use users_errors::{Result, UserLookupError};
pub use users_model::UserProfile;
pub use users_traits::UserLookupTrait;
