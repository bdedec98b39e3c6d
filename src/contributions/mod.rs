// Module declarations
pub(crate) mod contributions_errors;
pub(crate) mod contributions_model;
pub(crate) mod contributions_repository;
pub(crate) mod contributions_service;
pub(crate) mod contributions_traits;

// Re-export the public interface
pub use contributions_model::{Contribution, ContributionDB, ContributionView, NewContribution};
pub use contributions_repository::ContributionRepository;
pub use contributions_service::ContributionService;
pub use contributions_traits::ContributionServiceTrait;

// Re-export error types for convenience
pub use contributions_errors::{ContributionError, Result};
