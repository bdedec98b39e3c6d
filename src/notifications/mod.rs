// Module declarations
pub(crate) mod log_notifier;
pub(crate) mod notifications_model;
pub(crate) mod notifications_traits;

// Re-export the public interface
pub use log_notifier::LogNotifier;
pub use notifications_model::ContributionNotification;
pub use notifications_traits::NotifierTrait;
