pub mod db;

pub mod contributions;
pub mod goals;
pub mod notifications;
pub mod users;

pub mod constants;
pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
