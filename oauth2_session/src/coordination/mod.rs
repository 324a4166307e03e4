mod errors;
mod oauth2;

pub use errors::CoordinationError;
pub use oauth2::AuthCoordinator;
