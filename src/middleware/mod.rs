//! Actix middleware: request logging and optional auth context.

pub mod auth;
pub mod logging;

pub use auth::{AuthContext, AuthenticatedUser};
pub use logging::RequestLogger;
