// Authentication module
// Identifies the caller from a JWT issued elsewhere; no credential handling lives here

pub mod error;
pub mod middleware;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::Principal;
pub use token::{Claims, TokenService};
