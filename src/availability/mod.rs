// Availability module
// Read-only search plus the allocation step used by booking creation

pub mod allocation;
pub mod error;
pub mod handlers;
pub mod service;

pub use allocation::*;
pub use error::*;
pub use handlers::*;
pub use service::*;
