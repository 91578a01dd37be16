// Bookings module
// Creation with room allocation, cancellation with policy refunds, completion

pub mod cancellation;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod status_machine;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use service::*;
pub use status_machine::*;
