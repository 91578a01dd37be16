// Payments module
// Payments, refunds and the signed ledger behind a booking's payment status

pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod service;

pub use error::*;
pub use handlers::*;
pub use ledger::*;
pub use models::*;
pub use service::*;
