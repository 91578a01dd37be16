// Pricing module
// Nightly rates, addons, coupons and taxes combined into one priced quote

pub mod aggregator;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_engine;
pub mod rules;
pub mod surcharge;

pub use aggregator::*;
pub use error::*;
pub use handlers::*;
pub use models::*;
pub use rate_engine::*;
pub use rules::*;
pub use surcharge::*;
