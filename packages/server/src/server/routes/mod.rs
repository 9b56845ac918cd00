// HTTP routes
pub mod competitor_rates;
pub mod health;
pub mod pms_credentials;

pub use competitor_rates::*;
pub use health::*;
pub use pms_credentials::*;
