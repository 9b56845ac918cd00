// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod extraction_types;
pub mod id;
pub mod secret;

pub use auth::{Actor, AppRole, AuthError, BusinessAccess, BusinessCapability};
pub use entity_ids::*;
pub use extraction_types::{Availability, ExtractRatesArgs, ExtractedRate};
pub use id::Id;
pub use secret::SecretString;
