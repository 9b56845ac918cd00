//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for Business entities (tenants).
pub struct Business;

/// Marker type for authenticated users.
pub struct User;

/// Marker type for stored competitor rate rows.
pub struct CompetitorRateRow;

/// Typed ID for Business entities.
pub type BusinessId = Id<Business>;

/// Typed ID for users (the `sub` claim of a bearer token).
pub type UserId = Id<User>;

/// Typed ID for competitor rate rows.
pub type CompetitorRateId = Id<CompetitorRateRow>;
