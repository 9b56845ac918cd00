//! Business-scoped authorization
//!
//! Every check reduces to one predicate over what the store knows about a
//! user and a business:
//!
//! ```rust,ignore
//! use crate::common::auth::{Actor, BusinessCapability};
//!
//! Actor::new(user_id)
//!     .can(BusinessCapability::ManageCredentials)
//!     .on(business_id)
//!     .check(deps.business_store.as_ref())
//!     .await?;
//! ```

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder, ScopedCheck};
pub use capability::{AppRole, BusinessAccess, BusinessCapability};
pub use errors::AuthError;
