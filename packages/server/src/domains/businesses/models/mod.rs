pub mod business;
pub mod user_role;

pub use business::{Business, CredentialUpdate, PmsSystem};
pub use user_role::UserRole;
