pub mod activities;
pub mod models;

pub use activities::{store_pms_credentials, CredentialSubmission, VaultError};
pub use models::{Business, CredentialUpdate, PmsSystem, UserRole};
