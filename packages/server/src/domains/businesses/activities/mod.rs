pub mod store_credentials;

pub use store_credentials::{
    canonical_json, store_pms_credentials, CredentialSubmission, VaultError,
};
