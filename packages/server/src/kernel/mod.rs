//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod encryption;
pub mod firecrawl_client;
pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use ai::{extract_rates_tool, GatewayRateExtractor, EXTRACT_RATES_TOOL};
pub use deps::ServerDeps;
pub use encryption::PgEncryption;
pub use firecrawl_client::FirecrawlClient;
pub use stores::{PostgresBusinessStore, PostgresRateStore};
pub use test_dependencies::TestDependencies;
pub use traits::*;
