// Hotel Ops - rate intelligence and PMS credential API core
//
// Two request-scoped flows sit behind the HTTP surface:
// competitor-rate ingestion (scrape -> extract -> store) and the PMS
// credential vault writer (authorize -> encrypt -> overwrite).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
